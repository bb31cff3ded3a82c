//! Binary-search helpers over a non-decreasing time axis.
//!
//! Both the window extractor and the cursor engine go through these functions so
//! they agree on tie-breaking:
//! - `index_range` is half-open: `start <= t < end` (left-side search on both bounds).
//! - `value_at_or_before` is step-hold: the last sample with `t <= query`
//!   (right-side search minus one), NaN before the first sample.
//!
//! Callers must pass a sorted axis; the functions never re-sort.
use std::ops::Range;
use ndarray::ArrayView1;
/// First index whose time is `>= target` (numpy `searchsorted(side="left")`).
pub fn search_left(time: ArrayView1<'_, f64>, target: f64) -> usize {
    let mut lo = 0;
    let mut hi = time.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if time[mid] < target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
/// First index whose time is `> target` (numpy `searchsorted(side="right")`).
pub fn search_right(time: ArrayView1<'_, f64>, target: f64) -> usize {
    let mut lo = 0;
    let mut hi = time.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if time[mid] <= target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
/// Indices of the samples with `start <= time[i] < end`. Empty when nothing falls inside
/// (including `start >= end`).
pub fn index_range(time: ArrayView1<'_, f64>, start: f64, end: f64) -> Range<usize> {
    let lo = search_left(time, start);
    let hi = search_left(time, end).max(lo);
    lo..hi
}
/// Index of the most recent sample at or before `query`, if any.
pub fn index_at_or_before(time: ArrayView1<'_, f64>, query: f64) -> Option<usize> {
    search_right(time, query).checked_sub(1)
}
/// Step-hold lookup. Duplicated timestamps resolve to the last of the run.
pub fn value_at_or_before(
    time: ArrayView1<'_, f64>,
    values: ArrayView1<'_, f64>,
    query: f64,
) -> f64 {
    match index_at_or_before(time, query) {
        Some(idx) => values.get(idx).copied().unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}
/// Position of the first sample that breaks ascending order (or is NaN).
pub fn first_unsorted(time: ArrayView1<'_, f64>) -> Option<usize> {
    if let Some(idx) = time.iter().position(|t| t.is_nan()) {
        return Some(idx);
    }
    time.windows(2)
        .into_iter()
        .position(|pair| pair[1] < pair[0])
        .map(|idx| idx + 1)
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{aview1, Array1};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    const TIME: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
    const VALUES: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
    #[test]
    fn range_selects_half_open_interval() {
        let time = aview1(&TIME);
        let range = index_range(time, 0.5, 2.5);
        assert_eq!(range, 1..3);
        let values = aview1(&VALUES);
        let sliced: Vec<f64> = range.clone().map(|i| values[i]).collect();
        assert_eq!(sliced, vec![20.0, 30.0]);
    }
    #[test]
    fn range_excludes_sample_at_end() {
        let time = aview1(&TIME);
        assert_eq!(index_range(time, 1.0, 3.0), 1..3);
        assert_eq!(index_range(time, 2.0, 2.0), 2..2);
        assert_eq!(index_range(time, 10.0, 20.0), 4..4);
        assert_eq!(index_range(time, 2.5, 1.0), 3..3);
    }
    #[test]
    fn step_hold_lookup() {
        let time = aview1(&TIME);
        let values = aview1(&VALUES);
        assert_eq!(value_at_or_before(time, values, 1.999), 20.0);
        assert_eq!(value_at_or_before(time, values, 2.0), 30.0);
        assert_eq!(value_at_or_before(time, values, 3.5), 40.0);
        assert!(value_at_or_before(time, values, -1.0).is_nan());
        assert!(value_at_or_before(time, values, f64::NAN).is_nan());
    }
    #[test]
    fn duplicate_timestamps_resolve_to_last() {
        let time = aview1(&[0.0, 1.0, 1.0, 1.0, 2.0]);
        let values = aview1(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(value_at_or_before(time, values, 1.0), 4.0);
        assert_eq!(index_range(time, 1.0, 2.0), 1..4);
    }
    #[test]
    fn empty_axis() {
        let time: Array1<f64> = Array1::zeros(0);
        assert_eq!(index_range(time.view(), 0.0, 1.0), 0..0);
        assert!(value_at_or_before(time.view(), time.view(), 0.0).is_nan());
    }
    #[test]
    fn detects_unsorted_and_nan() {
        assert_eq!(first_unsorted(aview1(&TIME)), None);
        assert_eq!(first_unsorted(aview1(&[0.0, 2.0, 1.0])), Some(2));
        assert_eq!(first_unsorted(aview1(&[0.0, f64::NAN, 1.0])), Some(1));
        assert_eq!(first_unsorted(aview1(&[1.0, 1.0])), None);
    }
    fn random_axis(rng: &mut StdRng) -> Vec<f64> {
        let len = rng.gen_range(0..64);
        let mut t = 0.0;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            // Quantised steps so duplicates actually occur.
            t += (rng.gen_range(0..4) as f64) * 0.25;
            out.push(t);
        }
        out
    }
    #[test]
    fn range_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let axis = random_axis(&mut rng);
            let time = aview1(&axis);
            let start = rng.gen_range(-1.0..20.0);
            let end = start + rng.gen_range(0.0..10.0);
            let range = index_range(time, start, end);
            assert!(range.start <= range.end);
            for (i, &t) in axis.iter().enumerate() {
                let inside = start <= t && t < end;
                assert_eq!(range.contains(&i), inside, "t={t} start={start} end={end}");
            }
        }
    }
    #[test]
    fn lookup_is_monotone_in_query_time() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let axis = random_axis(&mut rng);
            let time = aview1(&axis);
            let a = rng.gen_range(-1.0..20.0);
            let b = rng.gen_range(-1.0..20.0);
            let (t1, t2) = if a <= b { (a, b) } else { (b, a) };
            let i1 = index_at_or_before(time, t1);
            let i2 = index_at_or_before(time, t2);
            assert!(i1 <= i2, "{i1:?} > {i2:?} for {t1} <= {t2}");
            if let Some(idx) = i2 {
                assert!(axis[idx] <= t2);
                assert!(axis.get(idx + 1).map_or(true, |next| *next > t2));
            }
        }
    }
}
