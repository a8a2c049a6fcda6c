//! Depth-interval coverage of functional barriers.
//!
//! Clips each functional barrier to the target interval, merges overlapping
//! clips in a single sorted sweep, and reports the covered fraction.
//! Failed, untested and unknown barriers never contribute.

use crate::types::{BarrierElement, DepthInterval};

/// Fraction of `interval` covered by functional barriers, in `[0.0, 1.0]`.
///
/// Returns 0.0 for an empty list or a zero-length interval.
pub fn depth_coverage(barriers: &[BarrierElement], interval: DepthInterval) -> f64 {
    let interval_length = interval.length();
    if barriers.is_empty() || interval_length <= 0.0 {
        return 0.0;
    }

    let clipped: Vec<(f64, f64)> = barriers
        .iter()
        .filter(|b| b.status.is_functional())
        .filter_map(|b| {
            let start = b.depth_top.max(interval.start);
            let end = b.depth_bottom.min(interval.end);
            (start < end).then_some((start, end))
        })
        .collect();

    let covered: f64 = merge_ranges(clipped)
        .iter()
        .map(|(start, end)| end - start)
        .sum();

    (covered / interval_length).min(1.0)
}

/// Merge overlapping or touching ranges. Output is sorted by start.
pub fn merge_ranges(mut ranges: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(running) if start <= running.1 => {
                running.1 = running.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}
