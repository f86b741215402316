//! Breakpoint classification.
//!
//! Maps a viewport width onto exactly one configured breakpoint:
//!
//! ```text
//! breakpoints = [1024, 768, 480]   (always held descending)
//!
//!   width ≤ 480        → 480   (mobile clamp, never extrapolates below)
//!   480 < width < 768  → 480   (floor match)
//!   768 ≤ width < 1024 → 768
//!   width ≥ 1024       → 1024
//! ```

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreakpointError {
    #[error("breakpoint set must not be empty")]
    Empty,
    #[error("breakpoints must be positive, found 0")]
    Zero,
}

/// A validated, deduplicated breakpoint set, held in descending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakpointSet(Vec<u32>);

impl BreakpointSet {
    pub fn new(values: &[u32]) -> Result<Self, BreakpointError> {
        if values.is_empty() {
            return Err(BreakpointError::Empty);
        }
        if values.contains(&0) {
            return Err(BreakpointError::Zero);
        }
        Ok(Self(sorted_desc(values)))
    }

    /// Breakpoints, largest first.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn min(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    pub fn max(&self) -> u32 {
        self.0[0]
    }

    /// The active breakpoint for `viewport_width`.
    pub fn classify(&self, viewport_width: u32) -> u32 {
        let min = self.min();
        if viewport_width <= min {
            return min;
        }
        self.0
            .iter()
            .copied()
            .find(|&bp| bp <= viewport_width)
            .unwrap_or(min)
    }
}

/// Sort descending and drop duplicates. Idempotent.
pub fn sorted_desc(values: &[u32]) -> Vec<u32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

/// Classify against an unvalidated slice.
///
/// The slice is re-sorted on every call, so callers may pass breakpoints in
/// any order.
pub fn classify(viewport_width: u32, breakpoints: &[u32]) -> Result<u32, BreakpointError> {
    Ok(BreakpointSet::new(breakpoints)?.classify(viewport_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &[u32] = &[480, 768, 1024];

    #[test]
    fn floor_match_between_thresholds() {
        assert_eq!(classify(600, DEFAULTS).unwrap(), 480);
        assert_eq!(classify(800, DEFAULTS).unwrap(), 768);
    }

    #[test]
    fn clamps_below_smallest() {
        assert_eq!(classify(300, DEFAULTS).unwrap(), 480);
        assert_eq!(classify(0, DEFAULTS).unwrap(), 480);
    }

    #[test]
    fn exact_threshold_selects_itself() {
        assert_eq!(classify(480, DEFAULTS).unwrap(), 480);
        assert_eq!(classify(768, DEFAULTS).unwrap(), 768);
        assert_eq!(classify(1024, DEFAULTS).unwrap(), 1024);
    }

    #[test]
    fn above_largest_selects_largest() {
        assert_eq!(classify(2560, DEFAULTS).unwrap(), 1024);
    }

    #[test]
    fn input_order_does_not_matter() {
        assert_eq!(classify(900, &[1024, 480, 768]).unwrap(), 768);
        assert_eq!(classify(900, &[768, 1024, 480]).unwrap(), 768);
    }

    #[test]
    fn duplicates_removed() {
        let set = BreakpointSet::new(&[480, 768, 480, 1024, 768]).unwrap();
        assert_eq!(set.as_slice(), &[1024, 768, 480]);
    }

    #[test]
    fn single_breakpoint() {
        assert_eq!(classify(100, &[640]).unwrap(), 640);
        assert_eq!(classify(5000, &[640]).unwrap(), 640);
    }

    #[test]
    fn empty_set_is_error() {
        assert_eq!(classify(600, &[]), Err(BreakpointError::Empty));
    }

    #[test]
    fn zero_breakpoint_is_error() {
        assert_eq!(BreakpointSet::new(&[0, 480]), Err(BreakpointError::Zero));
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sorted_desc(&[3, 1, 2]);
        assert_eq!(sorted_desc(&once), once);
    }

    #[test]
    fn min_and_max() {
        let set = BreakpointSet::new(DEFAULTS).unwrap();
        assert_eq!(set.min(), 480);
        assert_eq!(set.max(), 1024);
    }
}
