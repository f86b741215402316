//! Shared test utilities for the image-swap test suite.
//!
//! Builders for targets and drivers, plus lookups that panic with a clear
//! message on miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut swap = swap_with(vec![target("hero", "s.jpg 480w, m.jpg 768w")]);
//! let report = swap.run(&StaticViewport::new(800, 1.0));
//! assert_eq!(applied_url(&report, "hero"), "m.jpg");
//! ```

use crate::config::SwapConfig;
use crate::swap::{ImageSwap, Outcome, PassReport};
use crate::target::SwapTarget;

// =========================================================================
// Builders
// =========================================================================

/// A visible target carrying the default container class.
pub fn target(id: &str, srcset: &str) -> SwapTarget {
    SwapTarget::new(
        id,
        vec!["swap-img".to_string()],
        Some(srcset.to_string()),
        "",
        false,
    )
}

/// Driver with default config.
pub fn swap_with(targets: Vec<SwapTarget>) -> ImageSwap {
    ImageSwap::new(SwapConfig::default(), targets).unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a target by id. Panics if not found.
pub fn find_target<'a>(targets: &'a [SwapTarget], id: &str) -> &'a SwapTarget {
    targets.iter().find(|t| t.id == id).unwrap_or_else(|| {
        let ids: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();
        panic!("target '{id}' not found. Available: {ids:?}")
    })
}

/// URL applied to `id` in `report`. Panics unless the outcome is `Applied`.
pub fn applied_url<'a>(report: &'a PassReport, id: &str) -> &'a str {
    let outcome = report.find(id).unwrap_or_else(|| {
        let ids: Vec<&str> = report.targets.iter().map(|t| t.id.as_str()).collect();
        panic!("target '{id}' not in report. Available: {ids:?}")
    });
    match &outcome.outcome {
        Outcome::Applied { url, .. } => url,
        other => panic!("target '{id}' was not applied: {other:?}"),
    }
}
