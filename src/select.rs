//! Candidate selection.
//!
//! Given the active breakpoint, the device pixel ratio (DPR) and a target's
//! descriptors, decide what the target should display.
//!
//! ## Exact-Width Candidates
//!
//! Only descriptors whose width *equals* the active breakpoint are candidates.
//! A `1024w` entry is not considered at breakpoint `768`, so markup needs one
//! entry per breakpoint it wants to serve. A floor match (`≤`) would read more
//! like "best available", but existing markup is written against equality and
//! the two are not interchangeable.
//!
//! ## Density Rules
//!
//! Candidates are scanned in declaration order; the first hit wins:
//!
//! | Rule | Condition |
//! |---|---|
//! | High density | `dpr >= 1.5` and `ratio >= dpr` |
//! | Low density | `dpr <= 1.5` and `ratio <= dpr` |
//!
//! Both rules are eligible at exactly `1.5`. High density is checked first.
//!
//! ## Fallbacks
//!
//! When nothing matches a density rule:
//!
//! - one candidate: `load_best_available` applies it anyway, otherwise
//!   `remove_image` hides the target, otherwise nothing happens;
//! - several candidates: [`MultiCandidateFallback`] decides. The default,
//!   `Retain`, leaves the target untouched.

use crate::descriptor::Descriptor;
use serde::{Deserialize, Serialize};

/// DPR at which both density rules apply.
pub const HIGH_DENSITY_THRESHOLD: f64 = 1.5;

/// What to do when several candidates exist but none satisfies a density rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiCandidateFallback {
    /// Leave the currently displayed source in place.
    #[default]
    Retain,
    /// Pick the candidate with the smallest `|ratio - dpr|`, earliest on ties.
    NearestRatio,
}

/// Fallback switches consulted by [`select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub load_best_available: bool,
    pub remove_image: bool,
    pub multi_candidate_fallback: MultiCandidateFallback,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            load_best_available: true,
            remove_image: true,
            multi_candidate_fallback: MultiCandidateFallback::Retain,
        }
    }
}

/// Why a candidate was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyReason {
    HighDensity,
    LowDensity,
    BestAvailable,
    NearestRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "selection", rename_all = "kebab-case")]
pub enum Selection {
    Apply {
        descriptor: Descriptor,
        breakpoint: u32,
        reason: ApplyReason,
    },
    /// Show the placeholder and hide the target.
    Remove,
    /// No descriptor covers the active breakpoint. Handled like `Remove`.
    NoMatch { breakpoint: u32 },
    /// Leave the target as it is.
    Unresolved,
}

/// Pick the descriptor to display at `breakpoint` on a `dpr` display.
pub fn select(
    breakpoint: u32,
    dpr: f64,
    descriptors: &[Descriptor],
    policy: &SelectionPolicy,
) -> Selection {
    let candidates: Vec<&Descriptor> = descriptors
        .iter()
        .filter(|d| d.width == Some(breakpoint))
        .collect();

    if candidates.is_empty() {
        return Selection::NoMatch { breakpoint };
    }

    let apply = |d: &Descriptor, reason| Selection::Apply {
        descriptor: d.clone(),
        breakpoint,
        reason,
    };

    for candidate in &candidates {
        if let Some(reason) = density_rule(dpr, candidate.pixel_ratio) {
            return apply(*candidate, reason);
        }
    }

    if let [only] = candidates.as_slice() {
        if policy.load_best_available {
            return apply(*only, ApplyReason::BestAvailable);
        }
        if policy.remove_image {
            return Selection::Remove;
        }
        return Selection::Unresolved;
    }

    match policy.multi_candidate_fallback {
        MultiCandidateFallback::Retain => Selection::Unresolved,
        MultiCandidateFallback::NearestRatio => {
            let distance = |d: &Descriptor| (d.pixel_ratio - dpr).abs();
            // min_by returns the first of equally distant candidates.
            let nearest = candidates
                .iter()
                .min_by(|a, b| distance(**a).total_cmp(&distance(**b)))
                .copied()
                .unwrap_or(candidates[0]);
            apply(nearest, ApplyReason::NearestRatio)
        }
    }
}

fn density_rule(dpr: f64, ratio: f64) -> Option<ApplyReason> {
    if dpr >= HIGH_DENSITY_THRESHOLD && ratio >= dpr {
        Some(ApplyReason::HighDensity)
    } else if dpr <= HIGH_DENSITY_THRESHOLD && ratio <= dpr {
        Some(ApplyReason::LowDensity)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{parse_list, partition};

    fn descriptors(list: &str) -> Vec<Descriptor> {
        let (descriptors, errors) = partition(parse_list(list));
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        descriptors
    }

    fn applied_url(selection: &Selection) -> &str {
        match selection {
            Selection::Apply { descriptor, .. } => &descriptor.url,
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn high_density_picks_retina_variant() {
        let d = descriptors("cat_320.jpg 320w, cat_320_2x.jpg 320w 2x");
        let s = select(320, 2.0, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "cat_320_2x.jpg");
        assert!(matches!(
            s,
            Selection::Apply {
                reason: ApplyReason::HighDensity,
                breakpoint: 320,
                ..
            }
        ));
    }

    #[test]
    fn low_density_picks_first_fitting() {
        let d = descriptors("cat_320.jpg 320w, cat_320_2x.jpg 320w 2x");
        let s = select(320, 1.0, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "cat_320.jpg");
    }

    #[test]
    fn tie_at_threshold_goes_to_high_density_rule() {
        // At 1.5 the 2x candidate satisfies the high-density rule first.
        let d = descriptors("a_2x.jpg 480w 2x, a.jpg 480w 1x");
        let s = select(480, 1.5, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "a_2x.jpg");
        assert!(matches!(
            s,
            Selection::Apply {
                reason: ApplyReason::HighDensity,
                ..
            }
        ));
    }

    #[test]
    fn at_threshold_low_rule_still_applies() {
        let d = descriptors("a.jpg 480w 1x");
        let s = select(480, 1.5, &d, &SelectionPolicy::default());
        assert!(matches!(
            s,
            Selection::Apply {
                reason: ApplyReason::LowDensity,
                ..
            }
        ));
    }

    #[test]
    fn width_must_match_exactly() {
        let d = descriptors("cat_768.jpg 768w");
        let s = select(480, 1.0, &d, &SelectionPolicy::default());
        assert_eq!(s, Selection::NoMatch { breakpoint: 480 });
    }

    #[test]
    fn unbounded_width_never_matches() {
        let d = descriptors("cat.jpg 2x");
        assert_eq!(
            select(480, 2.0, &d, &SelectionPolicy::default()),
            Selection::NoMatch { breakpoint: 480 }
        );
    }

    #[test]
    fn single_candidate_best_available() {
        let d = descriptors("cat.jpg 480w 1x");
        let s = select(480, 3.0, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "cat.jpg");
        assert!(matches!(
            s,
            Selection::Apply {
                reason: ApplyReason::BestAvailable,
                ..
            }
        ));
    }

    #[test]
    fn single_candidate_removed_without_best_available() {
        let d = descriptors("cat.jpg 480w 1x");
        let policy = SelectionPolicy {
            load_best_available: false,
            ..SelectionPolicy::default()
        };
        assert_eq!(select(480, 3.0, &d, &policy), Selection::Remove);
    }

    #[test]
    fn single_candidate_unresolved_when_both_disabled() {
        let d = descriptors("cat.jpg 480w 1x");
        let policy = SelectionPolicy {
            load_best_available: false,
            remove_image: false,
            ..SelectionPolicy::default()
        };
        assert_eq!(select(480, 3.0, &d, &policy), Selection::Unresolved);
    }

    #[test]
    fn multiple_unmatched_candidates_retained() {
        // DPR 3: neither 1x nor 2x reaches it.
        let d = descriptors("a.jpg 480w 1x, b.jpg 480w 2x");
        assert_eq!(
            select(480, 3.0, &d, &SelectionPolicy::default()),
            Selection::Unresolved
        );
    }

    #[test]
    fn multiple_unmatched_candidates_nearest_ratio() {
        let d = descriptors("a.jpg 480w 1x, b.jpg 480w 2x");
        let policy = SelectionPolicy {
            multi_candidate_fallback: MultiCandidateFallback::NearestRatio,
            ..SelectionPolicy::default()
        };
        let s = select(480, 3.0, &d, &policy);
        assert_eq!(applied_url(&s), "b.jpg");
    }

    #[test]
    fn nearest_ratio_tie_prefers_earliest() {
        // DPR 1.2 is 0.6 away from both.
        let d = descriptors("a.jpg 480w 1.8x, b.jpg 480w 1.8x");
        let policy = SelectionPolicy {
            multi_candidate_fallback: MultiCandidateFallback::NearestRatio,
            ..SelectionPolicy::default()
        };
        let s = select(480, 1.2, &d, &policy);
        assert_eq!(applied_url(&s), "a.jpg");
    }

    #[test]
    fn candidates_outside_breakpoint_ignored() {
        let d = descriptors("big.jpg 1024w 1x, small.jpg 480w 1x");
        let s = select(480, 1.0, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "small.jpg");
    }

    #[test]
    fn declaration_order_decides_among_matches() {
        let d = descriptors("first.jpg 480w 0.5x, second.jpg 480w 1x");
        let s = select(480, 1.0, &d, &SelectionPolicy::default());
        assert_eq!(applied_url(&s), "first.jpg");
    }
}
