//! Applying selection decisions to swap targets.
//!
//! The executor is the only code that mutates a [`SwapTarget`]. Every
//! operation is idempotent: running the same decision twice leaves the same
//! state and the second run reports [`Mutation::Unchanged`].
//!
//! A target carries at most one breakpoint tag: applying replaces it and
//! removing clears it, so a hidden target never keeps a stale tier class.

use crate::descriptor::Descriptor;
use crate::select::Selection;
use crate::target::{PLACEHOLDER_SRC, SwapTarget};
use serde::Serialize;

/// Whether an operation changed any observable target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mutation {
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapExecutor {
    /// Reveal a hidden target when a descriptor is applied to it.
    pub create_new_image: bool,
}

impl Default for SwapExecutor {
    fn default() -> Self {
        Self {
            create_new_image: true,
        }
    }
}

impl SwapExecutor {
    pub fn new(create_new_image: bool) -> Self {
        Self { create_new_image }
    }

    /// Show `descriptor` on `target` and tag it with `breakpoint`.
    ///
    /// A hidden target stays hidden unless `create_new_image` is set.
    pub fn apply(
        &self,
        target: &mut SwapTarget,
        descriptor: &Descriptor,
        breakpoint: u32,
    ) -> Mutation {
        let before = snapshot(target);
        if target.hidden && self.create_new_image {
            target.hidden = false;
        }
        if target.src != descriptor.url {
            target.src.clone_from(&descriptor.url);
        }
        target.applied_breakpoint = Some(breakpoint);
        compare(before, target)
    }

    /// Swap in the placeholder and hide the target.
    pub fn remove(&self, target: &mut SwapTarget) -> Mutation {
        let before = snapshot(target);
        if target.src != PLACEHOLDER_SRC {
            target.src = PLACEHOLDER_SRC.to_string();
        }
        target.hidden = true;
        target.applied_breakpoint = None;
        compare(before, target)
    }

    /// Dispatch a selection. `Unresolved` never touches the target.
    pub fn execute(&self, target: &mut SwapTarget, selection: &Selection) -> Mutation {
        match selection {
            Selection::Apply {
                descriptor,
                breakpoint,
                ..
            } => self.apply(target, descriptor, *breakpoint),
            Selection::Remove | Selection::NoMatch { .. } => self.remove(target),
            Selection::Unresolved => Mutation::Unchanged,
        }
    }
}

type State = (String, Option<u32>, bool);

fn snapshot(target: &SwapTarget) -> State {
    (
        target.src.clone(),
        target.applied_breakpoint,
        target.hidden,
    )
}

fn compare(before: State, target: &SwapTarget) -> Mutation {
    if before == snapshot(target) {
        Mutation::Unchanged
    } else {
        Mutation::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_fragment;
    use crate::select::ApplyReason;

    fn hidden_target() -> SwapTarget {
        SwapTarget::new("t", vec![], Some("a.jpg 480w".into()), PLACEHOLDER_SRC, true)
    }

    #[test]
    fn apply_sets_src_and_breakpoint() {
        let mut t = SwapTarget::with_srcset("t", "a.jpg 480w");
        let d = parse_fragment("a.jpg 480w").unwrap();
        assert_eq!(SwapExecutor::default().apply(&mut t, &d, 480), Mutation::Changed);
        assert_eq!(t.src, "a.jpg");
        assert_eq!(t.applied_breakpoint, Some(480));
        assert!(!t.hidden);
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let mut t = SwapTarget::with_srcset("t", "a.jpg 480w");
        let d = parse_fragment("a.jpg 480w").unwrap();
        let executor = SwapExecutor::default();
        executor.apply(&mut t, &d, 480);
        let first = t.clone();
        assert_eq!(executor.apply(&mut t, &d, 480), Mutation::Unchanged);
        assert_eq!(t, first);
    }

    #[test]
    fn apply_reveals_hidden_target() {
        let mut t = hidden_target();
        let d = parse_fragment("a.jpg 480w").unwrap();
        SwapExecutor::new(true).apply(&mut t, &d, 480);
        assert!(!t.hidden);
        assert_eq!(t.src, "a.jpg");
    }

    #[test]
    fn apply_leaves_hidden_without_create_new_image() {
        let mut t = hidden_target();
        let d = parse_fragment("a.jpg 480w").unwrap();
        SwapExecutor::new(false).apply(&mut t, &d, 480);
        assert!(t.hidden);
        assert_eq!(t.src, "a.jpg");
    }

    #[test]
    fn remove_shows_placeholder_and_hides() {
        let mut t = SwapTarget::with_srcset("t", "a.jpg 480w");
        t.src = "a.jpg".into();
        t.applied_breakpoint = Some(480);
        assert_eq!(SwapExecutor::default().remove(&mut t), Mutation::Changed);
        assert!(t.shows_placeholder());
        assert!(t.hidden);
        assert_eq!(t.applied_breakpoint, None);
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let mut t = SwapTarget::with_srcset("t", "a.jpg 480w");
        let executor = SwapExecutor::default();
        executor.remove(&mut t);
        assert_eq!(executor.remove(&mut t), Mutation::Unchanged);
    }

    #[test]
    fn execute_dispatches_each_selection() {
        let executor = SwapExecutor::default();
        let d = parse_fragment("a.jpg 480w").unwrap();

        let mut t = SwapTarget::with_srcset("t", "a.jpg 480w");
        executor.execute(
            &mut t,
            &Selection::Apply {
                descriptor: d,
                breakpoint: 480,
                reason: ApplyReason::LowDensity,
            },
        );
        assert_eq!(t.src, "a.jpg");

        executor.execute(&mut t, &Selection::NoMatch { breakpoint: 768 });
        assert!(t.shows_placeholder() && t.hidden);

        let before = t.clone();
        assert_eq!(
            executor.execute(&mut t, &Selection::Unresolved),
            Mutation::Unchanged
        );
        assert_eq!(t, before);
    }
}
