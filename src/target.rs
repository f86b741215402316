//! Swap targets: one bound image element and its applied state.
//!
//! A [`SwapTarget`] is created once per bound element. Its descriptor list is
//! parsed at creation and cached, together with any parse errors. After that
//! only the [`executor`](crate::executor) mutates it.

use crate::descriptor::{self, Descriptor, ParseError};
use serde::Serialize;

/// 1×1 transparent GIF shown in place of a hidden target.
pub const PLACEHOLDER_SRC: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapTarget {
    /// Stable identifier used in reports and rendered as `data-target`.
    pub id: String,
    /// Classes carried by the bound element, including the container class.
    pub classes: Vec<String>,
    /// Raw descriptor list. `None` when the element has no descriptor string.
    pub srcset: Option<String>,
    /// Usable descriptors, in declaration order.
    pub descriptors: Vec<Descriptor>,
    /// Every invalid token found while parsing `srcset`.
    pub parse_errors: Vec<ParseError>,
    /// Currently displayed source.
    pub src: String,
    /// Breakpoint of the last applied descriptor, also rendered as a class.
    pub applied_breakpoint: Option<u32>,
    pub hidden: bool,
}

impl SwapTarget {
    /// Bind a target, parsing `srcset` once.
    pub fn new(
        id: impl Into<String>,
        classes: Vec<String>,
        srcset: Option<String>,
        src: impl Into<String>,
        hidden: bool,
    ) -> Self {
        let (descriptors, parse_errors) = srcset
            .as_deref()
            .map(|s| descriptor::partition(descriptor::parse_list(s)))
            .unwrap_or_default();
        Self {
            id: id.into(),
            classes,
            srcset,
            descriptors,
            parse_errors,
            src: src.into(),
            applied_breakpoint: None,
            hidden,
        }
    }

    /// Visible target with a descriptor list and no initial source.
    pub fn with_srcset(id: impl Into<String>, srcset: &str) -> Self {
        Self::new(id, Vec::new(), Some(srcset.to_string()), "", false)
    }

    pub fn shows_placeholder(&self) -> bool {
        self.src == PLACEHOLDER_SRC
    }

    /// The class tag for the applied breakpoint, e.g. `"768"`.
    pub fn breakpoint_class(&self) -> Option<String> {
        self.applied_breakpoint.map(|bp| bp.to_string())
    }
}
