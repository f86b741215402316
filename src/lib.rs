//! # image-swap
//!
//! Picks which of several candidate image sources a placeholder should show,
//! based on the viewport width and the display's pixel density. Candidates come
//! from a compact descriptor list attached to each image, in the spirit of
//! HTML `srcset`:
//!
//! ```text
//! cat_480.jpg 480w, cat_480_2x.jpg 480w 2x, cat_768.jpg 768w, cat_1024.jpg 1024w
//! ```
//!
//! The crate only decides *which URL* to use. It never fetches anything.
//!
//! # Pipeline
//!
//! ```text
//! descriptor list ──parse──► descriptors
//! viewport width  ──classify──► active breakpoint
//! (breakpoint, dpr, descriptors) ──select──► Selection
//! Selection ──execute──► SwapTarget state (src, breakpoint tag, hidden)
//! ```
//!
//! Each arrow is a pure function except the last, and only the executor
//! mutates targets.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`descriptor`] | Descriptor-list grammar: URL plus `w`/`h`/`x` size tokens |
//! | [`breakpoint`] | Viewport width → active breakpoint (floor match, mobile clamp) |
//! | [`select`] | Exact-width candidates, density rules, fallback policy |
//! | [`executor`] | Applies selections to targets; placeholder and reveal handling |
//! | [`target`] | `SwapTarget` record and the placeholder image |
//! | [`swap`] | Orchestrator: passes, throttled resize, density monitoring |
//! | [`throttle`] | Clock-injected leading/trailing throttle |
//! | [`viewport`] | Viewport provider trait and density classification |
//! | [`config`] | `image-swap.toml` loading, merging, and validation |
//! | [`manifest`] | JSON targets manifest and container-class binding |
//! | [`render`] | `<img>` markup for targets, via Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact-Width Matching
//!
//! A descriptor is a candidate only when its width *equals* the active
//! breakpoint. Markup therefore lists one entry per breakpoint it serves. See
//! [`select`] for the full rule set.
//!
//! ## No Ambient Globals
//!
//! Nothing reads a window, a clock, or a DOM. The viewport comes in through the
//! [`viewport::Viewport`] trait and time comes in as `Instant` arguments, so
//! the whole decision path is testable without a browser.
//!
//! ## Recoverable by Default
//!
//! Broken descriptor lists, missing lists, and uncovered breakpoints degrade a
//! single target to the placeholder and are reported through `tracing`. Only
//! configuration errors (such as an empty breakpoint set) stop setup.

pub mod breakpoint;
pub mod config;
pub mod descriptor;
pub mod executor;
pub mod manifest;
pub mod output;
pub mod render;
pub mod select;
pub mod swap;
pub mod target;
pub mod throttle;
pub mod viewport;

pub use breakpoint::{BreakpointSet, classify};
pub use config::SwapConfig;
pub use descriptor::{Descriptor, ParseError, parse_fragment, parse_list};
pub use executor::SwapExecutor;
pub use select::{Selection, SelectionPolicy, select};
pub use swap::{ImageSwap, PassReport, report_parse_errors, run_pass};
pub use target::{PLACEHOLDER_SRC, SwapTarget};
pub use viewport::{StaticViewport, Viewport};

#[cfg(test)]
pub(crate) mod test_helpers;
