//! CLI output formatting.
//!
//! Each report has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout.
//!
//! ## Pass report
//!
//! ```text
//! Viewport 800px @ 2x → breakpoint 768
//! 001 hero → hero_768_2x.jpg (high-density)
//! 002 promo → placeholder (no image for breakpoint)
//! 003 banner → unchanged (no candidate fits 2x)
//! Changed 2 of 3 targets
//! ```
//!
//! ## Check report
//!
//! ```text
//! 001 hero: 3 descriptors
//! 002 promo: 1 descriptor, 1 invalid token
//!     Invalid token: 30q
//! 003 bare: no descriptor list
//! ```

use crate::select::ApplyReason;
use crate::swap::{Outcome, PassReport};
use crate::target::SwapTarget;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn reason_label(reason: ApplyReason) -> &'static str {
    match reason {
        ApplyReason::HighDensity => "high-density",
        ApplyReason::LowDensity => "low-density",
        ApplyReason::BestAvailable => "best available",
        ApplyReason::NearestRatio => "nearest ratio",
    }
}

/// Format a pass report: one line per target plus a summary.
pub fn format_pass_report(report: &PassReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Viewport {}px @ {}x \u{2192} breakpoint {}",
        report.viewport.width, report.viewport.dpr, report.breakpoint
    )];

    for (i, target) in report.targets.iter().enumerate() {
        let detail = match &target.outcome {
            Outcome::Applied { url, reason } => format!("{} ({})", url, reason_label(*reason)),
            Outcome::Removed => "placeholder (no image fits the display density)".to_string(),
            Outcome::NoMatch => "placeholder (no image for breakpoint)".to_string(),
            Outcome::Unresolved => format!(
                "unchanged (no candidate fits {}x)",
                report.viewport.dpr
            ),
            Outcome::MissingDescriptors => "placeholder (no descriptor list)".to_string(),
        };
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            target.id,
            detail
        ));
    }

    lines.push(format!(
        "Changed {} of {}",
        report.changed(),
        plural(report.targets.len(), "target")
    ));
    lines
}

/// Print pass report to stdout.
pub fn print_pass_report(report: &PassReport) {
    for line in format_pass_report(report) {
        println!("{}", line);
    }
}

/// Format the parse state of every bound target.
pub fn format_check_report(targets: &[SwapTarget]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, target) in targets.iter().enumerate() {
        let header = format!("{} {}", format_index(i + 1), target.id);
        if target.srcset.is_none() {
            lines.push(format!("{}: no descriptor list", header));
            continue;
        }
        let mut summary = plural(target.descriptors.len(), "descriptor");
        if !target.parse_errors.is_empty() {
            summary.push_str(&format!(
                ", {}",
                plural(target.parse_errors.len(), "invalid token")
            ));
        }
        lines.push(format!("{}: {}", header, summary));
        for error in &target.parse_errors {
            lines.push(format!("    Invalid token: {}", error.raw_token));
        }
    }
    if targets.is_empty() {
        lines.push("No targets bound".to_string());
    }
    lines
}

/// Print check report to stdout.
pub fn print_check_report(targets: &[SwapTarget]) {
    for line in format_check_report(targets) {
        println!("{}", line);
    }
}
