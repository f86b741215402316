//! Orchestration: classify → select → execute for every bound target.
//!
//! [`run_pass`] is the stateless core. It takes the targets, one viewport
//! reading and the configured policies, and returns a [`PassReport`] describing
//! what happened to each target. [`ImageSwap`] wraps it with the event-driven
//! state a host needs:
//!
//! | Trigger | Method | Behavior |
//! |---|---|---|
//! | startup | [`ImageSwap::init`] | one full pass |
//! | window resize | [`ImageSwap::on_resize`] | throttled pass (leading edge) |
//! | timer | [`ImageSwap::on_timer`] | trailing throttled pass |
//! | density timer | [`ImageSwap::on_density_tick`] | pass when the density class flips |
//! | native density event | [`ImageSwap::on_density_change`] | pass when the density class flips |
//!
//! Everything runs synchronously on the caller's thread, and passes never
//! overlap. Targets are processed in registration order and independently of
//! each other: a broken descriptor list on one target only affects that target.

use crate::breakpoint::BreakpointSet;
use crate::config::{ConfigError, SwapConfig};
use crate::executor::{Mutation, SwapExecutor};
use crate::select::{ApplyReason, Selection, SelectionPolicy, select};
use crate::target::SwapTarget;
use crate::throttle::Throttle;
use crate::viewport::{DensityMonitor, StaticViewport, Viewport};
use serde::Serialize;
use std::time::Instant;

/// What a pass did to one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Applied { url: String, reason: ApplyReason },
    /// Single candidate fit no density rule; placeholder shown.
    Removed,
    /// No descriptor width equals the active breakpoint; placeholder shown.
    NoMatch,
    /// Several candidates fit no density rule; target left as it was.
    Unresolved,
    /// Target has no descriptor list; placeholder shown.
    MissingDescriptors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub mutation: Mutation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub viewport: StaticViewport,
    pub breakpoint: u32,
    pub targets: Vec<TargetOutcome>,
}

impl PassReport {
    pub fn changed(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.mutation == Mutation::Changed)
            .count()
    }

    pub fn find(&self, id: &str) -> Option<&TargetOutcome> {
        self.targets.iter().find(|t| t.id == id)
    }
}

/// Log every invalid descriptor token carried by `targets` at `warn` level.
///
/// Returns the number of tokens reported. [`ImageSwap::new`] calls this once at
/// bind time; hosts driving [`run_pass`] directly should do the same, since
/// passes do not repeat the warnings.
pub fn report_parse_errors(targets: &[SwapTarget]) -> usize {
    let mut reported = 0;
    for target in targets {
        for error in &target.parse_errors {
            tracing::warn!(
                target_id = %target.id,
                token = %error.raw_token,
                "invalid descriptor token"
            );
            reported += 1;
        }
    }
    reported
}

/// Run one pass over `targets` for a single viewport reading.
///
/// The active breakpoint depends only on the viewport, so it is classified
/// once and shared by every target. Invalid tokens are not logged here; see
/// [`report_parse_errors`].
pub fn run_pass(
    targets: &mut [SwapTarget],
    viewport: StaticViewport,
    breakpoints: &BreakpointSet,
    policy: &SelectionPolicy,
    executor: &SwapExecutor,
) -> PassReport {
    let breakpoint = breakpoints.classify(viewport.width);
    let outcomes = targets
        .iter_mut()
        .map(|target| swap_target(target, viewport.dpr, breakpoint, policy, executor))
        .collect();

    let report = PassReport {
        viewport,
        breakpoint,
        targets: outcomes,
    };
    tracing::debug!(
        width = viewport.width,
        dpr = viewport.dpr,
        breakpoint,
        targets = report.targets.len(),
        changed = report.changed(),
        "swap pass complete"
    );
    report
}

fn swap_target(
    target: &mut SwapTarget,
    dpr: f64,
    breakpoint: u32,
    policy: &SelectionPolicy,
    executor: &SwapExecutor,
) -> TargetOutcome {
    if target.srcset.is_none() {
        tracing::error!(
            target_id = %target.id,
            "target has no descriptor list, showing placeholder"
        );
        let mutation = executor.remove(target);
        return TargetOutcome {
            id: target.id.clone(),
            outcome: Outcome::MissingDescriptors,
            mutation,
        };
    }

    let selection = select(breakpoint, dpr, &target.descriptors, policy);
    let outcome = match &selection {
        Selection::Apply {
            descriptor, reason, ..
        } => {
            if matches!(reason, ApplyReason::BestAvailable | ApplyReason::NearestRatio) {
                tracing::warn!(
                    target_id = %target.id,
                    breakpoint,
                    dpr,
                    url = %descriptor.url,
                    "no image matches the device resolution, using best available"
                );
            }
            Outcome::Applied {
                url: descriptor.url.clone(),
                reason: *reason,
            }
        }
        Selection::Remove => {
            tracing::warn!(
                target_id = %target.id,
                breakpoint,
                dpr,
                "no image matches the device resolution, hiding"
            );
            Outcome::Removed
        }
        Selection::NoMatch { .. } => {
            tracing::error!(
                target_id = %target.id,
                breakpoint,
                "no image found for breakpoint, add a descriptor with a matching width"
            );
            Outcome::NoMatch
        }
        Selection::Unresolved => {
            tracing::warn!(
                target_id = %target.id,
                breakpoint,
                dpr,
                "several images for breakpoint but none matches the device resolution"
            );
            Outcome::Unresolved
        }
    };

    let mutation = executor.execute(target, &selection);
    TargetOutcome {
        id: target.id.clone(),
        outcome,
        mutation,
    }
}

/// Event-driven driver owning the bound targets.
#[derive(Debug)]
pub struct ImageSwap {
    config: SwapConfig,
    breakpoints: BreakpointSet,
    policy: SelectionPolicy,
    executor: SwapExecutor,
    targets: Vec<SwapTarget>,
    resize: Throttle<StaticViewport>,
    density: Option<DensityMonitor>,
}

impl ImageSwap {
    /// Validate `config` and take ownership of `targets`.
    ///
    /// Fails on configuration errors such as an empty breakpoint set. Parse
    /// errors in individual targets are reported and do not fail setup.
    pub fn new(config: SwapConfig, targets: Vec<SwapTarget>) -> Result<Self, ConfigError> {
        config.validate()?;
        let breakpoints = config.breakpoint_set()?;

        report_parse_errors(&targets);

        let density = config
            .monitor_pixel_density
            .then(|| DensityMonitor::new(config.interval()));

        Ok(Self {
            policy: config.selection_policy(),
            executor: config.executor(),
            resize: Throttle::new(config.interval()),
            breakpoints,
            targets,
            density,
            config,
        })
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn breakpoints(&self) -> &BreakpointSet {
        &self.breakpoints
    }

    pub fn targets(&self) -> &[SwapTarget] {
        &self.targets
    }

    pub fn into_targets(self) -> Vec<SwapTarget> {
        self.targets
    }

    /// Run one pass immediately, bypassing the throttle.
    pub fn run(&mut self, viewport: &dyn Viewport) -> PassReport {
        run_pass(
            &mut self.targets,
            viewport.snapshot(),
            &self.breakpoints,
            &self.policy,
            &self.executor,
        )
    }

    /// Startup pass. Also seeds the density monitor when enabled.
    pub fn init(&mut self, now: Instant, viewport: &dyn Viewport) -> PassReport {
        if let Some(monitor) = &mut self.density {
            monitor.seed(viewport.device_pixel_ratio(), now);
        }
        self.run(viewport)
    }

    /// Viewport resized. Runs a pass on the leading edge of an idle period;
    /// later calls are coalesced into [`on_timer`](Self::on_timer).
    pub fn on_resize(&mut self, now: Instant, viewport: &dyn Viewport) -> Option<PassReport> {
        let snapshot = self.resize.call(now, viewport.snapshot())?;
        Some(self.run(&snapshot))
    }

    /// Throttle timer. Runs the trailing pass with the latest resize reading.
    pub fn on_timer(&mut self, now: Instant) -> Option<PassReport> {
        let snapshot = self.resize.poll(now)?;
        Some(self.run(&snapshot))
    }

    /// Density poll. Runs a pass when the density class changed since the
    /// last sample. No-op unless `monitor_pixel_density` is set.
    pub fn on_density_tick(&mut self, now: Instant, viewport: &dyn Viewport) -> Option<PassReport> {
        let class = self.density.as_mut()?.poll(now, viewport)?;
        tracing::info!(density = ?class, "display density changed");
        Some(self.run(viewport))
    }

    /// Native density notification. Same flip semantics as the poll, without
    /// the interval gate.
    pub fn on_density_change(&mut self, viewport: &dyn Viewport) -> Option<PassReport> {
        let class = self
            .density
            .as_mut()?
            .observe(viewport.device_pixel_ratio())?;
        tracing::info!(density = ?class, "display density changed");
        Some(self.run(viewport))
    }

    /// Earliest instant at which `on_timer` or `on_density_tick` has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        let density = self.density.as_ref().and_then(DensityMonitor::next_sample);
        match (self.resize.deadline(), density) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
