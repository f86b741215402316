//! Viewport and pixel-density provider.
//!
//! The [`Viewport`] trait is the only way the orchestrator learns about the
//! display. Hosts implement it over whatever window system they have. Tests
//! and the CLI use [`StaticViewport`].
//!
//! Density changes (a window dragged to another monitor) are tracked by
//! [`DensityMonitor`] using the coarse [`DensityClass`], not the raw ratio.
//! Hosts with a native change notification call [`DensityMonitor::observe`]
//! directly. Others call [`DensityMonitor::poll`] from a timer, which samples
//! at most once per interval.

use crate::select::HIGH_DENSITY_THRESHOLD;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Source of the current viewport width and device pixel ratio.
pub trait Viewport {
    /// Logical viewport width in px.
    fn width(&self) -> u32;

    /// Physical-to-logical pixel ratio.
    fn device_pixel_ratio(&self) -> f64;

    fn snapshot(&self) -> StaticViewport {
        StaticViewport::new(self.width(), self.device_pixel_ratio())
    }
}

/// A fixed viewport reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaticViewport {
    pub width: u32,
    pub dpr: f64,
}

impl StaticViewport {
    /// Non-finite or non-positive ratios are read as `1.0`.
    pub fn new(width: u32, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self { width, dpr }
    }
}

impl Viewport for StaticViewport {
    fn width(&self) -> u32 {
        self.width
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DensityClass {
    Standard,
    High,
}

impl DensityClass {
    pub fn of(dpr: f64) -> Self {
        if dpr >= HIGH_DENSITY_THRESHOLD {
            Self::High
        } else {
            Self::Standard
        }
    }
}

/// Detects flips of the coarse density class.
#[derive(Debug, Clone)]
pub struct DensityMonitor {
    interval: Duration,
    current: Option<DensityClass>,
    next_sample: Option<Instant>,
}

impl DensityMonitor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            current: None,
            next_sample: None,
        }
    }

    pub fn current(&self) -> Option<DensityClass> {
        self.current
    }

    /// When the next poll will actually sample.
    pub fn next_sample(&self) -> Option<Instant> {
        self.next_sample
    }

    /// Record the class of `dpr` without reporting a change.
    pub fn seed(&mut self, dpr: f64, now: Instant) {
        self.current = Some(DensityClass::of(dpr));
        self.next_sample = Some(now + self.interval);
    }

    /// Feed a new ratio. Returns the new class when it differs from the last
    /// one seen. The first observation only seeds.
    pub fn observe(&mut self, dpr: f64) -> Option<DensityClass> {
        let class = DensityClass::of(dpr);
        match self.current.replace(class) {
            Some(previous) if previous != class => Some(class),
            _ => None,
        }
    }

    /// Clock-driven fallback: sample `viewport` if the interval has elapsed.
    pub fn poll(&mut self, now: Instant, viewport: &dyn Viewport) -> Option<DensityClass> {
        if self.next_sample.is_some_and(|at| now < at) {
            return None;
        }
        self.next_sample = Some(now + self.interval);
        self.observe(viewport.device_pixel_ratio())
    }
}
