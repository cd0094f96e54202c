//! Cluster-wide autoscaler config (`config-autoscaler`).
//!
//! The on-disk form is a flat TOML table with kebab-case keys, mirroring the
//! cluster ConfigMap:
//!
//! ```toml
//! container-concurrency-target-percentage = 1.0
//! container-concurrency-target-default = 100.0
//! max-scale-up-rate = 10.0
//! stable-window = "60s"
//! panic-window-percentage = 10.0
//! panic-threshold-percentage = 200.0
//! tick-interval = "2s"
//! scale-to-zero-grace-period = "30s"
//! enable-scale-to-zero = true
//! ```
//!
//! Every key is optional; omitted keys take the defaults below. Loading
//! always validates.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::duration::{format_duration, parse_duration};
use crate::error::{ConfigError, ConfigResult};

/// Shortest stable window the metric pipeline can aggregate over.
pub const MIN_STABLE_WINDOW: Duration = Duration::from_secs(6);

/// Resolved cluster autoscaler policy.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoscalerConfig {
    /// Fraction of container concurrency used as the target, in `(0, 1]`.
    pub container_concurrency_target_percentage: f64,
    /// Target used when container concurrency is unbounded (`0`).
    pub container_concurrency_target_default: f64,
    /// Upper bound on per-tick multiplicative growth.
    pub max_scale_up_rate: f64,
    pub stable_window: Duration,
    pub panic_window_percentage: f64,
    pub panic_threshold_percentage: f64,
    /// Control-loop cadence.
    pub tick_interval: Duration,
    pub scale_to_zero_grace_period: Duration,
    pub enable_scale_to_zero: bool,
}

impl Default for AutoscalerConfig {
    fn default() -> Self {
        Self {
            container_concurrency_target_percentage: 1.0,
            container_concurrency_target_default: 100.0,
            max_scale_up_rate: 10.0,
            stable_window: Duration::from_secs(60),
            panic_window_percentage: 10.0,
            panic_threshold_percentage: 200.0,
            tick_interval: Duration::from_secs(2),
            scale_to_zero_grace_period: Duration::from_secs(30),
            enable_scale_to_zero: true,
        }
    }
}

/// TOML representation. Durations are kept as text until resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutoscalerConfigFile {
    pub container_concurrency_target_percentage: Option<f64>,
    pub container_concurrency_target_default: Option<f64>,
    pub max_scale_up_rate: Option<f64>,
    pub stable_window: Option<String>,
    pub panic_window_percentage: Option<f64>,
    pub panic_threshold_percentage: Option<f64>,
    pub tick_interval: Option<String>,
    pub scale_to_zero_grace_period: Option<String>,
    pub enable_scale_to_zero: Option<bool>,
}

impl AutoscalerConfig {
    /// The target concurrency a revision with the given container
    /// concurrency can sustain. Annotation targets may not exceed it.
    pub fn target_concurrency_for(&self, container_concurrency: u32) -> f64 {
        if container_concurrency == 0 {
            return self.container_concurrency_target_default;
        }
        f64::from(container_concurrency) * self.container_concurrency_target_percentage
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(?path, "autoscaler config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let file: AutoscalerConfigFile = toml::from_str(content)?;
        Self::resolve(file)
    }

    /// Apply defaults to a parsed file and validate the result.
    pub fn resolve(file: AutoscalerConfigFile) -> ConfigResult<Self> {
        let defaults = Self::default();
        let duration_or = |value: Option<String>, default: Duration| match value {
            Some(text) => parse_duration(&text),
            None => Ok(default),
        };

        let config = Self {
            container_concurrency_target_percentage: file
                .container_concurrency_target_percentage
                .unwrap_or(defaults.container_concurrency_target_percentage),
            container_concurrency_target_default: file
                .container_concurrency_target_default
                .unwrap_or(defaults.container_concurrency_target_default),
            max_scale_up_rate: file.max_scale_up_rate.unwrap_or(defaults.max_scale_up_rate),
            stable_window: duration_or(file.stable_window, defaults.stable_window)?,
            panic_window_percentage: file
                .panic_window_percentage
                .unwrap_or(defaults.panic_window_percentage),
            panic_threshold_percentage: file
                .panic_threshold_percentage
                .unwrap_or(defaults.panic_threshold_percentage),
            tick_interval: duration_or(file.tick_interval, defaults.tick_interval)?,
            scale_to_zero_grace_period: duration_or(
                file.scale_to_zero_grace_period,
                defaults.scale_to_zero_grace_period,
            )?,
            enable_scale_to_zero: file
                .enable_scale_to_zero
                .unwrap_or(defaults.enable_scale_to_zero),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the policy is internally consistent.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &'static str, reason: String| ConfigError::Invalid { field, reason };

        let pct = self.container_concurrency_target_percentage;
        if !(pct > 0.0 && pct <= 1.0) {
            return Err(invalid(
                "container-concurrency-target-percentage",
                format!("{pct} must be in (0, 1]"),
            ));
        }
        let default_target = self.container_concurrency_target_default;
        if !(default_target > 0.0 && default_target.is_finite()) {
            return Err(invalid(
                "container-concurrency-target-default",
                format!("{default_target} must be positive"),
            ));
        }
        if !(self.max_scale_up_rate > 1.0 && self.max_scale_up_rate.is_finite()) {
            return Err(invalid(
                "max-scale-up-rate",
                format!("{} must be greater than 1", self.max_scale_up_rate),
            ));
        }
        if self.stable_window < MIN_STABLE_WINDOW {
            return Err(invalid(
                "stable-window",
                format!("{} must be at least 6s", format_duration(self.stable_window)),
            ));
        }
        let window_pct = self.panic_window_percentage;
        if !(1.0..=100.0).contains(&window_pct) {
            return Err(invalid(
                "panic-window-percentage",
                format!("{window_pct} must be in [1, 100]"),
            ));
        }
        let threshold_pct = self.panic_threshold_percentage;
        if !(threshold_pct >= 110.0 && threshold_pct.is_finite()) {
            return Err(invalid(
                "panic-threshold-percentage",
                format!("{threshold_pct} must be at least 110"),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(invalid("tick-interval", "must be positive".to_string()));
        }
        if self.scale_to_zero_grace_period < MIN_STABLE_WINDOW {
            return Err(invalid(
                "scale-to-zero-grace-period",
                format!(
                    "{} must be at least 6s",
                    format_duration(self.scale_to_zero_grace_period)
                ),
            ));
        }
        Ok(())
    }

    /// Fully-populated file form of this config.
    pub fn to_file(&self) -> AutoscalerConfigFile {
        AutoscalerConfigFile {
            container_concurrency_target_percentage: Some(
                self.container_concurrency_target_percentage,
            ),
            container_concurrency_target_default: Some(self.container_concurrency_target_default),
            max_scale_up_rate: Some(self.max_scale_up_rate),
            stable_window: Some(format_duration(self.stable_window)),
            panic_window_percentage: Some(self.panic_window_percentage),
            panic_threshold_percentage: Some(self.panic_threshold_percentage),
            tick_interval: Some(format_duration(self.tick_interval)),
            scale_to_zero_grace_period: Some(format_duration(self.scale_to_zero_grace_period)),
            enable_scale_to_zero: Some(self.enable_scale_to_zero),
        }
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.to_file())?)
    }
}
