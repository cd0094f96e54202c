//! PodAutoscaler — per-revision scaling intent.
//!
//! The PA's `spec` carries the revision's container concurrency; everything the
//! user can tune per revision travels as `autoscaling.knative.dev/*`
//! annotations. The accessors below parse those annotations and report an
//! absent or unparseable value as `None`. They do not range-check: a
//! `target` of `0` or `-5` is returned as present.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::duration::parse_duration;
use crate::meta::ObjectMeta;

/// Selects the autoscaler implementation that owns a PA.
pub const CLASS_ANNOTATION_KEY: &str = "autoscaling.knative.dev/class";
/// The class handled by the decider pipeline.
pub const KPA_CLASS: &str = "kpa.autoscaling.knative.dev";

/// Requested per-replica target concurrency (integer).
pub const TARGET_ANNOTATION_KEY: &str = "autoscaling.knative.dev/target";
/// Panic threshold as a percentage of the target (float, typically > 100).
pub const PANIC_THRESHOLD_PERCENTAGE_ANNOTATION_KEY: &str =
    "autoscaling.knative.dev/panicThresholdPercentage";
/// Panic window as a percentage of the stable window (float).
pub const PANIC_WINDOW_PERCENTAGE_ANNOTATION_KEY: &str =
    "autoscaling.knative.dev/panicWindowPercentage";
/// Stable window override (duration text).
pub const WINDOW_ANNOTATION_KEY: &str = "autoscaling.knative.dev/window";
/// Metric the autoscaler observes.
pub const METRIC_ANNOTATION_KEY: &str = "autoscaling.knative.dev/metric";

/// A PodAutoscaler snapshot as seen by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAutoscaler {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodAutoscalerSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAutoscalerSpec {
    /// In-flight requests one replica can sustain. `0` means unbounded.
    #[serde(default)]
    pub container_concurrency: u32,
    /// The workload being scaled (e.g. the revision's Deployment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_target_ref: Option<String>,
    /// Service whose endpoints expose the revision's metrics.
    #[serde(default)]
    pub service_name: String,
}

impl PodAutoscaler {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec: PodAutoscalerSpec::default(),
        }
    }

    pub fn with_container_concurrency(mut self, container_concurrency: u32) -> Self {
        self.spec.container_concurrency = container_concurrency;
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.spec.service_name = service_name.into();
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn key(&self) -> String {
        self.metadata.key()
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.get(key).map(String::as_str)
    }

    fn parse_annotation<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.annotation(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                debug!(pa = %self.key(), annotation = key, value = raw, "ignoring unparseable annotation");
                None
            }
        }
    }

    /// Autoscaler class, defaulting to the KPA class.
    pub fn class(&self) -> &str {
        self.annotation(CLASS_ANNOTATION_KEY).unwrap_or(KPA_CLASS)
    }

    /// Metric to scale on, if overridden.
    pub fn metric(&self) -> Option<&str> {
        self.annotation(METRIC_ANNOTATION_KEY)
    }

    /// Requested target concurrency.
    pub fn target(&self) -> Option<i32> {
        self.parse_annotation(TARGET_ANNOTATION_KEY)
    }

    pub fn panic_threshold_percentage(&self) -> Option<f64> {
        self.parse_annotation(PANIC_THRESHOLD_PERCENTAGE_ANNOTATION_KEY)
    }

    pub fn panic_window_percentage(&self) -> Option<f64> {
        self.parse_annotation(PANIC_WINDOW_PERCENTAGE_ANNOTATION_KEY)
    }

    /// Stable window override.
    pub fn window(&self) -> Option<Duration> {
        let raw = self.annotation(WINDOW_ANNOTATION_KEY)?;
        match parse_duration(raw) {
            Ok(window) => Some(window),
            Err(e) => {
                debug!(pa = %self.key(), error = %e, "ignoring unparseable window annotation");
                None
            }
        }
    }
}
