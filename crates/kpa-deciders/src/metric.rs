//! Metric — the windows the autoscaler aggregates concurrency over.
//!
//! The decider embeds a `MetricSpec` without inspecting it. Building one is
//! delegated to a `MetricBuilder` so the reconciler (or a test) can supply
//! its own.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use kpa_core::{AutoscalerConfig, ObjectMeta, PodAutoscaler};

/// Granularity of the stat buckets; no window may be shorter.
pub const BUCKET_SIZE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    #[serde(with = "kpa_core::duration::text")]
    pub stable_window: Duration,
    #[serde(with = "kpa_core::duration::text")]
    pub panic_window: Duration,
    /// Service scraped for concurrency stats.
    pub scrape_target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metadata: ObjectMeta,
    pub spec: MetricSpec,
}

/// Produces the metric a PA should be observed with.
pub trait MetricBuilder {
    fn build(&self, pa: &PodAutoscaler, config: &AutoscalerConfig) -> Metric;
}

impl<F> MetricBuilder for F
where
    F: Fn(&PodAutoscaler, &AutoscalerConfig) -> Metric,
{
    fn build(&self, pa: &PodAutoscaler, config: &AutoscalerConfig) -> Metric {
        self(pa, config)
    }
}

/// Derives the stable and panic windows from annotations, falling back on
/// cluster config.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowedMetricBuilder;

impl MetricBuilder for WindowedMetricBuilder {
    fn build(&self, pa: &PodAutoscaler, config: &AutoscalerConfig) -> Metric {
        let stable_window = pa.window().unwrap_or(config.stable_window);
        let panic_window_percentage = pa
            .panic_window_percentage()
            .unwrap_or(config.panic_window_percentage);

        // Rounded to whole seconds; NaN and negatives collapse to zero.
        let secs = (stable_window.as_secs_f64() * panic_window_percentage / 100.0)
            .round()
            .max(0.0);
        let mut panic_window = Duration::try_from_secs_f64(secs).unwrap_or(stable_window);
        if panic_window < BUCKET_SIZE {
            debug!(
                pa = %pa.key(),
                requested = ?panic_window,
                using = ?BUCKET_SIZE,
                "panic window too small, using bucket size"
            );
            panic_window = BUCKET_SIZE;
        }

        Metric {
            metadata: pa.metadata.clone(),
            spec: MetricSpec {
                stable_window,
                panic_window,
                scrape_target: pa.spec.service_name.clone(),
            },
        }
    }
}

/// Build a metric with the default windowed builder.
pub fn make_metric(pa: &PodAutoscaler, config: &AutoscalerConfig) -> Metric {
    WindowedMetricBuilder.build(pa, config)
}
