//! Decider — resolved control-loop parameters for one revision.
//!
//! `DeciderFactory::make` is a pure mapping from a PA snapshot and the
//! cluster config to the desired Decider. It performs no I/O, never
//! mutates the PA, and has no error channel. Log records go to whatever
//! span the caller is in; the reconciler enters one per PA key.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kpa_core::{AutoscalerConfig, ObjectMeta, PodAutoscaler};

use crate::metric::{MetricBuilder, MetricSpec, WindowedMetricBuilder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decider {
    pub metadata: ObjectMeta,
    pub spec: DeciderSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeciderSpec {
    #[serde(with = "kpa_core::duration::text")]
    pub tick_interval: Duration,
    pub max_scale_up_rate: f64,
    /// Per-replica concurrency the loop steers toward.
    pub target_concurrency: f64,
    /// Absolute per-replica load that trips panic mode.
    pub panic_threshold: f64,
    pub metric_spec: MetricSpec,
    pub service_name: String,
}

impl Decider {
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn key(&self) -> String {
        self.metadata.key()
    }
}

/// Builds Deciders, delegating metric construction to `M`.
#[derive(Debug, Clone, Default)]
pub struct DeciderFactory<M = WindowedMetricBuilder> {
    metrics: M,
}

impl DeciderFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: MetricBuilder> DeciderFactory<M> {
    pub fn with_metric_builder(metrics: M) -> Self {
        Self { metrics }
    }

    /// Resolve the desired Decider for `pa`.
    ///
    /// The annotation target wins only when it does not exceed the target
    /// derived from container concurrency; a larger value is ignored with a
    /// warning since honouring it would under-provision the revision.
    pub fn make(
        &self,
        pa: &PodAutoscaler,
        config: &AutoscalerConfig,
        service_name: &str,
    ) -> Decider {
        let mut target = config.target_concurrency_for(pa.spec.container_concurrency);
        if let Some(annotated) = pa.target() {
            let annotated = f64::from(annotated);
            if annotated > target {
                warn!(
                    namespace = %pa.namespace(),
                    name = %pa.name(),
                    target = annotated,
                    ceiling = target,
                    "Ignoring target of {annotated} because it would underprovision the Revision."
                );
            } else {
                debug!(
                    namespace = %pa.namespace(),
                    name = %pa.name(),
                    target = annotated,
                    "Using target of {annotated}"
                );
                target = annotated;
            }
        }

        let panic_threshold_percentage = pa
            .panic_threshold_percentage()
            .unwrap_or(config.panic_threshold_percentage);
        let panic_threshold = target * panic_threshold_percentage / 100.0;

        let metric_spec = self.metrics.build(pa, config).spec;

        Decider {
            metadata: pa.metadata.clone(),
            spec: DeciderSpec {
                tick_interval: config.tick_interval,
                max_scale_up_rate: config.max_scale_up_rate,
                target_concurrency: target,
                panic_threshold,
                metric_spec,
                service_name: service_name.to_string(),
            },
        }
    }
}

/// Resolve a Decider with the default metric builder.
pub fn make_decider(pa: &PodAutoscaler, config: &AutoscalerConfig, service_name: &str) -> Decider {
    DeciderFactory::new().make(pa, config, service_name)
}
