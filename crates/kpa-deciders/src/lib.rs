//! kpa-deciders — resolves PodAutoscalers into Deciders.
//!
//! A `Decider` is the parameter bundle the per-revision autoscaling loop
//! runs on. The factory reconciles three sources of truth into it:
//!
//! ```text
//! base   = config.target_concurrency_for(pa.container_concurrency)
//! target = pa.target annotation if <= base, else base (warn)
//! panic  = target * (pa.panicThresholdPercentage or config) / 100
//! ```
//!
//! An annotation can only lower the target, never raise it above what the
//! container can handle.
//!
//! The `Deciders` trait is the registry contract the reconciler applies the
//! desired Decider against; `InMemoryDeciders` implements it with change
//! notification, and `reconcile` holds the diff-apply step.

pub mod decider;
pub mod error;
pub mod memory;
pub mod metric;
pub mod reconcile;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use decider::{make_decider, Decider, DeciderFactory, DeciderSpec};
pub use error::{DecidersError, DecidersResult};
pub use memory::InMemoryDeciders;
pub use metric::{make_metric, Metric, MetricBuilder, MetricSpec, WindowedMetricBuilder};
pub use reconcile::{reconcile_decider, reconcile_pod_autoscaler, remove_decider};
pub use registry::{Deciders, Watcher};
