//! kpa-core — shared types for the KPA decider pipeline.
//!
//! Holds the inputs the decider factory reads:
//! - `PodAutoscaler`: per-revision scaling intent plus its annotations.
//! - `ObjectMeta`: namespace/name, labels, annotations, owner references.
//! - `AutoscalerConfig`: cluster-wide autoscaler policy, loaded from the
//!   `config-autoscaler` TOML document.

pub mod config;
pub mod duration;
pub mod error;
pub mod meta;
pub mod pod_autoscaler;

pub use config::AutoscalerConfig;
pub use error::{ConfigError, ConfigResult};
pub use meta::{split_key, ObjectMeta, OwnerReference};
pub use pod_autoscaler::{PodAutoscaler, PodAutoscalerSpec};
