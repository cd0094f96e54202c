//! Shared fixtures and a log-capturing subscriber for unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use kpa_core::{AutoscalerConfig, PodAutoscaler};

/// A PA with container concurrency 10 and no annotations.
pub fn pa() -> PodAutoscaler {
    PodAutoscaler::new("default", "hello-00001")
        .with_container_concurrency(10)
        .with_service_name("hello-00001-metrics")
}

/// Config with base target == container concurrency and a 200% panic threshold.
pub fn config() -> AutoscalerConfig {
    AutoscalerConfig {
        container_concurrency_target_percentage: 1.0,
        panic_threshold_percentage: 200.0,
        ..AutoscalerConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

#[derive(Clone, Default)]
struct CaptureLayer {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<LogRecord>) {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let records = layer.records.lock().unwrap().clone();
    (out, records)
}
