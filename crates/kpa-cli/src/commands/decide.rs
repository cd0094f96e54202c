use std::path::Path;

use anyhow::Context;
use tracing::info_span;

use kpa_core::{AutoscalerConfig, PodAutoscaler};
use kpa_deciders::{make_decider, Decider};

pub fn decide(pa_path: &Path, config_path: Option<&Path>, service: Option<&str>) -> anyhow::Result<()> {
    let pa = load_pod_autoscaler(pa_path)?;
    let config = load_config(config_path)?;
    let decider = resolve(&pa, &config, service)?;
    println!("{}", serde_json::to_string_pretty(&decider)?);
    Ok(())
}

pub fn load_pod_autoscaler(path: &Path) -> anyhow::Result<PodAutoscaler> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading PodAutoscaler {}", path.display()))?;
    let pa = serde_json::from_str(&content)
        .with_context(|| format!("parsing PodAutoscaler {}", path.display()))?;
    Ok(pa)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<AutoscalerConfig> {
    match path {
        Some(path) => AutoscalerConfig::from_file(path)
            .with_context(|| format!("loading autoscaler config {}", path.display())),
        None => Ok(AutoscalerConfig::default()),
    }
}

/// Resolve the Decider, using the PA's own service name unless overridden.
pub fn resolve(
    pa: &PodAutoscaler,
    config: &AutoscalerConfig,
    service: Option<&str>,
) -> anyhow::Result<Decider> {
    let service = service.unwrap_or(pa.spec.service_name.as_str());
    if service.is_empty() {
        anyhow::bail!("no service name: pass --service or set spec.serviceName");
    }
    let _span = info_span!("decide", pa = %pa.key()).entered();
    Ok(make_decider(pa, config, service))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PA_JSON: &str = r#"{
        "metadata": {
            "namespace": "default",
            "name": "hello-00001",
            "annotations": {"autoscaling.knative.dev/target": "4"}
        },
        "spec": {"containerConcurrency": 10, "serviceName": "hello-00001-metrics"}
    }"#;

    #[test]
    fn loads_pa_and_resolves_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pa.json");
        std::fs::write(&path, PA_JSON).unwrap();

        let pa = load_pod_autoscaler(&path).unwrap();
        let config = load_config(None).unwrap();
        let decider = resolve(&pa, &config, None).unwrap();

        assert_eq!(decider.spec.target_concurrency, 4.0);
        assert_eq!(decider.spec.panic_threshold, 8.0);
        assert_eq!(decider.spec.service_name, "hello-00001-metrics");
    }

    #[test]
    fn service_flag_overrides_pa() {
        let pa: PodAutoscaler = serde_json::from_str(PA_JSON).unwrap();
        let decider = resolve(&pa, &AutoscalerConfig::default(), Some("other")).unwrap();
        assert_eq!(decider.spec.service_name, "other");
    }

    #[test]
    fn missing_service_is_an_error() {
        let pa = PodAutoscaler::new("default", "bare");
        assert!(resolve(&pa, &AutoscalerConfig::default(), None).is_err());
    }

    #[test]
    fn config_file_feeds_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-autoscaler.toml");
        std::fs::write(&path, "panic-threshold-percentage = 300.0\n").unwrap();

        let pa: PodAutoscaler = serde_json::from_str(PA_JSON).unwrap();
        let config = load_config(Some(&path)).unwrap();
        let decider = resolve(&pa, &config, None).unwrap();
        assert_eq!(decider.spec.panic_threshold, 12.0);
    }

    #[test]
    fn bad_pa_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pa.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_pod_autoscaler(&path).unwrap_err();
        assert!(err.to_string().contains("parsing PodAutoscaler"));
    }
}
