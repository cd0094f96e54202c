use std::path::Path;

use kpa_core::AutoscalerConfig;

pub fn defaults() -> anyhow::Result<()> {
    print!("{}", AutoscalerConfig::default().to_toml_string()?);
    Ok(())
}

pub fn validate(path: &Path) -> anyhow::Result<()> {
    let config = AutoscalerConfig::from_file(path)?;
    tracing::debug!(?config, "config resolved");
    println!("✓ {} is valid", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-autoscaler.toml");
        std::fs::write(&path, AutoscalerConfig::default().to_toml_string().unwrap()).unwrap();

        validate(&path).unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-autoscaler.toml");
        std::fs::write(&path, "max-scale-up-rate = 0.5\n").unwrap();

        let err = validate(&path).unwrap_err();
        assert!(err.to_string().contains("max-scale-up-rate"));
    }
}
