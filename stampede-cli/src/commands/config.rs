//! `stampede config`: validate and generate configuration files

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use stampede_config::{ConfigLoader, StageSubmission, StampedeConfig};

use crate::cli::ConfigKind;

pub fn handle_config_validate(config_file: &Path, kind: ConfigKind) -> Result<()> {
    info!("Validating {:?} configuration file: {:?}", kind, config_file);

    if !config_file.exists() {
        return Err(anyhow!("Configuration file not found: {:?}", config_file));
    }

    let loader = ConfigLoader::new();
    match kind {
        ConfigKind::Service => {
            loader.from_file(config_file)?;
        }
        ConfigKind::Submission => {
            loader.load_submission(config_file)?;
        }
    }

    println!("Configuration file is valid");
    Ok(())
}

pub fn handle_config_generate(kind: ConfigKind, output: Option<&PathBuf>, force: bool) -> Result<()> {
    let as_json = output.is_some_and(|path| path.extension().is_some_and(|ext| ext == "json"));
    let content = sample_document(kind, as_json)?;

    let Some(path) = output else {
        print!("{}", content);
        return Ok(());
    };

    info!("Generating {:?} configuration at: {:?}", kind, path);
    if path.exists() && !force {
        return Err(anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            path
        ));
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

    println!("Configuration written to {:?}", path);
    Ok(())
}

fn sample_document(kind: ConfigKind, as_json: bool) -> Result<String> {
    let content = match (kind, as_json) {
        (ConfigKind::Service, false) => StampedeConfig::generate_sample(),
        (ConfigKind::Service, true) => serde_json::to_string_pretty(&StampedeConfig::default())?,
        (ConfigKind::Submission, false) => serde_yaml::to_string(&StageSubmission::sample())?,
        (ConfigKind::Submission, true) => serde_json::to_string_pretty(&StageSubmission::sample())?,
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_samples_validate() {
        let dir = tempfile::tempdir().unwrap();

        for (kind, name) in [
            (ConfigKind::Service, "stampede.yaml"),
            (ConfigKind::Service, "stampede.json"),
            (ConfigKind::Submission, "stage.yaml"),
            (ConfigKind::Submission, "stage.json"),
        ] {
            let path = dir.path().join(name);
            handle_config_generate(kind, Some(&path), false).unwrap();
            handle_config_validate(&path, kind).unwrap();
        }
    }

    #[test]
    fn generate_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stage.json");
        fs::write(&path, "{}").unwrap();

        let err = handle_config_generate(ConfigKind::Submission, Some(&path), false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        handle_config_generate(ConfigKind::Submission, Some(&path), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("collection_name"));
    }

    #[test]
    fn validate_reports_missing_submission_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stage.json");
        fs::write(&path, r#"{"data_source": {"kind": "memory", "collection_name": "stores"}}"#).unwrap();

        let err = handle_config_validate(&path, ConfigKind::Submission).unwrap_err();
        assert!(err.to_string().contains("max_pool_size is required"));
        assert!(handle_config_validate(&dir.path().join("missing.yaml"), ConfigKind::Service).is_err());
    }
}
