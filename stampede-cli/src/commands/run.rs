//! `stampede run`: one stage in the foreground

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use stampede_config::ConfigLoader;
use stampede_stage::{run_stage, RunReport, StageError};
use stampede_storage::RepositoryConnector;

/// Load, validate and run the stage described by `file`
pub async fn run_from_file(file: &Path, connector: &dyn RepositoryConnector) -> Result<RunReport> {
    info!("Loading stage submission from {:?}", file);
    let submission = ConfigLoader::new()
        .load_submission(file)
        .with_context(|| format!("Invalid stage submission {:?}", file))?;

    let repository = connector
        .connect(&submission.data_source)
        .await
        .map_err(StageError::Connection)?;

    let report = run_stage(&submission.stage, repository).await?;
    Ok(report)
}

/// Run the stage, print its report and optionally save it
pub async fn handle_run(file: &Path, output: Option<&PathBuf>, connector: &dyn RepositoryConnector) -> Result<()> {
    let report = run_from_file(file, connector).await?;
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;

    if let Some(path) = output {
        fs::write(path, &json).with_context(|| format!("Failed to write report to {:?}", path))?;
        info!("Report written to {:?}", path);
    }
    println!("{}", json);
    Ok(())
}
