//! Stage workflow from a submission file to a report, as the CLI drives it

use anyhow::Result;
use std::sync::Arc;

use stampede_config::{ConfigLoader, StageSubmission};
use stampede_interfaces::Repository;
use stampede_stage::{run_stage, StageController};
use stampede_storage::{connect, PoolStats};

fn write_submission(dir: &tempfile::TempDir, collection_size: u32) -> Result<std::path::PathBuf> {
    let path = dir.path().join(format!("stage-{}.yaml", collection_size));
    let yaml = format!(
        r#"
db_config:
  kind: sqlite
  conn_string: "sqlite://{db}"
  collection_name: stores
  max_pool_size: 4
  idle_timeout: 30
  socket_timeout: 5
stage_config:
  workers_count: 2
  workers_to_add: 2
  increment_load: 2
  producers_count: 2
  msg_by_sec: 10
  time_to_sleep_secs: 1
  time_to_finish_secs: 1
  query_timeout_ms: 1000
  batch_size: 0
  collection_size: {collection_size}
  document_size: 2
"#,
        db = dir.path().join("workflow.db").display(),
    );
    std::fs::write(&path, yaml)?;
    Ok(path)
}

async fn run_file(path: &std::path::Path) -> Result<(StageSubmission, stampede_stage::RunReport)> {
    let submission = ConfigLoader::new().load_submission(path)?;
    let repository = connect(&submission.data_source, Arc::new(PoolStats::new())).await?;
    let report = run_stage(&submission.stage, repository).await?;
    Ok((submission, report))
}

#[tokio::test]
async fn legacy_yaml_submission_runs_with_ramp() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_submission(&dir, 40)?;

    let (submission, report) = run_file(&path).await?;

    assert_eq!(submission.stage.final_worker_count(), 6);
    assert_eq!(report.workers_spawned, 6);
    let populations: Vec<_> = report.ramp_history.iter().map(|step| step.population).collect();
    assert_eq!(populations, [4, 6]);
    assert!(report.total_queries >= report.total_timeouts);
    assert_eq!(report.total_queries, report.events_handled);
    assert!(report.finished_at >= report.started_at);

    let pool = report.pool.expect("sqlite reports pool counters");
    assert_eq!(pool.open(), 0);
    Ok(())
}

#[tokio::test]
async fn reseeding_replaces_the_previous_collection() -> Result<()> {
    let dir = tempfile::tempdir()?;

    run_file(&write_submission(&dir, 30)?).await?;
    let (submission, _) = run_file(&write_submission(&dir, 12)?).await?;

    let repository = connect(&submission.data_source, Arc::new(PoolStats::new())).await?;
    assert_eq!(repository.count().await?, 12);
    repository.close().await?;
    Ok(())
}

#[tokio::test]
async fn controller_uses_the_given_stage_id() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let submission = ConfigLoader::new().load_submission(write_submission(&dir, 5)?)?;
    let repository = connect(&submission.data_source, Arc::new(PoolStats::new())).await?;

    let report = StageController::new("nightly-reads")
        .run(&submission.stage, repository)
        .await?;

    assert_eq!(report.stage_id, "nightly-reads");
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["stage_id"], "nightly-reads");
    assert!(json["timeout_percentage"].as_str().unwrap_or_default().ends_with('%'));
    Ok(())
}
