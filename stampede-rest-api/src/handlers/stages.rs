//! Stage submission endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};

use stampede_config::{StageSubmission, Validatable};
use stampede_stage::{generate_identifier, RunReport, StageController, StageError};
use stampede_storage::RepositoryConnector;

use crate::{
    context::StagesContext,
    errors::{RestError, RestResult},
    models::StageAccepted,
};

/// Validate a submission and start its stage in the background
///
/// Every violation is returned at once with `400`; nothing is connected or
/// spawned for an invalid submission. Connection and run failures of an
/// accepted stage are only logged, tagged with the stage id.
pub async fn submit_stage(
    State(ctx): State<StagesContext>,
    payload: Result<Json<StageSubmission>, JsonRejection>,
) -> RestResult<impl IntoResponse> {
    let Json(submission) = payload.map_err(|rejection| {
        warn!("Rejected stage submission body: {}", rejection.body_text());
        RestError::from(rejection)
    })?;

    let violations = submission.violations();
    if !violations.is_empty() {
        warn!(count = violations.len(), "Invalid stage submission");
        return Err(RestError::validation_error(violations));
    }

    let stage_id = generate_identifier();
    info!(
        stage_id = %stage_id,
        backend = %submission.data_source.kind,
        collection = %submission.data_source.collection_name,
        "Stage accepted"
    );

    let guard = ctx.track_stage();
    let connector = ctx.connector.clone();
    let id = stage_id.clone();
    tokio::spawn(async move {
        let _guard = guard;
        match run_submitted(connector.as_ref(), &id, &submission).await {
            Ok(report) => info!(
                stage_id = %id,
                queries = report.total_queries,
                timeouts = report.total_timeouts,
                "Stage finished"
            ),
            Err(e) => error!(stage_id = %id, "Stage failed: {}", e),
        }
    });

    Ok((StatusCode::CREATED, Json(StageAccepted { stage_id })))
}

/// Connect to the submitted data source and run the stage to completion
pub(crate) async fn run_submitted(
    connector: &dyn RepositoryConnector,
    stage_id: &str,
    submission: &StageSubmission,
) -> Result<RunReport, StageError> {
    let repository = connector
        .connect(&submission.data_source)
        .await
        .map_err(StageError::Connection)?;

    StageController::new(stage_id)
        .run(&submission.stage, repository)
        .await
}
