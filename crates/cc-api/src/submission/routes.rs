use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use cc_db::{
    models::SubmissionReceipt,
    repositories::{
        problem as problem_repo, submission as submission_repo, test_result as test_result_repo,
    },
    unit_of_work::{self, RetestSubmission},
};

use super::model::{
    ReplaceTestResultsRequest, ReplaceTestResultsResponse, SubmitRequest, TestResultsResponse,
};
use crate::{ApiState, auth::AuthUser, course::access, error::ApiError, metrics, validation};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/problems/{problem_id}/submissions", post(submit))
        .route(
            "/submissions/{event_id}/test-results",
            get(get_test_results).put(replace_test_results),
        )
}

async fn submit(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<i32>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), ApiError> {
    validation::validate_request(&request)?;

    let problem = problem_repo::find_by_id(&state.pool, problem_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Problem not found".to_string()))?;

    let registration =
        access::require_registration(&state.pool, problem.course_id, auth_user.user_id).await?;

    // Students cannot see hidden problems, so they cannot submit to them either
    if !problem.visible && !registration.registration_type.is_instructor() {
        return Err(ApiError::NotFound("Problem not found".to_string()));
    }

    let receipt = submission_repo::create_receipt(
        &state.pool,
        auth_user.user_id,
        problem.id,
        &request.program,
    )
    .await?;

    tracing::info!(
        event_id = receipt.event_id,
        problem_id = problem.id,
        user_id = %auth_user.user_id,
        "submission received"
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Receipt and course of `event_id`, or 404
async fn load_receipt(
    state: &ApiState,
    event_id: i32,
) -> Result<(SubmissionReceipt, i32), ApiError> {
    let receipt = submission_repo::find_receipt(&state.pool, event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;
    let course_id = submission_repo::find_course_id_for_receipt(&state.pool, event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;
    Ok((receipt, course_id))
}

/// Stored results of a submission. Visible to the submitter and to the
/// course's instructors.
async fn get_test_results(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(event_id): Path<i32>,
) -> Result<Json<TestResultsResponse>, ApiError> {
    let (receipt, course_id) = load_receipt(&state, event_id).await?;

    if receipt.user_id != auth_user.user_id {
        access::require_instructor(&state.pool, course_id, auth_user.user_id).await?;
    }

    let test_results = test_result_repo::list_for_submission(&state.pool, event_id).await?;

    Ok(Json(TestResultsResponse {
        receipt,
        test_results,
    }))
}

/// Replace every stored result of a submission with the request's set and
/// update the receipt summary. Either all of it is stored or none of it.
async fn replace_test_results(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(event_id): Path<i32>,
    Json(request): Json<ReplaceTestResultsRequest>,
) -> Result<Json<ReplaceTestResultsResponse>, ApiError> {
    let (_, course_id) = load_receipt(&state, event_id).await?;
    access::require_instructor(&state.pool, course_id, auth_user.user_id).await?;

    validation::validate_test_results(&request.test_results)?;

    let work = RetestSubmission {
        submission_receipt_id: event_id,
        test_results: &request.test_results,
    };
    let receipt = match unit_of_work::execute(&state.pool, &work).await {
        Ok(receipt) => {
            metrics::record_test_result_replacement(true, request.test_results.len());
            receipt
        }
        Err(e) => {
            metrics::record_test_result_replacement(false, request.test_results.len());
            return Err(e.into());
        }
    };

    // The committed transaction stored exactly the request's set
    let stored = request.test_results.len();

    tracing::info!(
        event_id,
        stored,
        status = ?receipt.status,
        user_id = %auth_user.user_id,
        "test results replaced"
    );

    Ok(Json(ReplaceTestResultsResponse { receipt, stored }))
}
