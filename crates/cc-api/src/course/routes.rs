use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use cc_db::{
    models::{CourseAndRegistration, ProblemAndSubmissionReceipt},
    repositories::{course as course_repo, problem as problem_repo},
};

use super::access;
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/{course_id}/problems", get(list_problems))
}

/// Courses the caller is registered in, with their role in each
async fn list_courses(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<CourseAndRegistration>>, ApiError> {
    let courses = course_repo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(courses))
}

/// Problems of a course paired with the caller's latest receipt for each.
/// Hidden problems are only listed for instructors.
async fn list_problems(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<ProblemAndSubmissionReceipt>>, ApiError> {
    let registration =
        access::require_registration(&state.pool, course_id, auth_user.user_id).await?;
    let include_hidden = registration.registration_type.is_instructor();

    let problems = problem_repo::list_for_course(&state.pool, course_id, include_hidden).await?;
    let mut receipts: HashMap<i32, _> =
        problem_repo::latest_receipts_for_course(&state.pool, course_id, auth_user.user_id)
            .await?
            .into_iter()
            .map(|receipt| (receipt.problem_id, receipt))
            .collect();

    let pairs = problems
        .into_iter()
        .map(|problem| {
            let receipt = receipts.remove(&problem.id);
            ProblemAndSubmissionReceipt { problem, receipt }
        })
        .collect();

    Ok(Json(pairs))
}
