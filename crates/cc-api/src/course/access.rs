use sqlx::PgPool;
use uuid::Uuid;

use cc_db::{models::CourseRegistration, repositories::course as course_repo};

use crate::error::ApiError;

/// The user's registration in the course, or 403 if there is none
pub async fn require_registration(
    pool: &PgPool,
    course_id: i32,
    user_id: Uuid,
) -> Result<CourseRegistration, ApiError> {
    course_repo::find_registration(pool, course_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Not registered in this course".to_string()))
}

/// Like [`require_registration`] but the user must teach the course
pub async fn require_instructor(
    pool: &PgPool,
    course_id: i32,
    user_id: Uuid,
) -> Result<CourseRegistration, ApiError> {
    let registration = require_registration(pool, course_id, user_id).await?;
    if !registration.registration_type.is_instructor() {
        return Err(ApiError::Forbidden(
            "Only instructors can do this".to_string(),
        ));
    }
    Ok(registration)
}
