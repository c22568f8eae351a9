use axum::Router;

use crate::{auth, course, state::ApiState, submission, user};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(user::routes())
        .merge(auth::routes())
        .merge(course::routes())
        .merge(submission::routes())
}
