use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Problem, SubmissionReceipt};

pub async fn find_by_id<'e, E>(executor: E, problem_id: i32) -> Result<Option<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id, testname, brief_description, description,
                   when_assigned, when_due, visible
            FROM problems
            WHERE id = $1
        "#,
    )
    .bind(problem_id)
    .fetch_optional(executor)
    .await
}

/// Problems of a course ordered by due date. Hidden problems are only
/// included when `include_hidden` is set (instructor view).
pub async fn list_for_course<'e, E>(
    executor: E,
    course_id: i32,
    include_hidden: bool,
) -> Result<Vec<Problem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id, testname, brief_description, description,
                   when_assigned, when_due, visible
            FROM problems
            WHERE course_id = $1 AND (visible OR $2)
            ORDER BY when_due, id
        "#,
    )
    .bind(course_id)
    .bind(include_hidden)
    .fetch_all(executor)
    .await
}

/// The user's most recent receipt for every problem of the course they
/// have submitted to.
pub async fn latest_receipts_for_course<'e, E>(
    executor: E,
    course_id: i32,
    user_id: Uuid,
) -> Result<Vec<SubmissionReceipt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT DISTINCT ON (sr.problem_id)
                sr.event_id, sr.user_id, sr.problem_id, sr.program, sr.status,
                sr.num_tests_attempted, sr.num_tests_passed, sr.submitted_at
            FROM submission_receipts sr
            JOIN problems p ON p.id = sr.problem_id
            WHERE p.course_id = $1 AND sr.user_id = $2
            ORDER BY sr.problem_id, sr.submitted_at DESC, sr.event_id DESC
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn create_problem<'e, E>(
    executor: E,
    course_id: i32,
    testname: &str,
    brief_description: &str,
    description: &str,
    when_due: DateTime<Utc>,
    visible: bool,
) -> Result<i32, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO problems (course_id, testname, brief_description, description, when_due, visible)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        "#,
    )
    .bind(course_id)
    .bind(testname)
    .bind(brief_description)
    .bind(description)
    .bind(when_due)
    .bind(visible)
    .fetch_one(executor)
    .await
}
