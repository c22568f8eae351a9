use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{SubmissionReceipt, SubmissionStatus};

pub async fn create_receipt<'e, E>(
    executor: E,
    user_id: Uuid,
    problem_id: i32,
    program: &str,
) -> Result<SubmissionReceipt, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO submission_receipts (user_id, problem_id, program)
            VALUES ($1, $2, $3)
            RETURNING event_id, user_id, problem_id, program, status,
                      num_tests_attempted, num_tests_passed, submitted_at
        "#,
    )
    .bind(user_id)
    .bind(problem_id)
    .bind(program)
    .fetch_one(executor)
    .await
}

pub async fn find_receipt<'e, E>(
    executor: E,
    event_id: i32,
) -> Result<Option<SubmissionReceipt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT event_id, user_id, problem_id, program, status,
                   num_tests_attempted, num_tests_passed, submitted_at
            FROM submission_receipts
            WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(executor)
    .await
}

/// Course the receipt's problem belongs to.
pub async fn find_course_id_for_receipt<'e, E>(
    executor: E,
    event_id: i32,
) -> Result<Option<i32>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT p.course_id
            FROM submission_receipts sr
            JOIN problems p ON p.id = sr.problem_id
            WHERE sr.event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(executor)
    .await
}

/// Update the test counters and status of a receipt. Fails with
/// `RowNotFound` if the receipt does not exist.
pub async fn update_test_summary<'e, E>(
    executor: E,
    event_id: i32,
    status: SubmissionStatus,
    num_tests_attempted: i32,
    num_tests_passed: i32,
) -> Result<SubmissionReceipt, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE submission_receipts
            SET status = $2,
                num_tests_attempted = $3,
                num_tests_passed = $4
            WHERE event_id = $1
            RETURNING event_id, user_id, problem_id, program, status,
                      num_tests_attempted, num_tests_passed, submitted_at
        "#,
    )
    .bind(event_id)
    .bind(status)
    .bind(num_tests_attempted)
    .bind(num_tests_passed)
    .fetch_one(executor)
    .await
}
