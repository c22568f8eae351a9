use sqlx::{Executor, PgConnection, Postgres};

use crate::models::{NewTestResult, TestResult};

pub async fn delete_for_submission<'e, E>(
    executor: E,
    submission_receipt_id: i32,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM test_results
            WHERE submission_receipt_event_id = $1
        "#,
    )
    .bind(submission_receipt_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_one<'e, E>(
    executor: E,
    submission_receipt_id: i32,
    position: i32,
    test_result: &NewTestResult,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO test_results (
                submission_receipt_event_id, position, test_case_name, outcome,
                message, stdout, stderr, input, expected_output, actual_output
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(submission_receipt_id)
    .bind(position)
    .bind(&test_result.test_case_name)
    .bind(test_result.outcome)
    .bind(&test_result.message)
    .bind(&test_result.stdout)
    .bind(&test_result.stderr)
    .bind(&test_result.input)
    .bind(&test_result.expected_output)
    .bind(&test_result.actual_output)
    .execute(executor)
    .await?;
    Ok(())
}

/// Insert a collection of results for one submission, keeping their order
/// in `position`.
pub async fn insert_for_submission(
    conn: &mut PgConnection,
    submission_receipt_id: i32,
    test_results: &[NewTestResult],
) -> Result<(), sqlx::Error> {
    for (position, test_result) in (0..).zip(test_results) {
        insert_one(&mut *conn, submission_receipt_id, position, test_result).await?;
    }
    Ok(())
}

/// Delete every stored result of the submission, then insert `test_results`.
///
/// Both statements run on `conn`; atomicity comes from the transaction the
/// connection belongs to, see [`crate::unit_of_work::ReplaceTestResults`].
pub async fn replace_for_submission(
    conn: &mut PgConnection,
    submission_receipt_id: i32,
    test_results: &[NewTestResult],
) -> Result<bool, sqlx::Error> {
    let removed = delete_for_submission(&mut *conn, submission_receipt_id).await?;
    tracing::debug!(
        submission_receipt_id,
        removed,
        inserted = test_results.len(),
        "replacing test results"
    );

    insert_for_submission(conn, submission_receipt_id, test_results).await?;

    Ok(true)
}

pub async fn list_for_submission<'e, E>(
    executor: E,
    submission_receipt_id: i32,
) -> Result<Vec<TestResult>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, submission_receipt_event_id, position, test_case_name, outcome,
                   message, stdout, stderr, input, expected_output, actual_output
            FROM test_results
            WHERE submission_receipt_event_id = $1
            ORDER BY position
        "#,
    )
    .bind(submission_receipt_id)
    .fetch_all(executor)
    .await
}

pub async fn count_for_submission<'e, E>(
    executor: E,
    submission_receipt_id: i32,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM test_results
            WHERE submission_receipt_event_id = $1
        "#,
    )
    .bind(submission_receipt_id)
    .fetch_one(executor)
    .await
}
