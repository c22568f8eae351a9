//! Transactional units of work.
//!
//! A [`UnitOfWork`] runs a sequence of statements on one connection. [`execute`]
//! owns the transaction boundary: the work is committed only if every
//! statement succeeded, otherwise the whole transaction is rolled back and the
//! storage error is returned to the caller. Nothing here retries.

use std::future::Future;

use sqlx::{PgConnection, PgPool};

use crate::models::{NewTestResult, SubmissionReceipt, SubmissionStatus};
use crate::repositories::{submission as submission_repo, test_result as test_result_repo};

pub trait UnitOfWork: Sync {
    type Output: Send;

    /// Short human-readable description used in logs.
    fn description(&self) -> &'static str;

    fn run(
        &self,
        conn: &mut PgConnection,
    ) -> impl Future<Output = Result<Self::Output, sqlx::Error>> + Send;
}

/// Run `work` inside a single database transaction.
pub async fn execute<W>(pool: &PgPool, work: &W) -> Result<W::Output, sqlx::Error>
where
    W: UnitOfWork,
{
    let mut tx = pool.begin().await?;

    match work.run(&mut *tx).await {
        Ok(output) => {
            tx.commit().await?;
            tracing::debug!(description = work.description(), "transaction committed");
            Ok(output)
        }
        Err(e) => {
            tracing::warn!(
                description = work.description(),
                error = %e,
                "transaction failed, rolling back"
            );
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    description = work.description(),
                    error = %rollback_err,
                    "rollback failed"
                );
            }
            Err(e)
        }
    }
}

/// Replace the test results associated with a submission (useful when a
/// submission is retested).
#[derive(Debug, Clone, Copy)]
pub struct ReplaceTestResults<'a> {
    pub submission_receipt_id: i32,
    pub test_results: &'a [NewTestResult],
}

impl UnitOfWork for ReplaceTestResults<'_> {
    type Output = bool;

    fn description(&self) -> &'static str {
        "replace test results"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
        test_result_repo::replace_for_submission(
            conn,
            self.submission_receipt_id,
            self.test_results,
        )
        .await
    }
}

/// Store a new set of test results for a submission and bring the receipt's
/// counters and status in line with them, in one transaction.
#[derive(Debug, Clone, Copy)]
pub struct RetestSubmission<'a> {
    pub submission_receipt_id: i32,
    pub test_results: &'a [NewTestResult],
}

impl UnitOfWork for RetestSubmission<'_> {
    type Output = SubmissionReceipt;

    fn description(&self) -> &'static str {
        "store retest results"
    }

    async fn run(&self, conn: &mut PgConnection) -> Result<SubmissionReceipt, sqlx::Error> {
        ReplaceTestResults {
            submission_receipt_id: self.submission_receipt_id,
            test_results: self.test_results,
        }
        .run(&mut *conn)
        .await?;

        let attempted = self.test_results.len() as i32;
        let passed = self
            .test_results
            .iter()
            .filter(|r| r.outcome.is_passed())
            .count() as i32;
        let status = SubmissionStatus::from_outcomes(self.test_results.iter().map(|r| &r.outcome));

        submission_repo::update_test_summary(
            conn,
            self.submission_receipt_id,
            status,
            attempted,
            passed,
        )
        .await
    }
}
