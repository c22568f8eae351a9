use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CourseAndRegistration, ProblemAndSubmissionReceipt};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The server no longer accepts the session; recoverable via
    /// [`SessionRecovery`]
    #[error("authentication expired")]
    AuthenticationExpired,
    #[error("remote call failed: {0}")]
    Remote(String),
}

/// Course and problem data used by the browser page
#[async_trait]
pub trait CoursesService: Send + Sync {
    async fn get_course_and_registrations(
        &self,
    ) -> Result<Vec<CourseAndRegistration>, ServiceError>;

    async fn load_problems_and_receipts(
        &self,
        course_id: i32,
    ) -> Result<Vec<ProblemAndSubmissionReceipt>, ServiceError>;
}

/// Re-establishes an expired session
#[async_trait]
pub trait SessionRecovery: Send + Sync {
    async fn recover(&self) -> Result<(), ServiceError>;
}

/// Run `call`; if the session expired, recover and issue the same call
/// exactly one more time.
///
/// A failed recovery is returned as is. If the replay fails, even with
/// another expired session, that error is returned.
pub async fn call_with_recovery<T, F, Fut>(
    recovery: &dyn SessionRecovery,
    mut call: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    match call().await {
        Err(ServiceError::AuthenticationExpired) => {
            tracing::info!("session expired, recovering");
            recovery.recover().await?;
            call().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRecovery {
        calls: AtomicUsize,
        result: Result<(), ServiceError>,
    }

    #[async_trait]
    impl SessionRecovery for CountingRecovery {
        async fn recover(&self) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn recovery(result: Result<(), ServiceError>) -> CountingRecovery {
        CountingRecovery {
            calls: AtomicUsize::new(0),
            result,
        }
    }

    #[tokio::test]
    async fn test_success_needs_no_recovery() {
        let recovery = recovery(Ok(()));
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result = call_with_recovery(&recovery, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ServiceError>(7)
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(recovery.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_replayed_once() {
        let recovery = recovery(Ok(()));
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result = call_with_recovery(&recovery, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ServiceError::AuthenticationExpired)
        })
        .await;

        assert_eq!(result, Err(ServiceError::AuthenticationExpired));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(recovery.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_recovery_skips_replay() {
        let recovery = recovery(Err(ServiceError::Remote("refresh rejected".to_string())));
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result = call_with_recovery(&recovery, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ServiceError::AuthenticationExpired)
        })
        .await;

        assert_eq!(
            result,
            Err(ServiceError::Remote("refresh rejected".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_recovered() {
        let recovery = recovery(Ok(()));

        let result = call_with_recovery(&recovery, || async {
            Err::<(), _>(ServiceError::Remote("boom".to_string()))
        })
        .await;

        assert!(matches!(result, Err(ServiceError::Remote(_))));
        assert_eq!(recovery.calls.load(Ordering::SeqCst), 0);
    }
}
