use serde::{Deserialize, Serialize};
use validator::Validate;

use cc_db::models::{NewTestResult, SubmissionReceipt, TestResult};

/// Largest program accepted in one submission, in characters
pub const MAX_PROGRAM_LEN: u64 = 100_000;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = MAX_PROGRAM_LEN, message = "Program must not be empty or too large"))]
    pub program: String,
}

/// Body of `PUT /submissions/{event_id}/test-results`. The whole set
/// replaces whatever was stored for the submission.
#[derive(Debug, Deserialize)]
pub struct ReplaceTestResultsRequest {
    pub test_results: Vec<NewTestResult>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceTestResultsResponse {
    pub receipt: SubmissionReceipt,
    pub stored: usize,
}

#[derive(Debug, Serialize)]
pub struct TestResultsResponse {
    pub receipt: SubmissionReceipt,
    pub test_results: Vec<TestResult>,
}
