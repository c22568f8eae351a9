use cc_db::models::NewTestResult;
use validator::{Validate, ValidateEmail};

use crate::error::ApiError;

/// Largest number of test results accepted for one submission
pub const MAX_TEST_RESULTS: usize = 500;

/// Upper bound for a single captured field (stdout, stderr, ...)
pub const MAX_TEST_OUTPUT_LEN: usize = 64 * 1024;

const MAX_TEST_CASE_NAME_LEN: usize = 255;

/// Run derived `Validate` rules and flatten failures into one message
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string().replace('\n', "; ")))
}

/// Validate email format using the validator crate
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }

    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Check a replacement set of test results before it reaches the database.
///
/// Every entry needs a name that fits the column as stored (untrimmed,
/// counted in characters). Postgres text cannot hold NUL, so it is rejected
/// in every field. Captured output is bounded so a runaway test cannot bloat
/// the table.
pub fn validate_test_results(test_results: &[NewTestResult]) -> Result<(), ApiError> {
    if test_results.len() > MAX_TEST_RESULTS {
        return Err(ApiError::Validation(format!(
            "At most {MAX_TEST_RESULTS} test results can be stored per submission, got {}",
            test_results.len()
        )));
    }

    for (index, result) in test_results.iter().enumerate() {
        let name = &result.test_case_name;
        if name.trim().is_empty() {
            return Err(ApiError::Validation(format!(
                "Test result {index} has an empty test case name"
            )));
        }
        if name.chars().count() > MAX_TEST_CASE_NAME_LEN {
            return Err(ApiError::Validation(format!(
                "Test result {index} has a test case name longer than {MAX_TEST_CASE_NAME_LEN} characters"
            )));
        }

        let fields = [
            ("test_case_name", name),
            ("message", &result.message),
            ("stdout", &result.stdout),
            ("stderr", &result.stderr),
            ("input", &result.input),
            ("expected_output", &result.expected_output),
            ("actual_output", &result.actual_output),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.contains('\0')) {
            return Err(ApiError::Validation(format!(
                "Test result {index} field '{field}' contains a NUL character"
            )));
        }
        if let Some((field, _)) = fields
            .iter()
            .find(|(_, value)| value.len() > MAX_TEST_OUTPUT_LEN)
        {
            return Err(ApiError::Validation(format!(
                "Test result {index} field '{field}' exceeds {MAX_TEST_OUTPUT_LEN} bytes"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_db::models::TestOutcome;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("user+tag@example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn test_validate_test_results_accepts_empty_and_limit() {
        assert!(validate_test_results(&[]).is_ok());

        let full: Vec<_> = (0..MAX_TEST_RESULTS)
            .map(|i| NewTestResult::new(format!("t{i}"), TestOutcome::Passed))
            .collect();
        assert!(validate_test_results(&full).is_ok());
    }

    #[test]
    fn test_validate_test_results_rejects_too_many() {
        let too_many: Vec<_> = (0..=MAX_TEST_RESULTS)
            .map(|i| NewTestResult::new(format!("t{i}"), TestOutcome::Passed))
            .collect();
        assert!(matches!(
            validate_test_results(&too_many),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_test_results_rejects_blank_name() {
        let results = vec![
            NewTestResult::new("ok", TestOutcome::Passed),
            NewTestResult::new("  ", TestOutcome::FailedAssertion),
        ];
        match validate_test_results(&results) {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("Test result 1")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_test_results_rejects_huge_output() {
        let mut result = NewTestResult::new("noisy", TestOutcome::FailedWithException);
        result.stdout = "x".repeat(MAX_TEST_OUTPUT_LEN + 1);

        match validate_test_results(&[result]) {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("stdout")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_name_length_counts_stored_characters() {
        // 200 two-byte characters fit a 255 character column
        let accented = NewTestResult::new("é".repeat(200), TestOutcome::Passed);
        assert!(validate_test_results(&[accented]).is_ok());

        // Leading whitespace is stored, so it counts
        let padded = NewTestResult::new(format!(" {}", "a".repeat(255)), TestOutcome::Passed);
        assert!(matches!(
            validate_test_results(&[padded]),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_test_results_rejects_nul() {
        let mut result = NewTestResult::new("segfault", TestOutcome::FailedWithException);
        result.stderr = "core dumped\0\0".to_string();

        match validate_test_results(&[result]) {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("stderr")),
            other => panic!("Expected validation error, got {other:?}"),
        }

        let nul_name = NewTestResult::new("a\0b", TestOutcome::Passed);
        assert!(validate_test_results(&[nul_name]).is_err());
    }
}
