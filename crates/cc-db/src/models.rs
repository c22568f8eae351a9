use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Users ---

/// Public user profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// User row including the password hash, used only for login
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_info: Option<String>,
    pub expires_at: DateTime<Utc>,
}

// --- Courses ---

/// Academic term (e.g. "Fall"); `seq` orders terms within a year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Term {
    pub id: i32,
    pub name: String,
    pub seq: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i32,
    /// Short name, e.g. "CS 101"
    pub name: String,
    pub title: String,
    pub url: String,
    pub term: Term,
    pub year: i32,
}

/// Role of a user within one course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationType {
    Student,
    Instructor,
}

impl RegistrationType {
    pub fn is_instructor(self) -> bool {
        self == Self::Instructor
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CourseRegistration {
    pub id: i32,
    pub course_id: i32,
    pub user_id: Uuid,
    pub registration_type: RegistrationType,
    pub section: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAndRegistration {
    pub course: Course,
    pub registration: CourseRegistration,
}

/// Flat row produced by the course listing join
#[derive(Debug, Clone, FromRow)]
pub struct CourseRegistrationRow {
    pub course_id: i32,
    pub course_name: String,
    pub course_title: String,
    pub course_url: String,
    pub course_year: i32,
    pub term_id: i32,
    pub term_name: String,
    pub term_seq: i32,
    pub registration_id: i32,
    pub user_id: Uuid,
    pub registration_type: RegistrationType,
    pub section: i32,
}

impl From<CourseRegistrationRow> for CourseAndRegistration {
    fn from(row: CourseRegistrationRow) -> Self {
        Self {
            course: Course {
                id: row.course_id,
                name: row.course_name,
                title: row.course_title,
                url: row.course_url,
                term: Term {
                    id: row.term_id,
                    name: row.term_name,
                    seq: row.term_seq,
                },
                year: row.course_year,
            },
            registration: CourseRegistration {
                id: row.registration_id,
                course_id: row.course_id,
                user_id: row.user_id,
                registration_type: row.registration_type,
                section: row.section,
            },
        }
    }
}

// --- Problems and submissions ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Problem {
    pub id: i32,
    pub course_id: i32,
    pub testname: String,
    pub brief_description: String,
    pub description: String,
    pub when_assigned: DateTime<Utc>,
    pub when_due: DateTime<Utc>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotStarted,
    Started,
    TestsPassed,
    TestsFailed,
    CompileError,
    BuildError,
}

/// Record of one code submission event, identified by its event id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SubmissionReceipt {
    pub event_id: i32,
    pub user_id: Uuid,
    pub problem_id: i32,
    #[serde(skip_serializing)]
    pub program: String,
    pub status: SubmissionStatus,
    pub num_tests_attempted: i32,
    pub num_tests_passed: i32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemAndSubmissionReceipt {
    pub problem: Problem,
    /// The viewer's most recent receipt for this problem, if any
    pub receipt: Option<SubmissionReceipt>,
}

// --- Test results ---

/// Outcome of running one test case against a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "test_outcome", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    FailedAssertion,
    FailedWithException,
    FailedFromTimeout,
    FailedBySecurityManager,
    InternalError,
}

impl TestOutcome {
    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }
}

/// Stored test result, ordered within its submission by `position`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: i32,
    pub submission_receipt_event_id: i32,
    pub position: i32,
    pub test_case_name: String,
    pub outcome: TestOutcome,
    pub message: String,
    pub stdout: String,
    pub stderr: String,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
}

/// Insert form of a test result; the submission id and position are
/// assigned when the collection is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTestResult {
    pub test_case_name: String,
    pub outcome: TestOutcome,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub actual_output: String,
}

impl NewTestResult {
    /// Result with only a name and outcome, everything else empty
    pub fn new(test_case_name: impl Into<String>, outcome: TestOutcome) -> Self {
        Self {
            test_case_name: test_case_name.into(),
            outcome,
            message: String::new(),
            stdout: String::new(),
            stderr: String::new(),
            input: String::new(),
            expected_output: String::new(),
            actual_output: String::new(),
        }
    }
}

impl SubmissionStatus {
    /// Status of a submission after its tests ran with the given outcomes
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a TestOutcome>) -> Self {
        let mut any = false;
        for outcome in outcomes {
            if !outcome.is_passed() {
                return Self::TestsFailed;
            }
            any = true;
        }
        if any { Self::TestsPassed } else { Self::TestsFailed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_outcomes() {
        use TestOutcome::*;

        assert_eq!(
            SubmissionStatus::from_outcomes(&[Passed, Passed]),
            SubmissionStatus::TestsPassed
        );
        assert_eq!(
            SubmissionStatus::from_outcomes(&[Passed, FailedFromTimeout]),
            SubmissionStatus::TestsFailed
        );
        // No tests ran, nothing passed
        assert_eq!(
            SubmissionStatus::from_outcomes(&[]),
            SubmissionStatus::TestsFailed
        );
    }

    #[test]
    fn test_registration_type_serialization() {
        let json = serde_json::to_string(&RegistrationType::Instructor).unwrap();
        assert_eq!(json, "\"INSTRUCTOR\"");

        let parsed: RegistrationType = serde_json::from_str("\"STUDENT\"").unwrap();
        assert_eq!(parsed, RegistrationType::Student);
        assert!(!parsed.is_instructor());
    }

    #[test]
    fn test_new_test_result_defaults_optional_fields() {
        let parsed: NewTestResult =
            serde_json::from_str(r#"{"test_case_name":"t1","outcome":"failed_assertion"}"#)
                .unwrap();
        assert_eq!(parsed, NewTestResult::new("t1", TestOutcome::FailedAssertion));
    }

    #[test]
    fn test_course_row_conversion() {
        let user_id = Uuid::new_v4();
        let row = CourseRegistrationRow {
            course_id: 7,
            course_name: "CS 101".to_string(),
            course_title: "Intro".to_string(),
            course_url: String::new(),
            course_year: 2024,
            term_id: 2,
            term_name: "Fall".to_string(),
            term_seq: 3,
            registration_id: 11,
            user_id,
            registration_type: RegistrationType::Instructor,
            section: 101,
        };

        let converted = CourseAndRegistration::from(row);
        assert_eq!(converted.course.id, 7);
        assert_eq!(converted.course.term.name, "Fall");
        assert_eq!(converted.registration.course_id, 7);
        assert_eq!(converted.registration.user_id, user_id);
    }
}
