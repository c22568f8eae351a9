//! Client-side views of the API's JSON payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: i32,
    pub name: String,
    pub seq: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub url: String,
    pub term: Term,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationType {
    Student,
    Instructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

impl CourseAndRegistration {
    pub fn is_instructor(&self) -> bool {
        self.registration.registration_type == RegistrationType::Instructor
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotStarted,
    Started,
    TestsPassed,
    TestsFailed,
    CompileError,
    BuildError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub event_id: i32,
    pub user_id: Uuid,
    pub problem_id: i32,
    pub status: SubmissionStatus,
    pub num_tests_attempted: i32,
    pub num_tests_passed: i32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemAndSubmissionReceipt {
    pub problem: Problem,
    pub receipt: Option<SubmissionReceipt>,
}
