//! The courses and problems page.
//!
//! The page lists the viewer's courses grouped by term, loads the problems
//! of the selected course together with the viewer's latest receipts, and
//! raises [`PageEvent`]s when the user picks a problem or one of the admin
//! and account controls. Expired sessions are recovered once per request.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    model::{Course, CourseAndRegistration, Problem, ProblemAndSubmissionReceipt},
    service::{CoursesService, ServiceError, SessionRecovery, call_with_recovery},
    tree::TermAndCourseTree,
};

/// Navigation requests published by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    ProblemChosen(Problem),
    CourseAdmin(Course),
    UserAdmin(Course),
    UserAccount(Course),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Hidden,
    Disabled,
    Enabled,
}

impl ControlState {
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub course_admin: ControlState,
    pub user_admin: ControlState,
    pub account: ControlState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub detail: Option<String>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
            detail: None,
        }
    }

    pub fn error(text: impl Into<String>, cause: &ServiceError) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
            detail: Some(cause.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageState {
    courses: Vec<CourseAndRegistration>,
    tree: TermAndCourseTree,
    selected_course: Option<CourseAndRegistration>,
    problems: Vec<ProblemAndSubmissionReceipt>,
    selected_problem: Option<Problem>,
    status: Option<StatusMessage>,
    controls: Controls,
}

impl PageState {
    pub fn courses(&self) -> &[CourseAndRegistration] {
        &self.courses
    }

    pub fn tree(&self) -> &TermAndCourseTree {
        &self.tree
    }

    pub fn selected_course(&self) -> Option<&CourseAndRegistration> {
        self.selected_course.as_ref()
    }

    pub fn problems(&self) -> &[ProblemAndSubmissionReceipt] {
        &self.problems
    }

    pub fn selected_problem(&self) -> Option<&Problem> {
        self.selected_problem.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }
}

pub struct CoursesAndProblemsPage {
    service: Arc<dyn CoursesService>,
    recovery: Arc<dyn SessionRecovery>,
    events: mpsc::UnboundedSender<PageEvent>,
    active: bool,
    state: PageState,
}

impl std::fmt::Debug for CoursesAndProblemsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoursesAndProblemsPage")
            .field("active", &self.active)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CoursesAndProblemsPage {
    pub fn new(
        service: Arc<dyn CoursesService>,
        recovery: Arc<dyn SessionRecovery>,
        events: mpsc::UnboundedSender<PageEvent>,
    ) -> Self {
        Self {
            service,
            recovery,
            events,
            active: false,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Show the page: reset it and load the viewer's courses.
    ///
    /// Failures are also reported through the status message.
    pub async fn activate(&mut self) -> Result<(), ServiceError> {
        self.active = true;
        self.state = PageState::default();

        let service = Arc::clone(&self.service);
        let loaded = call_with_recovery(self.recovery.as_ref(), || {
            service.get_course_and_registrations()
        })
        .await;

        let courses = match loaded {
            Ok(courses) => courses,
            Err(e) => {
                tracing::warn!(error = %e, "error loading courses");
                self.state.status = Some(StatusMessage::error("Error loading courses", &e));
                return Err(e);
            }
        };
        tracing::debug!(count = courses.len(), "courses loaded");
        self.state.status = Some(StatusMessage::info(format!(
            "{} course(s) loaded",
            courses.len()
        )));

        // Admin controls only exist for instructors, and stay disabled until
        // a course they teach is selected
        let is_instructor = courses.iter().any(CourseAndRegistration::is_instructor);
        let admin = if is_instructor {
            ControlState::Disabled
        } else {
            ControlState::Hidden
        };
        self.state.controls = Controls {
            course_admin: admin,
            user_admin: admin,
            account: ControlState::Disabled,
        };
        self.state.tree = TermAndCourseTree::new(&courses);
        self.state.courses = courses;

        Ok(())
    }

    /// Stop publishing events. Loaded state stays readable.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Select a course from the loaded list and load its problems.
    ///
    /// The controls follow the selection even if the problem load fails; in
    /// that case the previous problem list is kept and an error status is set.
    pub async fn select_course(&mut self, course_id: i32) -> Result<(), ServiceError> {
        let Some(entry) = self.state.tree.find_course(course_id).cloned() else {
            tracing::warn!(course_id, "selected course is not in the loaded list");
            return Ok(());
        };

        let is_instructor = entry.is_instructor();
        let controls = &mut self.state.controls;
        for control in [&mut controls.course_admin, &mut controls.user_admin] {
            if *control != ControlState::Hidden {
                *control = if is_instructor {
                    ControlState::Enabled
                } else {
                    ControlState::Disabled
                };
            }
        }
        controls.account = ControlState::Enabled;

        self.state.selected_course = Some(entry);
        self.state.selected_problem = None;

        let service = Arc::clone(&self.service);
        let loaded = call_with_recovery(self.recovery.as_ref(), || {
            service.load_problems_and_receipts(course_id)
        })
        .await;

        match loaded {
            Ok(problems) => {
                tracing::debug!(course_id, count = problems.len(), "problems loaded");
                self.state.problems = problems;
                self.state.status = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(course_id, error = %e, "error loading problems");
                self.state.status = Some(StatusMessage::error("Error loading problems", &e));
                Err(e)
            }
        }
    }

    /// Select one of the listed problems; an unknown id clears the selection
    pub fn select_problem(&mut self, problem_id: i32) {
        self.state.selected_problem = self
            .state
            .problems
            .iter()
            .find(|entry| entry.problem.id == problem_id)
            .map(|entry| entry.problem.clone());
    }

    pub fn load_problem_clicked(&self) {
        if let Some(problem) = &self.state.selected_problem {
            self.publish(PageEvent::ProblemChosen(problem.clone()));
        }
    }

    pub fn course_admin_clicked(&self) {
        if let Some(course) = self.course_for(self.state.controls.course_admin) {
            self.publish(PageEvent::CourseAdmin(course));
        }
    }

    pub fn user_admin_clicked(&self) {
        if let Some(course) = self.course_for(self.state.controls.user_admin) {
            self.publish(PageEvent::UserAdmin(course));
        }
    }

    pub fn account_clicked(&self) {
        if let Some(course) = self.course_for(self.state.controls.account) {
            self.publish(PageEvent::UserAccount(course));
        }
    }

    /// Selected course, if the control that was clicked is usable
    fn course_for(&self, control: ControlState) -> Option<Course> {
        if !control.is_enabled() {
            return None;
        }
        self.state
            .selected_course
            .as_ref()
            .map(|entry| entry.course.clone())
    }

    fn publish(&self, event: PageEvent) {
        if !self.active {
            tracing::debug!(?event, "page inactive, event dropped");
            return;
        }
        if self.events.send(event).is_err() {
            tracing::debug!("no page event receiver");
        }
    }
}
