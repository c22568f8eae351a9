//! Client side of the course and problem browser.
//!
//! [`page::CoursesAndProblemsPage`] drives the page against any
//! [`service::CoursesService`]; [`http::HttpCoursesService`] is the
//! implementation backed by the HTTP API.

pub mod http;
pub mod model;
pub mod page;
pub mod service;
pub mod tree;

pub use http::HttpCoursesService;
pub use page::{CoursesAndProblemsPage, PageEvent};
pub use service::{CoursesService, ServiceError, SessionRecovery};
