pub mod auth;
pub mod config;
pub mod course;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;
pub mod submission;
pub mod tracing;
pub mod user;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
