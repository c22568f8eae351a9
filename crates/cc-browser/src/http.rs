//! [`CoursesService`] and [`SessionRecovery`] over the HTTP API.
//!
//! Session cookies set by the server live in the client's cookie store, so
//! logging in and recovering only need to hit the right endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    model::{CourseAndRegistration, ProblemAndSubmissionReceipt, UserProfile},
    service::{CoursesService, ServiceError, SessionRecovery},
};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: UserProfile,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpCoursesService {
    client: Client,
    base_url: String,
}

impl HttpCoursesService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ServiceError::Remote(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a session. The returned profile belongs to the logged-in user.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ServiceError> {
        let response = self
            .client
            .post(self.url("/v1/users/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport_error)?;

        let body: LoginResponse = decode(response).await?;
        tracing::info!(user_id = %body.user.id, "logged in");
        Ok(body.user)
    }

    pub async fn current_user(&self) -> Result<UserProfile, ServiceError> {
        self.get_json("/v1/auth/me").await
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.url("/v1/auth/logout"))
            .send()
            .await
            .map_err(transport_error)?;
        check(response).await.map(|_| ())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

#[async_trait]
impl CoursesService for HttpCoursesService {
    async fn get_course_and_registrations(
        &self,
    ) -> Result<Vec<CourseAndRegistration>, ServiceError> {
        self.get_json("/v1/courses").await
    }

    async fn load_problems_and_receipts(
        &self,
        course_id: i32,
    ) -> Result<Vec<ProblemAndSubmissionReceipt>, ServiceError> {
        self.get_json(&format!("/v1/courses/{course_id}/problems"))
            .await
    }
}

#[async_trait]
impl SessionRecovery for HttpCoursesService {
    async fn recover(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.url("/v1/auth/refresh"))
            .send()
            .await
            .map_err(transport_error)?;

        // An expired refresh token cannot be recovered from, so it is not
        // reported as AuthenticationExpired
        match check(response).await {
            Ok(_) => Ok(()),
            Err(ServiceError::AuthenticationExpired) => {
                Err(ServiceError::Remote("session refresh rejected".to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    ServiceError::Remote(e.to_string())
}

async fn check(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ServiceError::AuthenticationExpired);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => format!("{status}: {}", body.error),
        Err(_) => status.to_string(),
    };
    Err(ServiceError::Remote(message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| ServiceError::Remote(format!("invalid response body: {e}")))
}
