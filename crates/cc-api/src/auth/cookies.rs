//! Session cookies.
//!
//! Both cookies are HttpOnly, `SameSite=Lax`, and Secure outside
//! development. The refresh cookie is scoped to `/v1/auth` so it only
//! travels to the refresh and logout endpoints.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::Environment;

pub const AUTH_COOKIE: &str = "auth_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

const AUTH_PATH: &str = "/";
const REFRESH_PATH: &str = "/v1/auth";

fn path_for(name: &str) -> &'static str {
    if name == REFRESH_COOKIE {
        REFRESH_PATH
    } else {
        AUTH_PATH
    }
}

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    environment: &Environment,
    cookie_domain: &str,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path_for(name))
        .domain(cookie_domain.to_string())
        .max_age(max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!environment.is_development())
        .build()
}

/// Cookie holding the access JWT
pub fn create_auth_cookie(
    token: String,
    environment: &Environment,
    expiry_hours: i64,
    cookie_domain: &str,
) -> Cookie<'static> {
    session_cookie(
        AUTH_COOKIE,
        token,
        Duration::hours(expiry_hours),
        environment,
        cookie_domain,
    )
}

pub fn create_refresh_token_cookie(
    token: String,
    environment: &Environment,
    expiry_days: i64,
    cookie_domain: &str,
) -> Cookie<'static> {
    session_cookie(
        REFRESH_COOKIE,
        token,
        Duration::days(expiry_days),
        environment,
        cookie_domain,
    )
}

/// Cookie matching `name`'s path and domain, for removal from the jar
pub fn removal_cookie(name: &'static str, cookie_domain: &str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path(path_for(name))
        .domain(cookie_domain.to_string())
        .build()
}
