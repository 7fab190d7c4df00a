//! Admin login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::SESSION_COOKIE;
use crate::state::AppState;

/// Template for the admin login page.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    company_name: &'a str,
    error: Option<&'static str>,
}

/// Posted login form.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub key: String,
}

fn session_cookie(value: &str, max_age: Option<u64>) -> HeaderValue {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/admin; HttpOnly; SameSite=Strict");
    if let Some(age) = max_age {
        cookie.push_str(&format!("; Max-Age={age}"));
    }
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /admin/login`
pub async fn login_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    LoginTemplate {
        company_name: &state.company_name,
        error: None,
    }
    .into_response()
}

/// Checks the admin key and starts a session.
///
/// # Endpoint
///
/// `POST /admin/login`
///
/// On success sets the `admin_session` cookie (never the raw key) and
/// redirects to `/admin`. On failure re-renders the form with `401`.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(input): Form<LoginInput>,
) -> Response {
    match state.admin_service.authenticate(&input.key) {
        Ok(()) => {
            tracing::info!("Admin session started");
            (
                [(
                    header::SET_COOKIE,
                    session_cookie(&state.admin_service.session_token(), None),
                )],
                Redirect::to("/admin"),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                company_name: &state.company_name,
                error: Some("Invalid key."),
            },
        )
            .into_response(),
    }
}

/// Ends the admin session.
///
/// # Endpoint
///
/// `POST /admin/logout`
pub async fn logout_handler() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, session_cookie("", Some(0)))],
        Redirect::to("/admin/login"),
    )
}
