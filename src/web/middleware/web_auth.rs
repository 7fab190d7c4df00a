//! Cookie-based authentication middleware for admin pages.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;
use crate::web::handlers::SESSION_COOKIE;

/// Extracts the admin session token from a `Cookie` header value.
///
/// Handles multiple cookies separated by semicolons and ignores the others.
pub fn session_token(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// Authenticates admin page requests using the session cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: admin_session=<token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract `admin_session` cookie from request
/// 2. Verify it via [`crate::application::services::AdminService::verify_session`]
/// 3. On success, continue to handler
/// 4. On failure or missing cookie, redirect to `/admin/login`
///
/// Unlike the API middleware which returns `401 Unauthorized`, this
/// middleware redirects to the login page.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let authenticated = req
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_token)
        .is_some_and(|token| st.admin_service.verify_session(token));

    if authenticated {
        Ok(next.run(req).await)
    } else {
        Err(Redirect::to("/admin/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_among_other_cookies() {
        assert_eq!(
            session_token("theme=dark; admin_session=abc123; lang=en"),
            Some("abc123")
        );
    }

    #[test]
    fn test_session_token_missing() {
        assert_eq!(session_token("theme=dark"), None);
        assert_eq!(session_token(""), None);
    }
}
