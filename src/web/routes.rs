//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    admin_page_handler, download_records_handler, form_page_handler, login_page_handler,
    login_submit_handler, logout_handler, submit_form_handler, upload_records_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Offer form page.
///
/// # Endpoints
///
/// - `GET /` - Offer form
pub fn form_routes() -> Router<AppState> {
    Router::new().route("/", get(form_page_handler))
}

/// Offer form submission, kept separate so it can carry its own rate limit.
///
/// # Endpoints
///
/// - `POST /` - Submit the offer form
pub fn submit_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_form_handler))
}

/// Admin pages requiring a session cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /admin`             - Record table and upload form
/// - `GET  /admin/records.csv` - CSV download
/// - `POST /admin/records`     - Replace the store from an uploaded CSV
/// - `POST /admin/logout`      - End the session
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_page_handler))
        .route("/admin/records.csv", get(download_records_handler))
        .route("/admin/records", post(upload_records_handler))
        .route("/admin/logout", post(logout_handler))
}

/// Admin login routes without authentication.
///
/// # Endpoints
///
/// - `GET  /admin/login` - Login page
/// - `POST /admin/login` - Check the admin key
pub fn login_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/login",
        get(login_page_handler).post(login_submit_handler),
    )
}
