//! API route configuration.

use crate::api::handlers::{
    create_offer_handler, export_records_handler, list_records_handler, replace_records_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public submission routes.
///
/// # Endpoints
///
/// - `POST /offers` - Generate and send an offer letter
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/offers", post(create_offer_handler))
}

/// Admin routes, protected by Bearer admin key authentication via
/// [`crate::api::middleware::admin_auth`].
///
/// # Endpoints
///
/// - `GET /admin/records`        - List logged records
/// - `PUT /admin/records`        - Replace the store from a CSV body
/// - `GET /admin/records/export` - Download the store as CSV
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/records",
            get(list_records_handler).put(replace_records_handler),
        )
        .route("/admin/records/export", get(export_records_handler))
}
