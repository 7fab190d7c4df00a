//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`                   - Offer form (public)
//! - `POST /`                   - Offer form submission (public, rate limited)
//! - `GET  /offers/{id}/pdf`    - Generated letter download (public)
//! - `GET  /health`             - Health check: storage and template (public)
//! - `POST /api/offers`         - JSON submission (public, rate limited)
//! - `/api/admin/*`             - Admin API (Bearer admin key required)
//! - `/admin/*`                 - Admin pages (session cookie required)
//! - `/static/*`                - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on submissions and admin routes
//! - **Authentication** - Bearer admin key (API) or session cookie (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, offer_pdf_handler};
use crate::api::middleware::{admin_auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// The router must be served with peer address connect info for the rate
/// limiters to identify clients.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_public = api::routes::public_routes().layer(rate_limit::submission_layer());

    let api_admin = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::layer,
        ))
        .layer(rate_limit::admin_layer());

    let web_admin = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(rate_limit::admin_layer());

    let web_login = web::routes::login_routes().layer(rate_limit::admin_layer());

    let web_submit = web::routes::submit_routes().layer(rate_limit::submission_layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/offers/{intern_id}/pdf", get(offer_pdf_handler))
        .merge(web::routes::form_routes())
        .merge(web_submit)
        .merge(web_login)
        .merge(web_admin)
        .nest("/api", api_public.merge(api_admin))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
