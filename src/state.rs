//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AdminService, OfferService};
use crate::domain::repositories::RecordRepository;
use crate::infrastructure::document::DocumentRenderer;

/// Cloneable handle to the services behind the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub offer_service: Arc<OfferService>,
    pub admin_service: Arc<AdminService>,
    /// Record store, for health checks.
    pub records: Arc<dyn RecordRepository>,
    /// Letter renderer, for health checks.
    pub renderer: Arc<dyn DocumentRenderer>,
    /// Company name shown on HTML pages.
    pub company_name: Arc<str>,
}

impl AppState {
    pub fn new(
        offer_service: Arc<OfferService>,
        admin_service: Arc<AdminService>,
        records: Arc<dyn RecordRepository>,
        renderer: Arc<dyn DocumentRenderer>,
        company_name: &str,
    ) -> Self {
        Self {
            offer_service,
            admin_service,
            records,
            renderer,
            company_name: Arc::from(company_name),
        }
    }
}
