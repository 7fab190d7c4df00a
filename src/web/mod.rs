//! Browser-facing pages: the offer form and the admin panel.
//!
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Session cookie authentication
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
