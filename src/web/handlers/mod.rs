//! HTML template rendering handlers for the offer form and admin pages.

mod admin;
mod login;
mod offer_form;

pub use admin::{admin_page_handler, download_records_handler, upload_records_handler};
pub use login::{login_page_handler, login_submit_handler, logout_handler};
pub use offer_form::{OfferFormInput, form_page_handler, submit_form_handler};

/// Cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin_session";
