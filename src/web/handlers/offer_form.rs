//! Offer form page and submission handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::api::handlers::offers::pdf_url;
use crate::application::services::SubmissionError;
use crate::application::services::offer_service::PROCESSING_FAILED_MESSAGE;
use crate::domain::entities::{OfferForm, Rejection};
use crate::state::AppState;

/// Raw form fields as posted by the browser.
///
/// Dates arrive as `YYYY-MM-DD` strings from `<input type="date">`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferFormInput {
    pub intern_name: String,
    pub domain: String,
    pub email: String,
    pub start_date: String,
    pub end_date: String,
    pub offer_date: String,
}

impl OfferFormInput {
    /// Empty form with every date set to today.
    fn blank() -> Self {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        Self {
            start_date: today.clone(),
            end_date: today.clone(),
            offer_date: today,
            ..Self::default()
        }
    }

    /// Converts the raw fields into an [`OfferForm`].
    ///
    /// A missing or unparseable date counts as an unfilled field.
    pub fn parse(&self) -> Result<OfferForm, Rejection> {
        let date = |value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| Rejection::MissingFields)
        };

        Ok(OfferForm {
            intern_name: self.intern_name.clone(),
            domain: self.domain.clone(),
            email: self.email.clone(),
            start_date: date(&self.start_date)?,
            end_date: date(&self.end_date)?,
            offer_date: date(&self.offer_date)?,
        })
    }
}

/// Template for the offer form.
#[derive(Template, WebTemplate)]
#[template(path = "offer_form.html")]
struct OfferFormTemplate<'a> {
    company_name: &'a str,
    values: OfferFormInput,
    error: Option<&'static str>,
}

/// Template for the success page.
#[derive(Template, WebTemplate)]
#[template(path = "offer_sent.html")]
struct OfferSentTemplate<'a> {
    company_name: &'a str,
    intern_name: &'a str,
    intern_id: &'a str,
    email: &'a str,
    pdf_url: String,
    pdf_file_name: &'a str,
    notices: Vec<&'static str>,
}

/// Renders the offer form.
///
/// # Endpoint
///
/// `GET /`
pub async fn form_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    OfferFormTemplate {
        company_name: &state.company_name,
        values: OfferFormInput::blank(),
        error: None,
    }
    .into_response()
}

/// Runs the submission pipeline for a posted form.
///
/// # Endpoint
///
/// `POST /`
///
/// # Responses
///
/// - `200 OK` with the confirmation page and any warning notices
/// - `400 Bad Request` with the form and the first failing rule's message
/// - `500 Internal Server Error` with the form and a generic failure message
pub async fn submit_form_handler(
    State(state): State<AppState>,
    Form(input): Form<OfferFormInput>,
) -> Response {
    let result = match input.parse() {
        Ok(form) => state.offer_service.submit_offer(form).await,
        Err(rejection) => Err(SubmissionError::Rejected(rejection)),
    };

    match result {
        Ok(receipt) => OfferSentTemplate {
            company_name: &state.company_name,
            intern_name: receipt.record.intern_name(),
            intern_id: receipt.record.intern_id(),
            email: receipt.record.email(),
            pdf_url: pdf_url(receipt.record.intern_id()),
            pdf_file_name: &receipt.pdf_file_name,
            notices: receipt.warnings.iter().map(|w| w.notice()).collect(),
        }
        .into_response(),
        Err(SubmissionError::Rejected(rejection)) => (
            StatusCode::BAD_REQUEST,
            OfferFormTemplate {
                company_name: &state.company_name,
                values: input,
                error: Some(rejection.message()),
            },
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            OfferFormTemplate {
                company_name: &state.company_name,
                values: input,
                error: Some(PROCESSING_FAILED_MESSAGE),
            },
        )
            .into_response(),
    }
}
