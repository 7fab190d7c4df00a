//! Handlers for offer submission and PDF retrieval.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::offer::{CreateOfferRequest, CreateOfferResponse, OfferRecordDto};
use crate::domain::entities::OfferForm;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::http::attachment_disposition;

/// Relative URL of the stored PDF for `intern_id`.
pub fn pdf_url(intern_id: &str) -> String {
    format!("/offers/{intern_id}/pdf")
}

/// Generates, converts and emails an offer letter.
///
/// # Endpoint
///
/// `POST /api/offers`
///
/// # Request Body
///
/// ```json
/// {
///   "intern_name": "asha rao",
///   "domain": "web development",
///   "email": "asha@example.com",
///   "start_date": "2025-06-01",
///   "end_date": "2025-08-31",
///   "offer_date": "2025-05-20"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "record": { "intern_id": "K3F9QZ2LM", "intern_name": "Asha Rao", ... },
///   "pdf_url": "/offers/K3F9QZ2LM/pdf",
///   "pdf_file_name": "Offer_Asha Rao.pdf",
///   "warnings": [{ "kind": "qr_skipped", "reason": "..." }]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` with the first failing rule's message
/// - `500 Internal Server Error` with `Failed to process the offer letter`
pub async fn create_offer_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<CreateOfferResponse>), AppError> {
    // Form rejections take precedence over size limits.
    let limits = payload.validate();
    let form = OfferForm::from(payload);
    if form.validate().is_ok() {
        limits?;
    }

    let receipt = state.offer_service.submit_offer(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOfferResponse {
            pdf_url: pdf_url(receipt.record.intern_id()),
            record: OfferRecordDto::from(&receipt.record),
            pdf_file_name: receipt.pdf_file_name,
            warnings: receipt.warnings,
        }),
    ))
}

/// Downloads a generated offer letter.
///
/// # Endpoint
///
/// `GET /offers/{intern_id}/pdf`
///
/// # Errors
///
/// Returns 404 Not Found if the ID is malformed or no letter was stored.
pub async fn offer_pdf_handler(
    State(state): State<AppState>,
    Path(intern_id): Path<String>,
) -> Result<Response, AppError> {
    let artifact = state.offer_service.offer_pdf(&intern_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&artifact.file_name),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}
