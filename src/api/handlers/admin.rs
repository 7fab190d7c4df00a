//! Handlers for admin record endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::api::dto::admin::RecordTableResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::http::attachment_disposition;

/// File name offered for CSV exports.
pub const EXPORT_FILE_NAME: &str = "intern_offers.csv";

/// Lists every logged record.
///
/// # Endpoint
///
/// `GET /api/admin/records`
///
/// # Response
///
/// ```json
/// {
///   "header": ["intern_name", "domain", "start_date", "end_date", "offer_date", "i_id", "email"],
///   "rows": [["Asha Rao", "Web Development", "Sunday, 01 June 2025", ...]],
///   "total": 1
/// }
/// ```
pub async fn list_records_handler(
    State(state): State<AppState>,
) -> Result<Json<RecordTableResponse>, AppError> {
    let table = state.admin_service.list_records().await?;
    Ok(Json(table.into()))
}

/// Exports the record store as CSV.
///
/// # Endpoint
///
/// `GET /api/admin/records/export`
pub async fn export_records_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let csv = state.admin_service.export_csv().await?;
    Ok(csv_attachment(csv))
}

/// Builds a `text/csv` download response.
pub fn csv_attachment(csv: Vec<u8>) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Replaces the record store with the CSV request body.
///
/// # Endpoint
///
/// `PUT /api/admin/records` with `Content-Type: text/csv`
///
/// The first line must be exactly the record columns and every row must have
/// the same number of fields.
///
/// # Response
///
/// `204 No Content`
///
/// # Errors
///
/// Returns 400 Bad Request if the file is not valid CSV, the header is wrong,
/// or a row is ragged.
pub async fn replace_records_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state.admin_service.replace_records(&body).await?;
    Ok(StatusCode::NO_CONTENT)
}
