//! Admin record pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::handlers::admin::csv_attachment;
use crate::domain::entities::RecordTable;
use crate::error::AppError;
use crate::state::AppState;

/// Template for the admin records page.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
struct AdminTemplate<'a> {
    company_name: &'a str,
    table: RecordTable,
    notice: Option<String>,
    error: Option<String>,
}

async fn render(
    state: &AppState,
    status: StatusCode,
    notice: Option<String>,
    error: Option<String>,
) -> Result<Response, AppError> {
    let table = state.admin_service.list_records().await?;
    Ok((
        status,
        AdminTemplate {
            company_name: &state.company_name,
            table,
            notice,
            error,
        },
    )
        .into_response())
}

/// Renders the record table.
///
/// # Endpoint
///
/// `GET /admin`
pub async fn admin_page_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    render(&state, StatusCode::OK, None, None).await
}

/// Downloads the record store as CSV.
///
/// # Endpoint
///
/// `GET /admin/records.csv`
pub async fn download_records_handler(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let csv = state.admin_service.export_csv().await?;
    Ok(csv_attachment(csv))
}

/// Replaces the record store from an uploaded CSV file.
///
/// # Endpoint
///
/// `POST /admin/records` (`multipart/form-data` with a `file` field)
///
/// Re-renders the records page with a notice, or with the validation
/// message and `400` when the file is rejected.
pub async fn upload_records_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await.map_err(upload_error)?);
            break;
        }
    }

    let Some(bytes) = upload else {
        return render(
            &state,
            StatusCode::BAD_REQUEST,
            None,
            Some("Choose a CSV file to upload.".to_string()),
        )
        .await;
    };

    match state.admin_service.replace_records(&bytes).await {
        Ok(count) => {
            render(
                &state,
                StatusCode::OK,
                Some(format!("Replaced records: {count} rows.")),
                None,
            )
            .await
        }
        Err(AppError::Validation { message, .. }) => {
            render(&state, StatusCode::BAD_REQUEST, None, Some(message)).await
        }
        Err(e) => Err(e),
    }
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::bad_request("Invalid upload", json!({ "reason": e.body_text() }))
}
