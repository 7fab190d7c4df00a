//! DTOs for offer submission endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{OfferForm, OfferRecord};
use crate::domain::submission::PipelineWarning;

/// Request to generate and send one offer letter.
///
/// Field presence, email shape and date order are checked by the pipeline.
/// The size limits here are enforced only for forms that pass those rules.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOfferRequest {
    #[validate(length(max = 200))]
    pub intern_name: String,

    #[validate(length(max = 200))]
    pub domain: String,

    #[validate(length(max = 254))]
    pub email: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offer_date: NaiveDate,
}

impl From<CreateOfferRequest> for OfferForm {
    fn from(request: CreateOfferRequest) -> Self {
        OfferForm {
            intern_name: request.intern_name,
            domain: request.domain,
            email: request.email,
            start_date: request.start_date,
            end_date: request.end_date,
            offer_date: request.offer_date,
        }
    }
}

/// Stored record as returned to API clients.
#[derive(Debug, Serialize)]
pub struct OfferRecordDto {
    pub intern_id: String,
    pub intern_name: String,
    pub domain: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offer_date: NaiveDate,
    /// Start date in letter format, e.g. `Sunday, 01 June 2025`.
    pub start_date_display: String,
    pub end_date_display: String,
    pub offer_date_display: String,
}

impl From<&OfferRecord> for OfferRecordDto {
    fn from(record: &OfferRecord) -> Self {
        Self {
            intern_id: record.intern_id().to_string(),
            intern_name: record.intern_name().to_string(),
            domain: record.domain().to_string(),
            email: record.email().to_string(),
            start_date: record.start_date(),
            end_date: record.end_date(),
            offer_date: record.offer_date(),
            start_date_display: record.start_date_display(),
            end_date_display: record.end_date_display(),
            offer_date_display: record.offer_date_display(),
        }
    }
}

/// Response for a delivered offer letter.
#[derive(Debug, Serialize)]
pub struct CreateOfferResponse {
    pub record: OfferRecordDto,
    /// Relative URL of the generated PDF.
    pub pdf_url: String,
    pub pdf_file_name: String,
    pub warnings: Vec<PipelineWarning>,
}
