//! Offer form input and the immutable offer record derived from it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::text::{format_display_date, title_case};

/// Basic `local@domain.tld` shape check applied to the trimmed address.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap());

/// Column order used for storage rows, the CSV header and template fields.
pub const RECORD_COLUMNS: [&str; 7] = [
    "intern_name",
    "domain",
    "start_date",
    "end_date",
    "offer_date",
    "i_id",
    "email",
];

/// Raw submission as entered in the form.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferForm {
    pub intern_name: String,
    pub domain: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offer_date: NaiveDate,
}

/// Reason a submission was turned away before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFields,
    InvalidEmail,
    EndBeforeStart,
}

impl Rejection {
    /// Message shown to the person filling the form.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::MissingFields => "Please fill all fields.",
            Rejection::InvalidEmail => "Invalid email.",
            Rejection::EndBeforeStart => "End date cannot be before start date.",
        }
    }

    /// Stable identifier reported in API error details.
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::MissingFields => "missing_fields",
            Rejection::InvalidEmail => "invalid_email",
            Rejection::EndBeforeStart => "end_before_start",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl OfferForm {
    /// Checks the form in order; the first failing rule is reported.
    ///
    /// 1. Name, domain and email are non-empty after trimming.
    /// 2. Email has a `local@domain.tld` shape.
    /// 3. End date is not before start date.
    pub fn validate(&self) -> Result<(), Rejection> {
        let name = self.intern_name.trim();
        let domain = self.domain.trim();
        let email = self.email.trim();

        if name.is_empty() || domain.is_empty() || email.is_empty() {
            return Err(Rejection::MissingFields);
        }

        if !EMAIL_REGEX.is_match(email) {
            return Err(Rejection::InvalidEmail);
        }

        if self.end_date < self.start_date {
            return Err(Rejection::EndBeforeStart);
        }

        Ok(())
    }
}

/// Accepted submission. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferRecord {
    intern_id: String,
    intern_name: String,
    domain: String,
    email: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    offer_date: NaiveDate,
}

impl OfferRecord {
    /// Builds a record from a validated form, normalizing the free-text fields.
    ///
    /// Callers must run [`OfferForm::validate`] first.
    pub fn from_form(intern_id: String, form: &OfferForm) -> Self {
        Self {
            intern_id,
            intern_name: title_case(form.intern_name.trim()),
            domain: title_case(form.domain.trim()),
            email: form.email.trim().to_lowercase(),
            start_date: form.start_date,
            end_date: form.end_date,
            offer_date: form.offer_date,
        }
    }

    pub fn intern_id(&self) -> &str {
        &self.intern_id
    }

    pub fn intern_name(&self) -> &str {
        &self.intern_name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn offer_date(&self) -> NaiveDate {
        self.offer_date
    }

    pub fn start_date_display(&self) -> String {
        format_display_date(self.start_date)
    }

    pub fn end_date_display(&self) -> String {
        format_display_date(self.end_date)
    }

    pub fn offer_date_display(&self) -> String {
        format_display_date(self.offer_date)
    }

    /// Storage row in [`RECORD_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.intern_name.clone(),
            self.domain.clone(),
            self.start_date_display(),
            self.end_date_display(),
            self.offer_date_display(),
            self.intern_id.clone(),
            self.email.clone(),
        ]
    }

    /// Placeholder values for the offer letter template, keyed by column name.
    pub fn template_fields(&self) -> BTreeMap<String, String> {
        RECORD_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .zip(self.to_row())
            .collect()
    }

    /// Comma-joined summary encoded in the offer letter's QR code.
    pub fn qr_payload(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}",
            self.intern_name,
            self.domain,
            self.start_date,
            self.end_date,
            self.offer_date,
            self.intern_id
        )
    }
}

/// Raw tabular read-back of the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Empty table carrying the standard header.
    pub fn empty() -> Self {
        Self {
            header: standard_header(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if the header matches [`RECORD_COLUMNS`] exactly.
    pub fn has_standard_header(&self) -> bool {
        self.header.iter().map(String::as_str).eq(RECORD_COLUMNS)
    }
}

/// [`RECORD_COLUMNS`] as owned strings.
pub fn standard_header() -> Vec<String> {
    RECORD_COLUMNS.iter().map(|c| c.to_string()).collect()
}
