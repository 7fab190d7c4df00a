//! Google Sheets implementation of the record repository.
//!
//! Authenticates with a service account (RS256-signed JWT exchanged for an
//! access token) and talks to the Sheets v4 `values` API.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::domain::entities::{OfferRecord, RecordTable, standard_header};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;
use crate::infrastructure::oauth::{TokenCache, TokenGrant};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";
const JWT_LIFETIME_SECS: i64 = 3600;

/// Subset of a Google service account key file.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"***")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("invalid Sheets URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Record store backed by one sheet of a Google spreadsheet.
pub struct SheetsRecordRepository {
    http: Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    sheet: String,
    api_base: Url,
    token: TokenCache,
}

impl SheetsRecordRepository {
    /// Creates a repository appending to `sheet` of `spreadsheet_id`.
    pub fn new(
        http: Client,
        key: ServiceAccountKey,
        spreadsheet_id: String,
        sheet: String,
    ) -> Result<Self, SheetsError> {
        Ok(Self {
            http,
            key,
            spreadsheet_id,
            sheet,
            api_base: Url::parse(DEFAULT_API_BASE)?,
            token: TokenCache::new(),
        })
    }

    /// Overrides the Sheets API base URL.
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        self.token.get_or_fetch(|| self.fetch_token()).await
    }

    async fn fetch_token(&self) -> Result<TokenGrant, SheetsError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + JWT_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Builds `{base}/{spreadsheet}/values/{range}{suffix}`.
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, SheetsError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, SheetsError> {
        let token = self.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(range, "")?;
        let response = self.request(Method::GET, url).await?.send().await?;
        let body: ValueRange = check_status(response).await?.json().await?;
        Ok(body.values)
    }

    async fn append_values(&self, values: Vec<Vec<String>>) -> Result<(), SheetsError> {
        let mut url = self.values_url(&self.sheet, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .request(Method::POST, url)
            .await?
            .json(&json!({ "values": values }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn append_record(&self, record: &OfferRecord) -> Result<(), SheetsError> {
        let header_range = format!("{}!1:1", self.sheet);
        let mut values = Vec::with_capacity(2);

        if self.get_values(&header_range).await?.is_empty() {
            values.push(standard_header());
        }
        values.push(record.to_row());

        self.append_values(values).await
    }

    async fn overwrite(&self, table: RecordTable) -> Result<(), SheetsError> {
        let clear_url = self.values_url(&self.sheet, ":clear")?;
        let response = self
            .request(Method::POST, clear_url)
            .await?
            .json(&json!({}))
            .send()
            .await?;
        check_status(response).await?;

        let mut values = Vec::with_capacity(table.rows.len() + 1);
        values.push(table.header);
        values.extend(table.rows);

        let mut update_url = self.values_url(&format!("{}!A1", self.sheet), "")?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");

        let response = self
            .request(Method::PUT, update_url)
            .await?
            .json(&json!({ "values": values }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

fn storage_error(operation: &'static str, e: SheetsError) -> AppError {
    tracing::error!(operation, error = %e, "Sheets record store error");
    AppError::internal(
        "Record store error",
        json!({ "backend": "sheets", "operation": operation }),
    )
}

#[async_trait]
impl RecordRepository for SheetsRecordRepository {
    async fn append(&self, record: &OfferRecord) -> Result<(), AppError> {
        self.append_record(record)
            .await
            .map_err(|e| storage_error("append", e))
    }

    async fn read_all(&self) -> Result<RecordTable, AppError> {
        let values = self
            .get_values(&self.sheet)
            .await
            .map_err(|e| storage_error("read", e))?;

        let mut rows = values.into_iter();
        match rows.next() {
            Some(header) => Ok(RecordTable {
                header,
                rows: rows.collect(),
            }),
            None => Ok(RecordTable::empty()),
        }
    }

    async fn replace_all(&self, table: RecordTable) -> Result<(), AppError> {
        self.overwrite(table)
            .await
            .map_err(|e| storage_error("replace", e))
    }

    async fn health_check(&self) -> bool {
        match self.access_token().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Sheets health check failed");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "sheets"
    }
}
