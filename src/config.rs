//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup (after `dotenvy` has read an
//! optional `.env` file) and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `ADMIN_KEY` - Shared key for the admin pages and API
//! - `SMTP_USER`, `SMTP_PASSWORD` - SMTP credentials
//! - `ASPOSE_CLIENT_ID`, `ASPOSE_CLIENT_SECRET` - Conversion service credentials
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `COMPANY_NAME` - Company named in emails and pages
//! - `SMTP_HOST` / `SMTP_PORT` - Relay (default: `smtp.gmail.com:587`)
//! - `MAIL_FROM` - Sender mailbox (default: `SMTP_USER`)
//! - `ASPOSE_BASE_URL` - API root (default: `https://api.aspose.cloud`)
//! - `ASPOSE_FOLDER` - Remote folder for conversion files (default: `offers`)
//! - `TEMPLATE_PATH` - Cached template file (default: `<tmp>/offer_template.docx`)
//! - `TEMPLATE_BASE64` - Template contents, decoded when `TEMPLATE_PATH` is missing
//! - `WORK_DIR` - Directory for generated PDFs (default: `generated`)
//! - `HTTP_TIMEOUT_SECS` - Outbound HTTP timeout (default: 30)
//! - Storage, see [`StorageConfig`]

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Record store selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Csv,
    Sheets,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageBackend::Csv),
            "sheets" | "google_sheets" => Ok(StorageBackend::Sheets),
            other => anyhow::bail!("STORAGE_BACKEND must be 'csv' or 'sheets', got '{other}'"),
        }
    }
}

/// Record store configuration, shared by the server and the admin CLI.
///
/// - `STORAGE_BACKEND` - `csv` (default) or `sheets`
/// - `CSV_PATH` - CSV file (default: `intern_offers.csv`)
/// - `GOOGLE_SHEET_ID` - Spreadsheet ID (sheets backend)
/// - `GOOGLE_SHEET_NAME` - Sheet name (default: `Sheet1`)
/// - `GOOGLE_SERVICE_ACCOUNT_JSON` - Service account key contents
/// - `GOOGLE_SERVICE_ACCOUNT_FILE` - Path to the key file, used when the JSON is not set
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub csv_path: PathBuf,
    pub sheet_id: Option<String>,
    pub sheet_name: String,
    pub service_account_json: Option<String>,
    pub service_account_file: Option<PathBuf>,
}

impl StorageConfig {
    /// Loads storage settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STORAGE_BACKEND` is not recognized.
    pub fn from_env() -> Result<Self> {
        let backend = match non_empty_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Csv,
        };

        Ok(Self {
            backend,
            csv_path: non_empty_var("CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("intern_offers.csv")),
            sheet_id: non_empty_var("GOOGLE_SHEET_ID"),
            sheet_name: non_empty_var("GOOGLE_SHEET_NAME").unwrap_or_else(|| "Sheet1".to_string()),
            service_account_json: non_empty_var("GOOGLE_SERVICE_ACCOUNT_JSON"),
            service_account_file: non_empty_var("GOOGLE_SERVICE_ACCOUNT_FILE").map(PathBuf::from),
        })
    }

    /// Validates backend-specific settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheets backend lacks a spreadsheet ID or key.
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Sheets {
            if self.sheet_id.is_none() {
                anyhow::bail!("GOOGLE_SHEET_ID must be set when STORAGE_BACKEND=sheets");
            }
            if self.service_account_json.is_none() && self.service_account_file.is_none() {
                anyhow::bail!(
                    "GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_SERVICE_ACCOUNT_FILE must be set when STORAGE_BACKEND=sheets"
                );
            }
        }
        Ok(())
    }

    /// Returns the service account key JSON, reading the key file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured or the file cannot be read.
    pub fn service_account_key_json(&self) -> Result<String> {
        if let Some(json) = &self.service_account_json {
            return Ok(json.clone());
        }
        let path = self
            .service_account_file
            .as_ref()
            .context("No Google service account key configured")?;
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key {}", path.display()))
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub admin_key: String,
    pub company_name: String,

    // ── SMTP ────────────────────────────────────────────────────────────────
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub mail_from: String,

    // ── Conversion service ──────────────────────────────────────────────────
    pub aspose_client_id: String,
    pub aspose_client_secret: String,
    pub aspose_base_url: String,
    pub aspose_folder: String,

    // ── Documents ───────────────────────────────────────────────────────────
    pub template_path: PathBuf,
    pub template_base64: Option<String>,
    pub work_dir: PathBuf,

    pub http_timeout_secs: u64,
    pub storage: StorageConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let admin_key = env::var("ADMIN_KEY").context("ADMIN_KEY must be set")?;
        let company_name =
            non_empty_var("COMPANY_NAME").unwrap_or_else(|| "SkyHighes Technologies".to_string());

        let smtp_host = non_empty_var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);
        let smtp_user = env::var("SMTP_USER").context("SMTP_USER must be set")?;
        let smtp_password = env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?;
        let mail_from = non_empty_var("MAIL_FROM").unwrap_or_else(|| smtp_user.clone());

        let aspose_client_id = env::var("ASPOSE_CLIENT_ID").context("ASPOSE_CLIENT_ID must be set")?;
        let aspose_client_secret =
            env::var("ASPOSE_CLIENT_SECRET").context("ASPOSE_CLIENT_SECRET must be set")?;
        let aspose_base_url = non_empty_var("ASPOSE_BASE_URL")
            .unwrap_or_else(|| "https://api.aspose.cloud".to_string());
        let aspose_folder = env::var("ASPOSE_FOLDER").unwrap_or_else(|_| "offers".to_string());

        let template_path = template_path_from_env();
        let template_base64 = template_base64_from_env();
        let work_dir = non_empty_var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("generated"));

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let storage = StorageConfig::from_env()?;

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            admin_key,
            company_name,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_password,
            mail_from,
            aspose_client_id,
            aspose_client_secret,
            aspose_base_url,
            aspose_folder,
            template_path,
            template_base64,
            work_dir,
            http_timeout_secs,
            storage,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `admin_key` is empty
    /// - SMTP or conversion settings are unusable
    /// - storage settings are incomplete
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.admin_key.is_empty() {
            anyhow::bail!("ADMIN_KEY must not be empty");
        }

        if self.smtp_port == 0 {
            anyhow::bail!("SMTP_PORT must be greater than 0");
        }

        if self.smtp_user.is_empty() || self.smtp_password.is_empty() {
            anyhow::bail!("SMTP_USER and SMTP_PASSWORD must not be empty");
        }

        if self.aspose_client_id.is_empty() || self.aspose_client_secret.is_empty() {
            anyhow::bail!("ASPOSE_CLIENT_ID and ASPOSE_CLIENT_SECRET must not be empty");
        }

        if !self.aspose_base_url.starts_with("http://")
            && !self.aspose_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "ASPOSE_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.aspose_base_url
            );
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }

        self.storage.validate()
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Admin key: {}", mask_secret(&self.admin_key));
        tracing::info!(
            "  SMTP: {}@{}:{} (password {})",
            self.smtp_user,
            self.smtp_host,
            self.smtp_port,
            mask_secret(&self.smtp_password)
        );
        tracing::info!(
            "  Conversion: {} (client {})",
            self.aspose_base_url,
            mask_secret(&self.aspose_client_id)
        );
        tracing::info!("  Template: {}", self.template_path.display());
        tracing::info!("  Work dir: {}", self.work_dir.display());

        match self.storage.backend {
            StorageBackend::Csv => {
                tracing::info!("  Storage: csv ({})", self.storage.csv_path.display())
            }
            StorageBackend::Sheets => tracing::info!(
                "  Storage: sheets ({} / {})",
                self.storage.sheet_id.as_deref().unwrap_or("-"),
                self.storage.sheet_name
            ),
        }
    }
}

/// Template cache path from `TEMPLATE_PATH`, defaulting to the temp directory.
pub fn template_path_from_env() -> PathBuf {
    non_empty_var("TEMPLATE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("offer_template.docx"))
}

/// Encoded template from `TEMPLATE_BASE64`, if set.
pub fn template_base64_from_env() -> Option<String> {
    non_empty_var("TEMPLATE_BASE64")
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Masks a secret for logging, keeping at most its first two characters.
///
/// - `"supersecret"` → `"su***"`
/// - `"abc"` → `"***"`
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(2).collect();
    format!("{prefix}***")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
