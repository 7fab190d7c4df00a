//! HTTP server initialization and runtime setup.
//!
//! Builds the outbound HTTP client, the record store, the letter renderer and
//! the delivery collaborators, then runs the Axum server.

use crate::application::services::admin_service::generate_session_secret;
use crate::application::services::{AdminService, OfferService, OfferSettings};
use crate::config::{Config, StorageBackend, StorageConfig};
use crate::domain::repositories::RecordRepository;
use crate::infrastructure::artifacts::LocalArtifactStore;
use crate::infrastructure::conversion::AsposeConverter;
use crate::infrastructure::document::{DocxRenderer, ensure_template_file};
use crate::infrastructure::mail::{SmtpMailer, SmtpSettings};
use crate::infrastructure::persistence::{
    CsvRecordRepository, ServiceAccountKey, SheetsRecordRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the outbound HTTP client shared by the conversion and Sheets clients.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Creates the record store selected by `STORAGE_BACKEND`.
///
/// # Errors
///
/// Returns an error if the Sheets service account key cannot be read or parsed.
pub fn record_repository(
    storage: &StorageConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn RecordRepository>> {
    match storage.backend {
        StorageBackend::Csv => Ok(Arc::new(CsvRecordRepository::new(storage.csv_path.clone()))),
        StorageBackend::Sheets => {
            let key: ServiceAccountKey = serde_json::from_str(&storage.service_account_key_json()?)
                .context("Invalid Google service account key")?;
            let sheet_id = storage
                .sheet_id
                .clone()
                .context("GOOGLE_SHEET_ID must be set when STORAGE_BACKEND=sheets")?;

            let repo = SheetsRecordRepository::new(http, key, sheet_id, storage.sheet_name.clone())
                .context("Failed to configure Google Sheets storage")?;
            Ok(Arc::new(repo))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Outbound HTTP client
/// - Record store (CSV or Google Sheets)
/// - Offer template, decoded from `TEMPLATE_BASE64` on first run
/// - Conversion client, SMTP transport and PDF archive
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The template is missing and cannot be decoded
/// - A collaborator cannot be configured
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let http = http_client(config.http_timeout_secs)?;

    let records = record_repository(&config.storage, http.clone())?;
    tracing::info!(backend = records.backend_name(), "Record store ready");

    let source = ensure_template_file(&config.template_path, config.template_base64.as_deref())
        .await
        .context("Offer template is not available")?;
    let renderer = Arc::new(
        DocxRenderer::load(&config.template_path)
            .await
            .context("Failed to load offer template")?,
    );
    tracing::info!(path = %config.template_path.display(), source = ?source, "Offer template loaded");

    let converter = Arc::new(
        AsposeConverter::new(
            http,
            &config.aspose_base_url,
            config.aspose_client_id.clone(),
            config.aspose_client_secret.clone(),
        )
        .context("Failed to configure conversion client")?,
    );

    let mailer = Arc::new(
        SmtpMailer::new(SmtpSettings {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.smtp_user.clone(),
            password: config.smtp_password.clone(),
            from: config.mail_from.clone(),
        })
        .context("Failed to configure SMTP transport")?,
    );

    tokio::fs::create_dir_all(&config.work_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.work_dir.display()))?;
    let artifacts = Arc::new(LocalArtifactStore::new(config.work_dir.clone()));

    let offer_service = Arc::new(OfferService::new(
        records.clone(),
        renderer.clone(),
        converter,
        mailer,
        artifacts,
        OfferSettings {
            company_name: config.company_name.clone(),
            conversion_folder: config.aspose_folder.clone(),
        },
    ));

    let session_secret = generate_session_secret()
        .map_err(|e| anyhow::anyhow!("Failed to generate session secret: {e}"))?;
    let admin_service = Arc::new(AdminService::new(
        records.clone(),
        config.admin_key.clone(),
        session_secret,
    ));

    let state = AppState::new(
        offer_service,
        admin_service,
        records,
        renderer,
        &config.company_name,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
