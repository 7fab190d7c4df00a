//! CLI administration tool for offer-portal.
//!
//! Provides commands for inspecting and maintaining the record store and the
//! offer template without going through the HTTP admin pages.
//!
//! # Usage
//!
//! ```bash
//! # Show logged records
//! cargo run --bin admin -- records list
//!
//! # Export the store to a CSV file
//! cargo run --bin admin -- records export --output backup.csv
//!
//! # Replace the store from a CSV file
//! cargo run --bin admin -- records import backup.csv
//!
//! # Decode TEMPLATE_BASE64 into TEMPLATE_PATH
//! cargo run --bin admin -- template install
//!
//! # Generate a random ADMIN_KEY
//! cargo run --bin admin -- key generate
//! ```
//!
//! # Environment Variables
//!
//! - Storage: `STORAGE_BACKEND`, `CSV_PATH`, `GOOGLE_SHEET_ID`, ...
//! - Template: `TEMPLATE_PATH`, `TEMPLATE_BASE64`
//! - SMTP check: `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD`

use offer_portal::application::services::AdminService;
use offer_portal::application::services::admin_service::generate_session_secret;
use offer_portal::config::{self, StorageConfig};
use offer_portal::infrastructure::document::{
    DocumentRenderer, DocxRenderer, TemplateSource, ensure_template_file,
};
use offer_portal::infrastructure::mail::{SmtpMailer, SmtpSettings};
use offer_portal::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

const CLI_HTTP_TIMEOUT_SECS: u64 = 30;

/// CLI tool for managing offer-portal.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or replace logged offer records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Manage the offer letter template
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Admin key helpers
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Check SMTP connectivity and credentials
    SmtpCheck,
}

#[derive(Subcommand)]
enum RecordsAction {
    /// Print logged records
    List {
        /// Show only the most recent N records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Write the store as CSV
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the store with a CSV file
    Import {
        /// CSV file with the standard header
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Decode TEMPLATE_BASE64 into TEMPLATE_PATH if the file is missing
    Install,

    /// Verify the cached template can be loaded
    Check,
}

#[derive(Subcommand)]
enum KeyAction {
    /// Print a random key suitable for ADMIN_KEY
    Generate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Records { action } => handle_records_action(action).await?,
        Commands::Template { action } => handle_template_action(action).await?,
        Commands::Key { action } => match action {
            KeyAction::Generate => println!("{}", generate_key()),
        },
        Commands::SmtpCheck => smtp_check().await?,
    }

    Ok(())
}

/// Builds an admin service over the configured store.
///
/// The CLI never authenticates, so the service carries no admin key.
fn admin_service() -> Result<AdminService> {
    let storage = StorageConfig::from_env()?;
    storage.validate()?;

    let http = server::http_client(CLI_HTTP_TIMEOUT_SECS)?;
    let records = server::record_repository(&storage, http)?;
    let secret = generate_session_secret()
        .map_err(|e| anyhow::anyhow!("Failed to generate session secret: {e}"))?;

    Ok(AdminService::new(records, String::new(), secret))
}

/// Dispatches record store commands.
async fn handle_records_action(action: RecordsAction) -> Result<()> {
    let service = admin_service()?;

    match action {
        RecordsAction::List { limit } => list_records(&service, limit).await?,
        RecordsAction::Export { output } => export_records(&service, output).await?,
        RecordsAction::Import { file, yes } => import_records(&service, file, yes).await?,
    }

    Ok(())
}

/// Lists logged records, newest last.
///
/// # Output Format
///
/// ```text
/// 📋 Offer Records
///
///   Intern ID  Name                 Domain               Email
///   ─────────────────────────────────────────────────────────────────────────
///   ABC123XYZ  Asha Rao             Web Development      asha@example.com
/// ```
async fn list_records(service: &AdminService, limit: Option<usize>) -> Result<()> {
    println!("{}", "📋 Offer Records".bright_blue().bold());
    println!();

    let table = service
        .list_records()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read records: {}", e))?;

    if table.rows.is_empty() {
        println!("{}", "  No records found".yellow());
        return Ok(());
    }

    let column = |name: &str| table.header.iter().position(|h| h == name);
    let (name, domain, id, email) = (
        column("intern_name"),
        column("domain"),
        column("i_id"),
        column("email"),
    );
    let cell = |row: &[String], index: Option<usize>| -> String {
        index
            .and_then(|i| row.get(i))
            .cloned()
            .unwrap_or_default()
    };

    println!(
        "  {:<10} {:<20} {:<20} {}",
        "Intern ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Domain".bright_white().bold(),
        "Email".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let skip = limit.map_or(0, |n| table.rows.len().saturating_sub(n));
    for row in table.rows.iter().skip(skip) {
        println!(
            "  {:<10} {:<20} {:<20} {}",
            cell(row, id).bright_black(),
            cell(row, name).cyan(),
            cell(row, domain),
            cell(row, email)
        );
    }

    println!();
    println!(
        "  Total: {}",
        table.rows.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Writes the store as CSV to a file or stdout.
async fn export_records(service: &AdminService, output: Option<PathBuf>) -> Result<()> {
    let bytes = service
        .export_csv()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to export records: {}", e))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✅ Exported to".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", String::from_utf8_lossy(&bytes)),
    }

    Ok(())
}

/// Replaces the store with a CSV file after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - The file is checked against the standard header before anything is written
async fn import_records(service: &AdminService, file: PathBuf, skip_confirm: bool) -> Result<()> {
    println!("{}", "📥 Replace Offer Records".bright_blue().bold());
    println!();

    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("  File: {}", file.display().to_string().cyan());
    println!(
        "{}",
        "⚠️  Every existing record will be replaced.".yellow()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Replace the record store?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let count = service
        .replace_records(&bytes)
        .await
        .map_err(|e| anyhow::anyhow!("Import rejected: {}", e))?;

    println!();
    println!(
        "{} {} rows",
        "✅ Records replaced:".green().bold(),
        count.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles template commands.
async fn handle_template_action(action: TemplateAction) -> Result<()> {
    let path = config::template_path_from_env();

    match action {
        TemplateAction::Install => {
            let encoded = config::template_base64_from_env();
            let source = ensure_template_file(&path, encoded.as_deref())
                .await
                .context("Failed to install template")?;

            match source {
                TemplateSource::Cached => println!(
                    "{} {}",
                    "ℹ️  Template already present at".bright_blue(),
                    path.display().to_string().cyan()
                ),
                TemplateSource::Decoded => println!(
                    "{} {}",
                    "✅ Template written to".green().bold(),
                    path.display().to_string().cyan()
                ),
            }
        }
        TemplateAction::Check => {
            println!("{}", "🔍 Checking offer template...".bright_blue());

            let renderer = Arc::new(
                DocxRenderer::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
            );
            anyhow::ensure!(renderer.is_ready(), "Template is not usable");

            println!("{}", "✅ Template OK".green().bold());
        }
    }

    Ok(())
}

/// Opens an SMTP session and authenticates without sending anything.
async fn smtp_check() -> Result<()> {
    println!("{}", "🔍 Checking SMTP connection...".bright_blue());

    let username = std::env::var("SMTP_USER").context("SMTP_USER must be set")?;
    let mailer = SmtpMailer::new(SmtpSettings {
        host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
        port: std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587),
        password: std::env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
        from: username.clone(),
        username,
    })?;

    if mailer.test_connection().await? {
        println!("{}", "✅ SMTP connection OK".green().bold());
    } else {
        println!("{}", "❌ SMTP server rejected the connection".red().bold());
    }

    Ok(())
}

/// Generates a random admin key.
///
/// # Format
///
/// - Length: 32 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_key() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const KEY_LEN: usize = 32;

    let mut rng = rand::rng();

    (0..KEY_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
