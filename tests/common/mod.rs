#![allow(dead_code)]

use async_trait::async_trait;
use offer_portal::application::services::{AdminService, OfferService, OfferSettings};
use offer_portal::domain::repositories::RecordRepository;
use offer_portal::infrastructure::artifacts::LocalArtifactStore;
use offer_portal::infrastructure::conversion::{
    ConversionError, ConversionResult, DocumentConverter, TargetFormat,
};
use offer_portal::infrastructure::document::{DocumentRenderer, DocxRenderer};
use offer_portal::infrastructure::mail::{MailError, MailResult, Mailer, OutgoingMail};
use offer_portal::infrastructure::persistence::CsvRecordRepository;
use offer_portal::state::AppState;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const ADMIN_KEY: &str = "test-admin-key";
pub const COMPANY: &str = "Test Company";
pub const SESSION_SECRET: [u8; 32] = [42u8; 32];

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

/// Offer letter template with a QR cell at table 0, row 0, cell 2.
pub fn offer_template_xml() -> String {
    concat!(
        r#"<w:document xmlns:w="w"><w:body>"#,
        r#"<w:tbl><w:tr>"#,
        r#"<w:tc><w:p><w:r><w:t>Logo</w:t></w:r></w:p></w:tc>"#,
        r#"<w:tc><w:p><w:r><w:t>ID: {{ i_id }}</w:t></w:r></w:p></w:tc>"#,
        r#"<w:tc><w:p></w:p></w:tc>"#,
        r#"</w:tr></w:tbl>"#,
        r#"<w:p><w:r><w:t>Dear {{ intern_name }},</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t>Domain: {{ domain }} from {{ start_date }} to {{ end_date }}</w:t></w:r></w:p>"#,
        r#"</w:body></w:document>"#,
    )
    .to_string()
}

/// Builds a minimal DOCX archive around `document_xml`.
pub fn build_docx(document_xml: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/_rels/document.xml.rels", RELS),
        ("word/document.xml", document_xml),
    ] {
        writer.start_file(name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Reads one XML part out of a DOCX archive.
pub fn read_part(docx: &[u8], name: &str) -> Option<String> {
    String::from_utf8(read_part_bytes(docx, name)?).ok()
}

/// Reads one part out of a DOCX archive as raw bytes, for media entries.
pub fn read_part_bytes(docx: &[u8], name: &str) -> Option<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(docx)).ok()?;
    let mut entry = archive.by_name(name).ok()?;
    let mut out = Vec::new();
    entry.read_to_end(&mut out).ok()?;
    Some(out)
}

/// Conversion service double that keeps files in memory.
///
/// `save_as` prefixes the source bytes with a PDF marker so tests can tell
/// converted output from the uploaded DOCX.
#[derive(Default)]
pub struct FakeConverter {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail: AtomicBool,
    fail_download: AtomicBool,
}

impl FakeConverter {
    pub fn failing() -> Self {
        let converter = Self::default();
        converter.fail.store(true, Ordering::SeqCst);
        converter
    }

    /// Accepts uploads and conversions but cannot return the result.
    pub fn failing_download() -> Self {
        let converter = Self::default();
        converter.fail_download.store(true, Ordering::SeqCst);
        converter
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl DocumentConverter for FakeConverter {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> ConversionResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConversionError::Api {
                step: "upload",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.files.lock().unwrap().insert(path.to_string(), bytes);
        Ok(())
    }

    async fn save_as(&self, source: &str, target: &str, format: TargetFormat) -> ConversionResult<()> {
        assert_eq!(format, TargetFormat::Pdf);
        let mut files = self.files.lock().unwrap();
        let source_bytes = files.get(source).cloned().ok_or(ConversionError::Api {
            step: "save_as",
            status: 404,
            body: source.to_string(),
        })?;

        let mut pdf = b"%PDF-1.7\n".to_vec();
        pdf.extend_from_slice(&source_bytes);
        files.insert(target.to_string(), pdf);
        Ok(())
    }

    async fn download(&self, path: &str) -> ConversionResult<Vec<u8>> {
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(ConversionError::Api {
                step: "download",
                status: 500,
                body: "storage error".to_string(),
            });
        }
        self.file(path).ok_or(ConversionError::Api {
            step: "download",
            status: 404,
            body: path.to_string(),
        })
    }
}

/// Mailer double recording every delivered message.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> MailResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("535 authentication failed".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Fully wired state over a temporary directory.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
    pub records: Arc<CsvRecordRepository>,
    pub converter: Arc<FakeConverter>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    pub fn csv_path(&self) -> PathBuf {
        self.records.path().to_path_buf()
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("generated")
    }
}

pub fn create_test_context() -> TestContext {
    create_context_with(FakeConverter::default(), RecordingMailer::default())
}

pub fn create_context_with(converter: FakeConverter, mailer: RecordingMailer) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let renderer: Arc<dyn DocumentRenderer> =
        Arc::new(DocxRenderer::from_bytes(build_docx(&offer_template_xml())).unwrap());

    create_context_from(dir, renderer, converter, mailer)
}

pub fn create_context_from(
    dir: TempDir,
    renderer: Arc<dyn DocumentRenderer>,
    converter: FakeConverter,
    mailer: RecordingMailer,
) -> TestContext {
    let records = Arc::new(CsvRecordRepository::new(dir.path().join("intern_offers.csv")));
    let converter = Arc::new(converter);
    let mailer = Arc::new(mailer);
    let artifacts = Arc::new(LocalArtifactStore::new(dir.path().join("generated")));

    let offer_service = Arc::new(OfferService::new(
        records.clone(),
        renderer.clone(),
        converter.clone(),
        mailer.clone(),
        artifacts,
        OfferSettings {
            company_name: COMPANY.to_string(),
            conversion_folder: "offers".to_string(),
        },
    ));
    let admin_service = Arc::new(AdminService::new(
        records.clone(),
        ADMIN_KEY.to_string(),
        SESSION_SECRET,
    ));

    let state = AppState::new(
        offer_service,
        admin_service,
        records.clone() as Arc<dyn RecordRepository>,
        renderer,
        COMPANY,
    );

    TestContext {
        dir,
        state,
        records,
        converter,
        mailer,
    }
}

pub fn offer_json() -> serde_json::Value {
    serde_json::json!({
        "intern_name": "  asha rao ",
        "domain": "web development",
        "email": "Asha@Example.com",
        "start_date": "2025-06-01",
        "end_date": "2025-08-31",
        "offer_date": "2025-05-20"
    })
}

pub fn record_header_line() -> String {
    offer_portal::domain::entities::RECORD_COLUMNS.join(",")
}
