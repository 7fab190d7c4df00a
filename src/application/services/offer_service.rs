//! Offer letter submission pipeline.
//!
//! Validates a form, logs the record, renders the letter with a QR code,
//! converts it to PDF, emails it and keeps a copy for direct download.
//! Collaborator failures are classified as fatal or non-fatal; nothing is
//! rolled back and nothing is retried.

use std::sync::Arc;

use askama::Template;
use metrics::counter;
use serde_json::json;
use tracing::Instrument;

use crate::domain::entities::{OfferForm, OfferRecord, Rejection};
use crate::domain::repositories::RecordRepository;
use crate::domain::submission::{
    OfferReceipt, PipelineWarning, StageTracker, SubmissionStage,
};
use crate::error::AppError;
use crate::infrastructure::artifacts::{ArtifactError, ArtifactStore, StoredArtifact};
use crate::infrastructure::conversion::{ConversionError, DocumentConverter, TargetFormat};
use crate::infrastructure::document::{DocumentError, DocumentRenderer, ImageAnchor};
use crate::infrastructure::mail::{MailAttachment, MailError, Mailer, OutgoingMail};
use crate::utils::intern_id::{generate_intern_id, is_valid_intern_id};
use crate::utils::qr::render_qr_png;
use crate::utils::text::file_safe_name;

/// Message shown for any fatal processing failure.
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process the offer letter";

/// Reason a submission did not produce a delivered letter.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Rejected(Rejection),
    #[error("rendering failed: {0}")]
    Rendering(#[source] DocumentError),
    #[error("conversion failed: {0}")]
    Conversion(#[source] ConversionError),
    #[error("delivery failed: {0}")]
    Delivery(#[source] MailError),
    #[error("archiving failed: {0}")]
    Archive(#[source] ArtifactError),
}

impl SubmissionError {
    /// Label used for metrics and error details.
    pub fn outcome(&self) -> &'static str {
        match self {
            SubmissionError::Rejected(_) => "rejected",
            SubmissionError::Rendering(_) => "rendering_failed",
            SubmissionError::Conversion(_) => "conversion_failed",
            SubmissionError::Delivery(_) => "delivery_failed",
            SubmissionError::Archive(_) => "archive_failed",
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::Rejected(rejection) => AppError::bad_request(
                rejection.message(),
                json!({ "reason": rejection.reason() }),
            ),
            other => AppError::internal(
                PROCESSING_FAILED_MESSAGE,
                json!({ "stage": other.outcome() }),
            ),
        }
    }
}

/// Fixed settings for the pipeline.
#[derive(Debug, Clone)]
pub struct OfferSettings {
    /// Company named in the email body.
    pub company_name: String,
    /// Remote folder under which conversion files are stored.
    pub conversion_folder: String,
}

/// HTML body of the offer email.
#[derive(Template)]
#[template(path = "email/offer.html")]
struct OfferEmailTemplate<'a> {
    intern_name: &'a str,
    intern_id: &'a str,
    domain: &'a str,
    start_date: String,
    end_date: String,
    offer_date: String,
    company_name: &'a str,
}

/// Service running the offer submission pipeline.
pub struct OfferService {
    records: Arc<dyn RecordRepository>,
    renderer: Arc<dyn DocumentRenderer>,
    converter: Arc<dyn DocumentConverter>,
    mailer: Arc<dyn Mailer>,
    artifacts: Arc<dyn ArtifactStore>,
    settings: OfferSettings,
}

impl OfferService {
    /// Creates a new pipeline over the given collaborators.
    pub fn new(
        records: Arc<dyn RecordRepository>,
        renderer: Arc<dyn DocumentRenderer>,
        converter: Arc<dyn DocumentConverter>,
        mailer: Arc<dyn Mailer>,
        artifacts: Arc<dyn ArtifactStore>,
        settings: OfferSettings,
    ) -> Self {
        Self {
            records,
            renderer,
            converter,
            mailer,
            artifacts,
            settings,
        }
    }

    /// Processes one submission end to end.
    ///
    /// # Steps
    ///
    /// 1. Validate the form (no side effects on rejection)
    /// 2. Generate the intern ID and build the record
    /// 3. Append the record to the store (non-fatal)
    /// 4. Render the letter and embed the QR code (QR is non-fatal)
    /// 5. Convert to PDF remotely
    /// 6. Email the PDF
    /// 7. Keep the PDF for direct download
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Rejected`] for invalid input and one of the
    /// fatal variants when rendering, conversion, delivery or archiving fail.
    pub async fn submit_offer(&self, form: OfferForm) -> Result<OfferReceipt, SubmissionError> {
        let mut stage = StageTracker::new();
        stage.advance(SubmissionStage::Validating);

        if let Err(rejection) = form.validate() {
            stage.advance(SubmissionStage::Rejected);
            counter!("offer_submissions_total", "outcome" => "rejected").increment(1);
            tracing::info!(reason = rejection.reason(), "Offer submission rejected");
            return Err(SubmissionError::Rejected(rejection));
        }

        let record = OfferRecord::from_form(generate_intern_id(), &form);
        let span = tracing::info_span!("offer_submission", intern_id = %record.intern_id());

        self.process(record, stage).instrument(span).await
    }

    async fn process(
        &self,
        record: OfferRecord,
        mut stage: StageTracker,
    ) -> Result<OfferReceipt, SubmissionError> {
        let mut warnings = Vec::new();

        stage.advance(SubmissionStage::Recording);
        if let Err(e) = self.records.append(&record).await {
            tracing::warn!(
                backend = self.records.backend_name(),
                error = %e,
                "Record not logged, continuing"
            );
            warnings.push(PipelineWarning::PersistenceSkipped {
                reason: e.to_string(),
            });
        }

        stage.advance(SubmissionStage::Rendering);
        match self.produce(&record, &mut stage, &mut warnings).await {
            Ok(pdf_file_name) => {
                stage.advance(SubmissionStage::Succeeded);
                counter!("offer_submissions_total", "outcome" => "succeeded").increment(1);
                tracing::info!(
                    email = record.email(),
                    warnings = warnings.len(),
                    "Offer letter delivered"
                );
                Ok(OfferReceipt {
                    record,
                    pdf_file_name,
                    warnings,
                })
            }
            Err(e) => {
                stage.advance(SubmissionStage::Failed);
                counter!("offer_submissions_total", "outcome" => e.outcome()).increment(1);
                tracing::error!(
                    intern_id = record.intern_id(),
                    error = %e,
                    "Offer letter processing failed"
                );
                Err(e)
            }
        }
    }

    /// Runs the fatal steps and returns the delivered PDF's file name.
    async fn produce(
        &self,
        record: &OfferRecord,
        stage: &mut StageTracker,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Result<String, SubmissionError> {
        let rendered = self
            .renderer
            .render(&record.template_fields())
            .await
            .map_err(SubmissionError::Rendering)?;

        let docx = match self.embed_qr(record, &rendered).await {
            Ok(with_qr) => with_qr,
            Err(reason) => {
                tracing::warn!(reason = %reason, "QR insertion failed, sending letter without it");
                warnings.push(PipelineWarning::QrSkipped { reason });
                rendered
            }
        };

        stage.advance(SubmissionStage::Converting);
        let base_name = format!("Offer_{}", file_safe_name(record.intern_name()));
        let docx_name = format!("{base_name}.docx");
        let pdf_name = format!("{base_name}.{}", TargetFormat::Pdf.extension());
        let pdf = self
            .convert(record.intern_id(), &docx_name, &pdf_name, docx)
            .await
            .map_err(SubmissionError::Conversion)?;

        stage.advance(SubmissionStage::Delivering);
        let mail = self
            .compose_mail(record, &pdf_name, pdf.clone())
            .map_err(SubmissionError::Delivery)?;
        self.mailer
            .send(mail)
            .await
            .map_err(SubmissionError::Delivery)?;

        self.artifacts
            .save(record.intern_id(), &pdf_name, &pdf)
            .await
            .map_err(SubmissionError::Archive)?;

        Ok(pdf_name)
    }

    async fn embed_qr(&self, record: &OfferRecord, docx: &[u8]) -> Result<Vec<u8>, String> {
        let png = render_qr_png(&record.qr_payload()).map_err(|e| e.to_string())?;
        self.renderer
            .embed_image(docx, &png, ImageAnchor::OFFER_QR)
            .await
            .map_err(|e| e.to_string())
    }

    fn remote_dir(&self, intern_id: &str) -> String {
        let folder = self.settings.conversion_folder.trim_matches('/');
        if folder.is_empty() {
            intern_id.to_string()
        } else {
            format!("{folder}/{intern_id}")
        }
    }

    async fn convert(
        &self,
        intern_id: &str,
        docx_name: &str,
        pdf_name: &str,
        docx: Vec<u8>,
    ) -> Result<Vec<u8>, ConversionError> {
        let dir = self.remote_dir(intern_id);
        let docx_path = format!("{dir}/{docx_name}");
        let pdf_path = format!("{dir}/{pdf_name}");

        self.converter.upload(&docx_path, docx).await?;
        self.converter
            .save_as(&docx_path, &pdf_path, TargetFormat::Pdf)
            .await?;
        self.converter.download(&pdf_path).await
    }

    fn compose_mail(
        &self,
        record: &OfferRecord,
        pdf_name: &str,
        pdf: Vec<u8>,
    ) -> Result<OutgoingMail, MailError> {
        let body = OfferEmailTemplate {
            intern_name: record.intern_name(),
            intern_id: record.intern_id(),
            domain: record.domain(),
            start_date: record.start_date_display(),
            end_date: record.end_date_display(),
            offer_date: record.offer_date_display(),
            company_name: &self.settings.company_name,
        }
        .render()
        .map_err(|e| MailError::Build(e.to_string()))?;

        Ok(OutgoingMail {
            to: record.email().to_string(),
            subject: offer_subject(record.intern_name()),
            html_body: body,
            attachment: Some(MailAttachment {
                file_name: pdf_name.to_string(),
                content_type: "application/pdf".to_string(),
                bytes: pdf,
            }),
        })
    }

    /// Returns the stored PDF for `intern_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the ID is malformed or nothing was stored,
    /// and [`AppError::Internal`] if the store cannot be read.
    pub async fn offer_pdf(&self, intern_id: &str) -> Result<StoredArtifact, AppError> {
        let not_found = || {
            AppError::not_found(
                "Offer letter not found",
                json!({ "intern_id": intern_id }),
            )
        };

        if !is_valid_intern_id(intern_id) {
            return Err(not_found());
        }

        match self.artifacts.load(intern_id).await {
            Ok(Some(artifact)) => Ok(artifact),
            Ok(None) => Err(not_found()),
            Err(e) => {
                tracing::error!(intern_id, error = %e, "Failed to read stored offer letter");
                Err(AppError::internal(
                    "Failed to read offer letter",
                    json!({ "intern_id": intern_id }),
                ))
            }
        }
    }
}

/// Subject line of the offer email.
pub fn offer_subject(intern_name: &str) -> String {
    format!("🎉 Your Internship Offer - {intern_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockRecordRepository;
    use crate::infrastructure::artifacts::MockArtifactStore;
    use crate::infrastructure::conversion::MockDocumentConverter;
    use crate::infrastructure::document::MockDocumentRenderer;
    use crate::infrastructure::mail::MockMailer;
    use chrono::NaiveDate;
    use mockall::Sequence;
    use std::sync::Mutex;

    const PDF: &[u8] = b"%PDF-1.4 offer";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> OfferForm {
        OfferForm {
            intern_name: "  asha rao ".to_string(),
            domain: "web development".to_string(),
            email: "Asha@Example.com".to_string(),
            start_date: date(2025, 6, 1),
            end_date: date(2025, 8, 31),
            offer_date: date(2025, 5, 20),
        }
    }

    fn settings() -> OfferSettings {
        OfferSettings {
            company_name: "SkyHighes Technologies".to_string(),
            conversion_folder: "offers".to_string(),
        }
    }

    struct Mocks {
        records: MockRecordRepository,
        renderer: MockDocumentRenderer,
        converter: MockDocumentConverter,
        mailer: MockMailer,
        artifacts: MockArtifactStore,
    }

    impl Mocks {
        fn new() -> Self {
            let mut records = MockRecordRepository::new();
            records.expect_backend_name().return_const("csv");
            Self {
                records,
                renderer: MockDocumentRenderer::new(),
                converter: MockDocumentConverter::new(),
                mailer: MockMailer::new(),
                artifacts: MockArtifactStore::new(),
            }
        }

        /// Every collaborator succeeds.
        fn happy() -> Self {
            let mut mocks = Self::new();
            mocks.records.expect_append().returning(|_| Ok(()));
            mocks
                .renderer
                .expect_render()
                .returning(|_| Ok(b"docx".to_vec()));
            mocks
                .renderer
                .expect_embed_image()
                .returning(|_, _, _| Ok(b"docx+qr".to_vec()));
            mocks.converter.expect_upload().returning(|_, _| Ok(()));
            mocks.converter.expect_save_as().returning(|_, _, _| Ok(()));
            mocks
                .converter
                .expect_download()
                .returning(|_| Ok(PDF.to_vec()));
            mocks.mailer.expect_send().returning(|_| Ok(()));
            mocks.artifacts.expect_save().returning(|_, _, _| Ok(()));
            mocks
        }

        fn service(self) -> OfferService {
            OfferService::new(
                Arc::new(self.records),
                Arc::new(self.renderer),
                Arc::new(self.converter),
                Arc::new(self.mailer),
                Arc::new(self.artifacts),
                settings(),
            )
        }
    }

    #[tokio::test]
    async fn test_submit_offer_success() {
        let receipt = Mocks::happy().service().submit_offer(form()).await.unwrap();

        assert_eq!(receipt.record.intern_name(), "Asha Rao");
        assert_eq!(receipt.record.domain(), "Web Development");
        assert_eq!(receipt.record.email(), "asha@example.com");
        assert_eq!(receipt.record.intern_id().len(), 9);
        assert_eq!(receipt.pdf_file_name, "Offer_Asha Rao.pdf");
        assert!(receipt.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_collaborators_called_in_order() {
        let mut mocks = Mocks::new();
        let mut seq = Sequence::new();

        mocks
            .records
            .expect_append()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .renderer
            .expect_render()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(b"docx".to_vec()));
        mocks
            .renderer
            .expect_embed_image()
            .withf(|docx, _, anchor| docx == b"docx" && *anchor == ImageAnchor::OFFER_QR)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(b"docx+qr".to_vec()));
        mocks
            .converter
            .expect_upload()
            .withf(|path, bytes| {
                path.starts_with("offers/")
                    && path.ends_with("/Offer_Asha Rao.docx")
                    && bytes == b"docx+qr"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mocks
            .converter
            .expect_save_as()
            .withf(|source, target, format| {
                source.ends_with("/Offer_Asha Rao.docx")
                    && target.ends_with("/Offer_Asha Rao.pdf")
                    && *format == TargetFormat::Pdf
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        mocks
            .converter
            .expect_download()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(PDF.to_vec()));
        mocks
            .mailer
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .artifacts
            .expect_save()
            .withf(|_, name, bytes| name == "Offer_Asha Rao.pdf" && bytes == PDF)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let result = mocks.service().submit_offer(form()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_record_passed_to_store_matches_receipt() {
        let stored = Arc::new(Mutex::new(None));
        let mut mocks = Mocks::happy();
        mocks.records.checkpoint();
        mocks.records.expect_backend_name().return_const("csv");
        let sink = stored.clone();
        mocks.records.expect_append().times(1).returning(move |record| {
            *sink.lock().unwrap() = Some(record.clone());
            Ok(())
        });

        let receipt = mocks.service().submit_offer(form()).await.unwrap();

        assert_eq!(stored.lock().unwrap().as_ref(), Some(&receipt.record));
    }

    #[tokio::test]
    async fn test_email_contents() {
        let mut mocks = Mocks::happy();
        mocks.mailer.checkpoint();
        mocks
            .mailer
            .expect_send()
            .withf(|mail| {
                let attachment = mail.attachment.as_ref().unwrap();
                mail.to == "asha@example.com"
                    && mail.subject == "🎉 Your Internship Offer - Asha Rao"
                    && mail.html_body.contains("Dear Asha Rao,")
                    && mail.html_body.contains("SkyHighes Technologies")
                    && mail.html_body.contains("Sunday, 01 June 2025")
                    && attachment.file_name == "Offer_Asha Rao.pdf"
                    && attachment.content_type == "application/pdf"
                    && attachment.bytes == PDF
            })
            .times(1)
            .returning(|_| Ok(()));

        assert!(mocks.service().submit_offer(form()).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_has_no_side_effects() {
        let mut invalid = form();
        invalid.email = "not-an-email".to_string();

        // No expectations: any collaborator call panics.
        let result = Mocks::new().service().submit_offer(invalid).await;

        assert!(matches!(
            result,
            Err(SubmissionError::Rejected(Rejection::InvalidEmail))
        ));
    }

    #[tokio::test]
    async fn test_validation_order_missing_fields_first() {
        let mut invalid = form();
        invalid.intern_name = "   ".to_string();
        invalid.email = "broken".to_string();
        invalid.end_date = date(2025, 1, 1);

        let result = Mocks::new().service().submit_offer(invalid).await;

        assert!(matches!(
            result,
            Err(SubmissionError::Rejected(Rejection::MissingFields))
        ));
    }

    #[tokio::test]
    async fn test_end_before_start_rejected() {
        let mut invalid = form();
        invalid.end_date = date(2025, 5, 31);

        let result = Mocks::new().service().submit_offer(invalid).await;

        assert!(matches!(
            result,
            Err(SubmissionError::Rejected(Rejection::EndBeforeStart))
        ));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_not_fatal() {
        let mut mocks = Mocks::happy();
        mocks.records.checkpoint();
        mocks.records.expect_backend_name().return_const("csv");
        mocks.records.expect_append().times(1).returning(|_| {
            Err(AppError::internal("Record store error", json!({})))
        });
        mocks.mailer.checkpoint();
        mocks.mailer.expect_send().times(1).returning(|_| Ok(()));

        let receipt = mocks.service().submit_offer(form()).await.unwrap();

        assert!(matches!(
            receipt.warnings.as_slice(),
            [PipelineWarning::PersistenceSkipped { .. }]
        ));
    }

    #[tokio::test]
    async fn test_qr_failure_is_not_fatal() {
        let mut mocks = Mocks::happy();
        mocks.renderer.checkpoint();
        mocks
            .renderer
            .expect_render()
            .returning(|_| Ok(b"docx".to_vec()));
        mocks
            .renderer
            .expect_embed_image()
            .returning(|_, _, _| Err(DocumentError::AnchorNotFound("table 0".to_string())));
        mocks.converter.checkpoint();
        mocks
            .converter
            .expect_upload()
            .withf(|_, bytes| bytes == b"docx")
            .times(1)
            .returning(|_, _| Ok(()));
        mocks.converter.expect_save_as().returning(|_, _, _| Ok(()));
        mocks
            .converter
            .expect_download()
            .returning(|_| Ok(PDF.to_vec()));
        mocks.mailer.checkpoint();
        mocks.mailer.expect_send().times(1).returning(|_| Ok(()));

        let receipt = mocks.service().submit_offer(form()).await.unwrap();

        assert!(matches!(
            receipt.warnings.as_slice(),
            [PipelineWarning::QrSkipped { .. }]
        ));
    }

    #[tokio::test]
    async fn test_rendering_failure_is_fatal() {
        let mut mocks = Mocks::new();
        mocks.records.expect_append().times(1).returning(|_| Ok(()));
        mocks
            .renderer
            .expect_render()
            .returning(|_| Err(DocumentError::MissingPart("word/document.xml")));

        let result = mocks.service().submit_offer(form()).await;

        assert!(matches!(result, Err(SubmissionError::Rendering(_))));
    }

    #[tokio::test]
    async fn test_conversion_failure_sends_no_email() {
        let mut mocks = Mocks::new();
        mocks.records.expect_append().times(1).returning(|_| Ok(()));
        mocks
            .renderer
            .expect_render()
            .returning(|_| Ok(b"docx".to_vec()));
        mocks
            .renderer
            .expect_embed_image()
            .returning(|_, _, _| Ok(b"docx+qr".to_vec()));
        mocks.converter.expect_upload().returning(|_, _| Ok(()));
        mocks.converter.expect_save_as().returning(|_, _, _| {
            Err(ConversionError::Api {
                step: "save_as",
                status: 500,
                body: "boom".to_string(),
            })
        });
        mocks.mailer.expect_send().never();
        mocks.artifacts.expect_save().never();

        let result = mocks.service().submit_offer(form()).await;

        assert!(matches!(result, Err(SubmissionError::Conversion(_))));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_fatal_and_not_archived() {
        let mut mocks = Mocks::happy();
        mocks.mailer.checkpoint();
        mocks
            .mailer
            .expect_send()
            .returning(|_| Err(MailError::Transport("connection refused".to_string())));
        mocks.artifacts.checkpoint();
        mocks.artifacts.expect_save().never();

        let result = mocks.service().submit_offer(form()).await;

        assert!(matches!(result, Err(SubmissionError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_two_submissions_get_distinct_ids() {
        let service = Mocks::happy().service();

        let first = service.submit_offer(form()).await.unwrap();
        let second = service.submit_offer(form()).await.unwrap();

        assert_ne!(first.record.intern_id(), second.record.intern_id());
    }

    #[tokio::test]
    async fn test_remote_paths_scoped_by_intern_id() {
        let mut mocks = Mocks::happy();
        let paths = Arc::new(Mutex::new(Vec::new()));
        let sink = paths.clone();
        mocks.converter.checkpoint();
        mocks.converter.expect_upload().returning(move |path, _| {
            sink.lock().unwrap().push(path.to_string());
            Ok(())
        });
        mocks.converter.expect_save_as().returning(|_, _, _| Ok(()));
        mocks
            .converter
            .expect_download()
            .returning(|_| Ok(PDF.to_vec()));

        let receipt = mocks.service().submit_offer(form()).await.unwrap();

        let expected = format!("offers/{}/Offer_Asha Rao.docx", receipt.record.intern_id());
        assert_eq!(paths.lock().unwrap().as_slice(), &[expected]);
    }

    #[test]
    fn test_submission_error_into_app_error() {
        let rejected: AppError = SubmissionError::Rejected(Rejection::InvalidEmail).into();
        assert_eq!(rejected.to_string(), "Invalid email.");
        assert!(matches!(rejected, AppError::Validation { .. }));

        let failed: AppError =
            SubmissionError::Delivery(MailError::Transport("x".to_string())).into();
        assert_eq!(failed.to_string(), PROCESSING_FAILED_MESSAGE);
        assert!(matches!(failed, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_offer_pdf_rejects_malformed_id() {
        let mut mocks = Mocks::new();
        mocks.artifacts.expect_load().never();

        let result = mocks.service().offer_pdf("../etc").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_offer_pdf_found() {
        let mut mocks = Mocks::new();
        mocks
            .artifacts
            .expect_load()
            .withf(|intern_id| intern_id == "ABC123XYZ")
            .returning(|_| {
                Ok(Some(StoredArtifact {
                    file_name: "Offer_Asha Rao.pdf".to_string(),
                    bytes: PDF.to_vec(),
                }))
            });

        let artifact = mocks.service().offer_pdf("ABC123XYZ").await.unwrap();

        assert_eq!(artifact.file_name, "Offer_Asha Rao.pdf");
    }

    #[tokio::test]
    async fn test_offer_pdf_missing() {
        let mut mocks = Mocks::new();
        mocks.artifacts.expect_load().returning(|_| Ok(None));

        let result = mocks.service().offer_pdf("ABC123XYZ").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
