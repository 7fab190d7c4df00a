//! Submission lifecycle: stages, warnings and the receipt of a finished run.
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> Recording -> Rendering -> Converting -> Delivering -> Succeeded
//!                                    Rendering | Converting | Delivering  -> Failed
//! ```
//!
//! `Failed` never rolls back `Recording`.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::OfferRecord;

/// Stage of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Idle,
    Validating,
    Rejected,
    Recording,
    Rendering,
    Converting,
    Delivering,
    Succeeded,
    Failed,
}

impl SubmissionStage {
    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_advance_to(self, next: SubmissionStage) -> bool {
        use SubmissionStage::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Rejected)
                | (Validating, Recording)
                | (Recording, Rendering)
                | (Rendering, Converting)
                | (Converting, Delivering)
                | (Delivering, Succeeded)
                | (Rendering, Failed)
                | (Converting, Failed)
                | (Delivering, Failed)
        )
    }

    /// Terminal stages accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SubmissionStage::Rejected | SubmissionStage::Succeeded | SubmissionStage::Failed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStage::Idle => "idle",
            SubmissionStage::Validating => "validating",
            SubmissionStage::Rejected => "rejected",
            SubmissionStage::Recording => "recording",
            SubmissionStage::Rendering => "rendering",
            SubmissionStage::Converting => "converting",
            SubmissionStage::Delivering => "delivering",
            SubmissionStage::Succeeded => "succeeded",
            SubmissionStage::Failed => "failed",
        }
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current stage of one submission and logs each transition.
#[derive(Debug)]
pub struct StageTracker {
    stage: SubmissionStage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            stage: SubmissionStage::Idle,
        }
    }

    pub fn current(&self) -> SubmissionStage {
        self.stage
    }

    /// Moves to `next`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds on an illegal transition.
    pub fn advance(&mut self, next: SubmissionStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal submission transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(from = %self.stage, to = %next, "Submission stage changed");
        self.stage = next;
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-fatal condition raised while processing an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// The record could not be written to the store.
    PersistenceSkipped { reason: String },
    /// The QR code could not be generated or embedded into the letter.
    QrSkipped { reason: String },
}

impl PipelineWarning {
    /// Short notice suitable for display next to a success message.
    pub fn notice(&self) -> &'static str {
        match self {
            PipelineWarning::PersistenceSkipped { .. } => "The record could not be logged.",
            PipelineWarning::QrSkipped { .. } => "QR insertion failed.",
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct OfferReceipt {
    pub record: OfferRecord,
    /// File name of the delivered PDF, also used for direct retrieval.
    pub pdf_file_name: String,
    pub warnings: Vec<PipelineWarning>,
}
