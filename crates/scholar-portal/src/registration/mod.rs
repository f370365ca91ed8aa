//! Registration with document upload.
//!
//! A run is a strictly ordered pipeline: create account, log in, create the
//! applicant profile, then upload the transcript and the degree through the
//! two-phase presigned protocol. Each step consumes the previous step's typed
//! result, the first failure ends the run, and nothing already created is
//! rolled back.

pub mod pipeline;
pub mod upload;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::domain::{ApplicantRecord, ConfirmedDocument, DocumentKind};
use crate::forms::ValidationReport;

pub use pipeline::RegistrationOrchestrator;
pub use upload::DocumentUpload;

pub const COMPLETE_MESSAGE: &str =
    "Registration complete. You can now log in on the API docs or your client.";

/// The remote steps of a registration run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    CreateAccount,
    Authenticate,
    CreateApplicant,
    UploadDocument(DocumentKind),
}

impl RegistrationStep {
    /// Status line shown while the step runs.
    pub fn progress_message(&self) -> &'static str {
        match self {
            RegistrationStep::CreateAccount => "Creating account…",
            RegistrationStep::Authenticate => "Logging in…",
            RegistrationStep::CreateApplicant => "Creating your profile…",
            RegistrationStep::UploadDocument(DocumentKind::Transcript) => "Uploading transcript…",
            RegistrationStep::UploadDocument(DocumentKind::Degree) => "Uploading degree…",
        }
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationStep::CreateAccount => f.write_str("create_account"),
            RegistrationStep::Authenticate => f.write_str("authenticate"),
            RegistrationStep::CreateApplicant => f.write_str("create_applicant"),
            RegistrationStep::UploadDocument(kind) => write!(f, "upload_{kind}"),
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub applicant: ApplicantRecord,
    pub documents: Vec<ConfirmedDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration form is incomplete: {0}")]
    Invalid(ValidationReport),
    #[error("A registration is already in progress.")]
    InFlight,
    #[error("{message}")]
    Step {
        step: RegistrationStep,
        message: String,
    },
}

impl RegistrationError {
    pub(crate) fn at(step: RegistrationStep, message: impl Into<String>) -> Self {
        RegistrationError::Step {
            step,
            message: message.into(),
        }
    }

    /// The step that failed, when the run got as far as the network.
    pub fn step(&self) -> Option<RegistrationStep> {
        match self {
            RegistrationError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
