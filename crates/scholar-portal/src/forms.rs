//! Form models and their pre-flight field validation.
//!
//! Validation is pure: it reads field values and produces a [`ValidationReport`].
//! Nothing here touches the network.

use std::fmt;

use crate::domain::{Credentials, DocumentFile, NewApplicant};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Per-field messages in form order. Empty means the form passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<(&'static str, &'static str)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a message for a field, replacing any earlier one.
    fn set(&mut self, field: &'static str, message: &'static str) {
        match self.errors.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = message,
            None => self.errors.push((field, message)),
        }
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| *message)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.errors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

impl std::error::Error for ValidationReport {}

/// Raw registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub confirm_email: String,
    pub password: String,
    pub latest_education: String,
    pub transcript: Option<DocumentFile>,
    pub degree: Option<DocumentFile>,
}

/// A registration form that passed validation, split by the call that consumes each part.
#[derive(Debug, Clone)]
pub struct RegistrationSubmission {
    pub credentials: Credentials,
    pub applicant: NewApplicant,
    pub transcript: DocumentFile,
    pub degree: DocumentFile,
}

impl RegistrationForm {
    pub const FIELDS: [&'static str; 8] = [
        "first_name",
        "surname",
        "email",
        "confirm_email",
        "password",
        "latest_education",
        "transcript",
        "degree",
    ];

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let email = self.email.trim();
        let confirm_email = self.confirm_email.trim();
        let password = self.password.trim();

        if self.first_name.trim().is_empty() {
            report.set("first_name", "First name is required.");
        }
        if self.surname.trim().is_empty() {
            report.set("surname", "Surname is required.");
        }
        if email.is_empty() {
            report.set("email", "Email is required.");
        }
        if confirm_email.is_empty() {
            report.set("confirm_email", "Please confirm your email.");
        }
        if email != confirm_email {
            report.set("confirm_email", "Emails do not match.");
        }
        if password.is_empty() {
            report.set("password", "Password is required.");
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            report.set("password", "Password must be at least 8 characters.");
        }
        if self.latest_education.trim().is_empty() {
            report.set("latest_education", "Latest education is required.");
        }
        if self.transcript.is_none() {
            report.set("transcript", "Please upload your transcript.");
        }
        if self.degree.is_none() {
            report.set("degree", "Please upload your latest degree.");
        }

        report
    }

    /// Validate and convert into the typed inputs of the registration pipeline.
    pub fn into_submission(self) -> Result<RegistrationSubmission, ValidationReport> {
        let report = self.validate();
        let (Some(transcript), Some(degree)) = (self.transcript, self.degree) else {
            return Err(report);
        };
        if !report.is_valid() {
            return Err(report);
        }

        let first_name = self.first_name.trim().to_string();
        let surname = self.surname.trim().to_string();

        Ok(RegistrationSubmission {
            credentials: Credentials {
                email: self.email.trim().to_string(),
                full_name: format!("{first_name} {surname}"),
                password: self.password.trim().to_string(),
            },
            applicant: NewApplicant {
                first_name,
                last_name: surname,
                latest_education: self.latest_education.trim().to_string(),
            },
            transcript,
            degree,
        })
    }
}

/// Sign-in form. The password is taken verbatim.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    pub const FIELDS: [&'static str; 2] = ["email", "password"];

    /// Reports only the first missing field.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.email.trim().is_empty() {
            report.set("email", "Email is required.");
        } else if self.password.is_empty() {
            report.set("password", "Password is required.");
        }
        report
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub const FIELDS: [&'static str; 3] = ["contact_name", "contact_email", "contact_message"];

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.name.trim().is_empty() {
            report.set("contact_name", "Name is required.");
        }
        if self.email.trim().is_empty() {
            report.set("contact_email", "Email is required.");
        }
        if self.message.trim().is_empty() {
            report.set("contact_message", "Message is required.");
        }
        report
    }
}
