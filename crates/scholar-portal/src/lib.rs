//! Client flows for the ScholarValley applicant portal.
//!
//! The centerpiece is [`registration::RegistrationOrchestrator`], which creates an
//! account, signs in, creates the applicant profile and uploads the transcript and
//! degree through presigned URLs. Login, dashboard and contact flows share the same
//! transport seam, response normalization and status reporting.

pub mod api;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod forms;
pub mod login;
pub mod registration;
pub mod response;
pub mod session;
pub mod status;
pub mod telemetry;
pub mod transport;
