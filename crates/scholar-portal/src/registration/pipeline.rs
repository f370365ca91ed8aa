use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::upload::DocumentUpload;
use super::{RegistrationError, RegistrationOutcome, RegistrationStep, COMPLETE_MESSAGE};
use crate::api::{ApiError, PortalApi};
use crate::domain::DocumentKind;
use crate::forms::{RegistrationForm, RegistrationSubmission};
use crate::status::{self, StatusSink, StatusTone};
use crate::transport::HttpTransport;

/// Drives a registration run against the portal and reports progress to a sink.
///
/// At most one run is in flight per orchestrator; a second submission while one
/// is running is rejected without touching the network.
pub struct RegistrationOrchestrator<T, S: ?Sized> {
    api: PortalApi<T>,
    sink: Arc<S>,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag when a run ends, including when its future is dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<T, S> RegistrationOrchestrator<T, S>
where
    T: HttpTransport,
    S: StatusSink + ?Sized,
{
    pub fn new(api: PortalApi<T>, sink: Arc<S>) -> Self {
        Self {
            api,
            sink,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Handle a form submission: clear, validate, run, and report the result.
    ///
    /// The submit control is disabled for the run and re-enabled on every exit
    /// after validation, so a failed run can be retried from scratch.
    pub async fn submit(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("registration submitted while another run is in flight");
            RegistrationError::InFlight
        })?;

        status::clear_form(self.sink.as_ref(), &RegistrationForm::FIELDS);
        let submission = form.into_submission().map_err(|report| {
            status::show_field_errors(self.sink.as_ref(), &report);
            RegistrationError::Invalid(report)
        })?;

        self.sink.submit_enabled(false);
        let result = self.run(submission).await;

        match &result {
            Ok(outcome) => {
                info!(applicant_id = %outcome.applicant.id, "registration complete");
                self.sink.status(COMPLETE_MESSAGE, StatusTone::Success);
            }
            Err(err) => {
                warn!(step = ?err.step(), error = %err, "registration aborted");
                self.sink.status(&err.to_string(), StatusTone::Error);
            }
        }
        self.sink.submit_enabled(true);

        result
    }

    fn begin(&self, step: RegistrationStep) {
        info!(%step, "registration step started");
        self.sink.status(step.progress_message(), StatusTone::Success);
    }

    async fn run(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let RegistrationSubmission {
            credentials,
            applicant,
            transcript,
            degree,
        } = submission;

        self.begin(RegistrationStep::CreateAccount);
        self.api
            .register(&credentials)
            .await
            .map_err(step_failure(RegistrationStep::CreateAccount))?;

        self.begin(RegistrationStep::Authenticate);
        let session = self
            .api
            .login(&credentials.email, &credentials.password)
            .await
            .map_err(step_failure(RegistrationStep::Authenticate))?;

        self.begin(RegistrationStep::CreateApplicant);
        let record = self
            .api
            .create_applicant(&session, &applicant)
            .await
            .map_err(step_failure(RegistrationStep::CreateApplicant))?;
        info!(applicant_id = %record.id, bundle_id = %record.bundle_id, "applicant created");

        let upload = DocumentUpload::new(&self.api, &session, &record.bundle_id);

        self.begin(RegistrationStep::UploadDocument(DocumentKind::Transcript));
        let transcript = upload.upload(DocumentKind::Transcript, &transcript).await?;

        self.begin(RegistrationStep::UploadDocument(DocumentKind::Degree));
        let degree = upload.upload(DocumentKind::Degree, &degree).await?;

        Ok(RegistrationOutcome {
            applicant: record,
            documents: vec![transcript, degree],
        })
    }
}

fn step_failure(step: RegistrationStep) -> impl Fn(ApiError) -> RegistrationError {
    move |err| RegistrationError::at(step, err.to_string())
}
