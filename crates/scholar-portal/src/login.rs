use std::sync::Arc;

use tracing::{info, warn};

use crate::api::PortalApi;
use crate::domain::Session;
use crate::forms::{LoginForm, ValidationReport};
use crate::session::SessionStore;
use crate::status::{self, StatusSink, StatusTone};
use crate::transport::HttpTransport;

pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("login form is incomplete: {0}")]
    Invalid(ValidationReport),
    #[error("{message}")]
    Failed { message: String },
}

/// Sign in and remember the session for later dashboard visits.
pub struct LoginFlow<T, S: ?Sized, St: ?Sized> {
    api: PortalApi<T>,
    sink: Arc<S>,
    store: Arc<St>,
}

impl<T, S, St> LoginFlow<T, S, St>
where
    T: HttpTransport,
    S: StatusSink + ?Sized,
    St: SessionStore + ?Sized,
{
    pub fn new(api: PortalApi<T>, sink: Arc<S>, store: Arc<St>) -> Self {
        Self { api, sink, store }
    }

    pub async fn submit(&self, form: LoginForm) -> Result<Session, LoginError> {
        status::clear_form(self.sink.as_ref(), &LoginForm::FIELDS);

        let report = form.validate();
        if !report.is_valid() {
            status::show_field_errors(self.sink.as_ref(), &report);
            return Err(LoginError::Invalid(report));
        }

        self.sink.submit_enabled(false);
        self.sink.status("Signing in…", StatusTone::Success);

        match self.api.login(form.email.trim(), &form.password).await {
            Ok(session) => {
                // A store failure leaves the user signed in for this run only.
                if let Err(err) = self.store.save(&session) {
                    warn!(error = %err, "unable to persist session");
                }
                info!("signed in");
                self.sink
                    .status("Redirecting to dashboard…", StatusTone::Success);
                Ok(session)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "sign-in failed");
                self.sink.status(&message, StatusTone::Error);
                self.sink.submit_enabled(true);
                Err(LoginError::Failed { message })
            }
        }
    }
}
