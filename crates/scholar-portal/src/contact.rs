use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::forms::{ContactForm, ValidationReport};
use crate::status::{self, StatusSink, StatusTone};

pub const CONTACT_ACKNOWLEDGEMENT: &str = "Thank you for your message. For immediate assistance, please email support@scholarvalley.com or call +1 859 916 1786.";

/// Acknowledges contact messages locally. Messages are not sent anywhere yet;
/// the acknowledgement points people at the support address instead.
pub struct ContactFlow<S: ?Sized> {
    sink: Arc<S>,
    acknowledgement_delay: Duration,
}

impl<S> ContactFlow<S>
where
    S: StatusSink + ?Sized,
{
    pub fn new(sink: Arc<S>, acknowledgement_delay: Duration) -> Self {
        Self {
            sink,
            acknowledgement_delay,
        }
    }

    /// On success the form is reset to its empty state.
    pub async fn submit(&self, form: &mut ContactForm) -> Result<(), ValidationReport> {
        status::clear_form(self.sink.as_ref(), &ContactForm::FIELDS);

        let report = form.validate();
        if !report.is_valid() {
            status::show_field_errors(self.sink.as_ref(), &report);
            return Err(report);
        }

        self.sink.submit_enabled(false);
        self.sink.status("Sending message…", StatusTone::Success);

        tokio::time::sleep(self.acknowledgement_delay).await;

        info!(email = %form.email.trim(), "contact message acknowledged");
        self.sink
            .status(CONTACT_ACKNOWLEDGEMENT, StatusTone::Success);
        *form = ContactForm::default();
        self.sink.submit_enabled(true);
        Ok(())
    }
}
