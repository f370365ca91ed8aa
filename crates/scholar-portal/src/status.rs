use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Presentation style of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Plain,
    Success,
    Error,
}

/// Everything a flow shows the user: one status line, per-field messages and
/// whether the submit control accepts input.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str, tone: StatusTone);
    /// `None` clears the field's message and invalid marker.
    fn field_error(&self, field: &str, message: Option<&str>);
    fn submit_enabled(&self, enabled: bool);
}

impl<S> StatusSink for Arc<S>
where
    S: StatusSink + ?Sized,
{
    fn status(&self, message: &str, tone: StatusTone) {
        (**self).status(message, tone)
    }

    fn field_error(&self, field: &str, message: Option<&str>) {
        (**self).field_error(field, message)
    }

    fn submit_enabled(&self, enabled: bool) {
        (**self).submit_enabled(enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Status { message: String, tone: StatusTone },
    FieldError { field: String, message: Option<String> },
    SubmitEnabled(bool),
}

/// Records every event; used by tests and by callers that render after the fact.
#[derive(Debug, Default, Clone)]
pub struct MemoryStatusSink {
    events: Arc<Mutex<Vec<StatusEvent>>>,
}

impl MemoryStatusSink {
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().expect("status mutex poisoned").clone()
    }

    /// Status lines in emission order.
    pub fn statuses(&self) -> Vec<(String, StatusTone)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StatusEvent::Status { message, tone } => Some((message, tone)),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<(String, StatusTone)> {
        self.statuses().pop()
    }

    pub fn submit_state(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|event| match event {
            StatusEvent::SubmitEnabled(enabled) => Some(enabled),
            _ => None,
        })
    }

    /// Fields currently showing a message.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let mut current = BTreeMap::new();
        for event in self.events() {
            if let StatusEvent::FieldError { field, message } = event {
                match message {
                    Some(message) => {
                        current.insert(field, message);
                    }
                    None => {
                        current.remove(&field);
                    }
                }
            }
        }
        current
    }

    fn push(&self, event: StatusEvent) {
        self.events
            .lock()
            .expect("status mutex poisoned")
            .push(event);
    }
}

impl StatusSink for MemoryStatusSink {
    fn status(&self, message: &str, tone: StatusTone) {
        self.push(StatusEvent::Status {
            message: message.to_string(),
            tone,
        });
    }

    fn field_error(&self, field: &str, message: Option<&str>) {
        self.push(StatusEvent::FieldError {
            field: field.to_string(),
            message: message.map(str::to_string),
        });
    }

    fn submit_enabled(&self, enabled: bool) {
        self.push(StatusEvent::SubmitEnabled(enabled));
    }
}

/// Reset every listed field and the status line before a submission.
pub(crate) fn clear_form<S>(sink: &S, fields: &[&str])
where
    S: StatusSink + ?Sized,
{
    for field in fields {
        sink.field_error(field, None);
    }
    sink.status("", StatusTone::Plain);
}

/// Show validation messages on their fields.
pub(crate) fn show_field_errors<S>(sink: &S, report: &crate::forms::ValidationReport)
where
    S: StatusSink + ?Sized,
{
    for (field, message) in report.errors() {
        sink.field_error(field, Some(message));
    }
}
