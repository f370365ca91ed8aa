use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::PortalApi;
use crate::domain::ApplicantId;
use crate::session::{SessionError, SessionStore};
use crate::status::{StatusSink, StatusTone};
use crate::transport::HttpTransport;

pub const LOGIN_REDIRECT: &str = "/login?next=/dashboard";
const PLACEHOLDER: &str = "—";

/// One applicant as listed by `GET /api/applicants/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantListEntry {
    pub id: ApplicantId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub latest_education: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
}

/// Display-ready row of the applicants table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub latest_education: String,
    pub status: String,
    pub status_class: String,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantTable {
    /// Managers see every applicant's owner; clients never get `owner_email`.
    pub show_owner: bool,
    pub rows: Vec<ApplicantRow>,
}

impl ApplicantTable {
    pub fn from_entries(entries: &[ApplicantListEntry]) -> Self {
        let show_owner = entries.iter().any(|entry| entry.owner_email.is_some());
        let rows = entries
            .iter()
            .map(|entry| ApplicantRow {
                id: entry.id.to_string(),
                first_name: entry.first_name.clone(),
                last_name: entry.last_name.clone(),
                latest_education: non_empty_or_placeholder(entry.latest_education.as_deref()),
                status: entry.status.clone(),
                status_class: format!("status-{}", entry.status.to_lowercase()),
                created: format_date(entry.created_at.as_deref()),
                owner: show_owner
                    .then(|| non_empty_or_placeholder(entry.owner_email.as_deref())),
            })
            .collect();

        Self { show_owner, rows }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec![
            "ID",
            "First name",
            "Last name",
            "Latest education",
            "Status",
            "Created",
        ];
        if self.show_owner {
            headers.push("Owner");
        }
        headers
    }
}

fn non_empty_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Render a timestamp as a calendar date, keeping unparseable input verbatim.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return String::new();
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(&Local).format("%Y-%m-%d").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    /// No stored session; the user must sign in first.
    SignInRequired { redirect_to: &'static str },
    /// The stored session was rejected and has been cleared.
    SessionExpired { redirect_to: &'static str },
    Empty,
    Listed(ApplicantTable),
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{message}")]
    Failed { message: String },
}

/// Lists the signed-in user's applicants.
pub struct DashboardFlow<T, S: ?Sized, St: ?Sized> {
    api: PortalApi<T>,
    sink: Arc<S>,
    store: Arc<St>,
}

impl<T, S, St> DashboardFlow<T, S, St>
where
    T: HttpTransport,
    S: StatusSink + ?Sized,
    St: SessionStore + ?Sized,
{
    pub fn new(api: PortalApi<T>, sink: Arc<S>, store: Arc<St>) -> Self {
        Self { api, sink, store }
    }

    pub async fn load(&self) -> Result<DashboardOutcome, DashboardError> {
        let Some(session) = self.store.load()? else {
            info!("no stored session, sign-in required");
            return Ok(DashboardOutcome::SignInRequired {
                redirect_to: LOGIN_REDIRECT,
            });
        };

        self.sink.status("Loading applicants…", StatusTone::Success);

        let entries = match self.api.list_applicants(&session).await {
            Ok(entries) => entries,
            Err(err) if err.is_unauthorized() => {
                warn!("stored session rejected, clearing it");
                self.store.clear()?;
                return Ok(DashboardOutcome::SessionExpired {
                    redirect_to: LOGIN_REDIRECT,
                });
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "unable to load applicants");
                self.sink.status(&message, StatusTone::Error);
                return Err(DashboardError::Failed { message });
            }
        };

        self.sink.status("", StatusTone::Success);
        info!(count = entries.len(), "applicants loaded");

        if entries.is_empty() {
            Ok(DashboardOutcome::Empty)
        } else {
            Ok(DashboardOutcome::Listed(ApplicantTable::from_entries(
                &entries,
            )))
        }
    }

    pub fn logout(&self) -> Result<(), DashboardError> {
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }
}
