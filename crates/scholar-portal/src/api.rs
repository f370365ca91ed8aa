use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::dashboard::ApplicantListEntry;
use crate::domain::{
    AccessToken, ApplicantRecord, BundleId, Credentials, DocumentFile, DocumentId, DocumentKind,
    NewApplicant, Session, UploadTicket,
};
use crate::response::{self, ResponseError};
use crate::transport::{ApiRequest, HttpTransport, RawResponse, TransportError};

pub const UNREACHABLE: &str = "Unable to reach the server.";

/// Failure of a single portal call, already normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Unable to reach the server.")]
    Unreachable(#[source] TransportError),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unreachable(_) => None,
            ApiError::Response(err) => Some(err.status()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Typed calls against the portal API, one method per endpoint.
#[derive(Debug, Clone)]
pub struct PortalApi<T> {
    base_url: String,
    transport: T,
}

impl<T> PortalApi<T>
where
    T: HttpTransport,
{
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn exchange(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.transport
            .send(request)
            .await
            .map_err(ApiError::Unreachable)
    }

    /// `POST /api/auth/register`
    pub async fn register(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        let request = ApiRequest::post(self.url("/api/auth/register")).json(json!({
            "email": credentials.email,
            "full_name": credentials.full_name,
            "password": credentials.password,
        }));
        let response = self.exchange(request).await?;
        Ok(response::parse_json(&response)?)
    }

    /// `POST /api/auth/login` with form-encoded credentials.
    ///
    /// A success body without a usable `access_token` is a contract violation.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = ApiRequest::post(self.url("/api/auth/login"))
            .form(&[("username", email), ("password", password)]);
        let response = self.exchange(request).await?;
        let token: TokenResponse = response::decode(&response)?;

        match token.access_token {
            Some(token) if !token.is_empty() => Ok(Session::new(AccessToken::new(token))),
            _ => Err(ResponseError::Malformed {
                status: response.status,
            }
            .into()),
        }
    }

    /// `POST /api/applicants/`
    pub async fn create_applicant(
        &self,
        session: &Session,
        applicant: &NewApplicant,
    ) -> Result<ApplicantRecord, ApiError> {
        let request = ApiRequest::post(self.url("/api/applicants/"))
            .bearer(session.access_token.as_str())
            .json(json!({
                "first_name": applicant.first_name,
                "last_name": applicant.last_name,
                "latest_education": applicant.latest_education,
            }));
        let response = self.exchange(request).await?;
        Ok(response::decode(&response)?)
    }

    /// `GET /api/applicants/`
    pub async fn list_applicants(
        &self,
        session: &Session,
    ) -> Result<Vec<ApplicantListEntry>, ApiError> {
        let request =
            ApiRequest::get(self.url("/api/applicants/")).bearer(session.access_token.as_str());
        let response = self.exchange(request).await?;
        if response.status == 401 {
            return Err(ResponseError::Rejected {
                status: 401,
                message: "Session expired".to_string(),
            }
            .into());
        }
        Ok(response::decode(&response)?)
    }

    /// `POST /api/bundles/{bundle_id}/documents/initiate`
    pub async fn initiate_upload(
        &self,
        session: &Session,
        bundle_id: &BundleId,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadTicket, ApiError> {
        let request = ApiRequest::post(
            self.url(&format!("/api/bundles/{bundle_id}/documents/initiate")),
        )
        .query("filename", file_name)
        .query("content_type", content_type)
        .bearer(session.access_token.as_str());
        let response = self.exchange(request).await?;
        Ok(response::decode(&response)?)
    }

    /// `PUT {upload_url}` straight to object storage; no portal authorization.
    pub async fn transfer(
        &self,
        ticket: &UploadTicket,
        kind: DocumentKind,
        file: &DocumentFile,
    ) -> Result<(), ApiError> {
        debug!(%kind, bytes = file.len(), "transferring document body");
        let request = ApiRequest::put(ticket.upload_url.clone())
            .bytes(file.content_type(), file.bytes().to_vec());
        let response = self.exchange(request).await?;
        Ok(response::ensure_success(&response)?)
    }

    /// `POST /api/documents/{document_id}/complete`; consumes the ticket.
    pub async fn complete_upload(
        &self,
        session: &Session,
        ticket: UploadTicket,
    ) -> Result<(DocumentId, String), ApiError> {
        let UploadTicket {
            document_id, key, ..
        } = ticket;
        let request = ApiRequest::post(self.url(&format!("/api/documents/{document_id}/complete")))
            .bearer(session.access_token.as_str())
            .json(json!({ "key": key }));
        let response = self.exchange(request).await?;
        response::ensure_success(&response)?;
        Ok((document_id, key))
    }
}
