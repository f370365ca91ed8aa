use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier issued by the portal for an applicant profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(#[serde(deserialize_with = "deserialize_id")] pub String);

/// Handle under which an applicant's documents are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleId(#[serde(deserialize_with = "deserialize_id")] pub String);

/// Server-side document row created by an upload initiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(#[serde(deserialize_with = "deserialize_id")] pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The API issues integer ids today; accept strings too so opaque ids keep working.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(value) => Ok(value.to_string()),
        RawId::Text(value) if !value.trim().is_empty() => Ok(value),
        RawId::Text(_) => Err(serde::de::Error::custom("identifier must not be empty")),
    }
}

/// Account credentials collected from the registration form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer credential returned by login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Authorization context for every call after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: AccessToken,
}

impl Session {
    pub fn new(access_token: AccessToken) -> Self {
        Self { access_token }
    }
}

/// Payload for the applicant-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewApplicant {
    pub first_name: String,
    pub last_name: String,
    pub latest_education: String,
}

/// Applicant profile returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicantRecord {
    #[serde(alias = "applicant_id")]
    pub id: ApplicantId,
    pub bundle_id: BundleId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub latest_education: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Single-use upload grant returned by the initiate call.
///
/// Neither `Clone` nor `Copy`. Confirming an upload consumes the ticket, so one
/// ticket backs exactly one transfer and one confirmation.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct UploadTicket {
    pub document_id: DocumentId,
    pub upload_url: String,
    pub key: String,
}

/// Which registration document a file represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Transcript,
    Degree,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Transcript => "transcript",
            DocumentKind::Degree => "degree",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("{}.pdf", self.label())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A document confirmed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedDocument {
    pub kind: DocumentKind,
    pub document_id: DocumentId,
    pub key: String,
}

/// A local file chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.filter(|name| !name.trim().is_empty()),
            content_type: content_type.filter(|value| !value.trim().is_empty()),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Declared file name, falling back to `<kind>.pdf`.
    pub fn file_name_for(&self, kind: DocumentKind) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| kind.default_file_name())
    }

    pub fn content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.essence_str().to_string())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
