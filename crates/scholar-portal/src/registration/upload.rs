use tracing::{info, warn};

use super::{RegistrationError, RegistrationStep};
use crate::api::{ApiError, PortalApi, UNREACHABLE};
use crate::domain::{BundleId, ConfirmedDocument, DocumentFile, DocumentKind, Session};
use crate::response::{ResponseError, INVALID_RESPONSE};
use crate::transport::HttpTransport;

/// Two-phase presigned upload of documents into one applicant bundle.
///
/// Per document: initiate (get a ticket), transfer the bytes to the ticket's
/// URL, then complete with the ticket's document id and key. The ticket is
/// moved into the completion call, so it cannot serve a second file.
pub struct DocumentUpload<'a, T> {
    api: &'a PortalApi<T>,
    session: &'a Session,
    bundle_id: &'a BundleId,
}

impl<'a, T> DocumentUpload<'a, T>
where
    T: HttpTransport,
{
    pub fn new(api: &'a PortalApi<T>, session: &'a Session, bundle_id: &'a BundleId) -> Self {
        Self {
            api,
            session,
            bundle_id,
        }
    }

    pub async fn upload(
        &self,
        kind: DocumentKind,
        file: &DocumentFile,
    ) -> Result<ConfirmedDocument, RegistrationError> {
        let step = RegistrationStep::UploadDocument(kind);
        let file_name = file.file_name_for(kind);
        let content_type = file.content_type();

        let ticket = self
            .api
            .initiate_upload(self.session, self.bundle_id, &file_name, &content_type)
            .await
            .map_err(|err| {
                warn!(%kind, bundle_id = %self.bundle_id, error = %err, "upload initiation failed");
                match err {
                    ApiError::Unreachable(_) => RegistrationError::at(step, UNREACHABLE),
                    ApiError::Response(ResponseError::Malformed { .. }) => {
                        RegistrationError::at(step, INVALID_RESPONSE)
                    }
                    _ => RegistrationError::at(step, format!("Failed to start {kind} upload.")),
                }
            })?;
        info!(%kind, document_id = %ticket.document_id, "upload ticket issued");

        self.api
            .transfer(&ticket, kind, file)
            .await
            .map_err(|err| {
                warn!(%kind, document_id = %ticket.document_id, error = %err, "document transfer failed");
                RegistrationError::at(step, format!("Failed to upload {kind} file."))
            })?;

        let (document_id, key) = self
            .api
            .complete_upload(self.session, ticket)
            .await
            .map_err(|err| {
                warn!(%kind, error = %err, "upload confirmation failed");
                RegistrationError::at(step, format!("Failed to confirm {kind} upload."))
            })?;
        info!(%kind, %document_id, "document confirmed");

        Ok(ConfirmedDocument {
            kind,
            document_id,
            key,
        })
    }
}
