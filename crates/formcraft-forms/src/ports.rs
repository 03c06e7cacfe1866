//! Storage and collaborator ports
//!
//! The interfaces infrastructure must implement. The document-store
//! driver and the mail transport both live behind these seams.

use async_trait::async_trait;
use thiserror::Error;

use formcraft_accounts::AccountId;

use crate::form::{FormDefinition, FormId};
use crate::submission::SubmissionRecord;

/// Form document repository.
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn insert(&self, form: &FormDefinition) -> Result<(), RepositoryError>;

    /// Full-document replace-on-save.
    async fn update(&self, form: &FormDefinition) -> Result<(), RepositoryError>;

    async fn find(&self, id: &FormId) -> Result<Option<FormDefinition>, RepositoryError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<FormDefinition>, RepositoryError>;

    /// Owner's forms, most recently updated first.
    async fn list_by_owner(&self, owner: &AccountId)
        -> Result<Vec<FormDefinition>, RepositoryError>;

    async fn count_by_owner(&self, owner: &AccountId) -> Result<u64, RepositoryError>;

    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError>;

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError>;
}

/// Submission repository.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), RepositoryError>;

    /// A form's submissions, newest first.
    async fn list_by_form(&self, form_id: &FormId)
        -> Result<Vec<SubmissionRecord>, RepositoryError>;

    /// Cascade target of form deletion.
    async fn delete_by_form(&self, form_id: &FormId) -> Result<(), RepositoryError>;
}

/// Best-effort owner notification (email collaborator). A failure here
/// never rolls back the submission that triggered it.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn submission_received(
        &self,
        form: &FormDefinition,
        record: &SubmissionRecord,
    ) -> Result<(), NotificationError>;
}

/// Repository error type
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),
}

/// Notification transport error
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct NotificationError(pub String);
