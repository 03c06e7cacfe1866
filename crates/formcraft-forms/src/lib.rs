//! FormCraft form engine
//!
//! The dynamic form schema and everything that consumes it: the static
//! field type catalog, the validated form definition model, the
//! submission validator, and the owner/public application services that
//! tie them to storage, plan capabilities and analytics.
//!
//! Build-time flow: [`FieldTypeRegistry`] describes what each field kind
//! may carry; [`form::validate_draft`] turns an untrusted editor draft
//! into a [`FormDefinition`]. Request-time flow: [`SubmissionValidator`]
//! checks a raw payload against a definition and produces the normalized
//! record handed to storage and analytics.

use thiserror::Error;

pub mod field;
pub mod form;
pub mod memory;
pub mod ports;
pub mod registry;
pub mod service;
pub mod slug;
pub mod submission;
pub mod validator;

pub use field::{FieldConfig, FieldDefinition, FieldOption, NumericBounds, RawField};
pub use form::{DefinitionIssue, FormDefinition, FormDraft, FormId, FormSettings};
pub use memory::{InMemoryFormRepository, InMemorySubmissionRepository, TracingNotificationSender};
pub use ports::{FormRepository, NotificationSender, RepositoryError, SubmissionRepository};
pub use registry::{FieldKind, FieldTypeDescriptor, FieldTypeRegistry};
pub use service::{AnalyticsView, FormService, PublicForm, PublicFormService};
pub use slug::Slug;
pub use submission::{NormalizedData, SubmissionMeta, SubmissionRecord};
pub use validator::{FieldError, SubmissionValidator};

/// Form engine error types
#[derive(Debug, Error)]
pub enum FormsError {
    #[error("Form not found")]
    FormNotFound,

    #[error("Form owner not found")]
    OwnerNotFound,

    #[error("Unknown field type: {0}")]
    UnknownFieldKind(String),

    #[error("This form has expired")]
    Expired,

    #[error("Free plan users are limited to 3 forms. Please upgrade to continue.")]
    FormLimitReached,

    #[error("This form has reached the maximum submissions limit for the free plan")]
    SubmissionLimitReached,

    #[error("Could not allocate a unique slug")]
    SlugExhausted,

    #[error("Form definition is invalid")]
    Definition(Vec<DefinitionIssue>),

    #[error("Submission failed validation")]
    Rejected(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<formcraft_accounts::AccountError> for FormsError {
    fn from(err: formcraft_accounts::AccountError) -> Self {
        match err {
            formcraft_accounts::AccountError::NotFound => FormsError::OwnerNotFound,
            other => FormsError::Storage(RepositoryError::Query(other.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormsError>;
