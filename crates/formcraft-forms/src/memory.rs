//! In-memory adapters
//!
//! Concurrent-map implementations of the storage ports, used by tests
//! and the demo server. A production deployment swaps these for the
//! document-store driver behind the same traits.

use async_trait::async_trait;
use dashmap::DashMap;

use formcraft_accounts::AccountId;

use crate::form::{FormDefinition, FormId};
use crate::ports::{
    FormRepository, NotificationError, NotificationSender, RepositoryError, SubmissionRepository,
};
use crate::submission::{SubmissionId, SubmissionRecord};

/// In-memory form repository.
#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: DashMap<FormId, FormDefinition>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn insert(&self, form: &FormDefinition) -> Result<(), RepositoryError> {
        if self.forms.contains_key(&form.id) {
            return Err(RepositoryError::DuplicateKey(form.id.to_string()));
        }
        self.forms.insert(form.id, form.clone());
        Ok(())
    }

    async fn update(&self, form: &FormDefinition) -> Result<(), RepositoryError> {
        if !self.forms.contains_key(&form.id) {
            return Err(RepositoryError::NotFound);
        }
        self.forms.insert(form.id, form.clone());
        Ok(())
    }

    async fn find(&self, id: &FormId) -> Result<Option<FormDefinition>, RepositoryError> {
        Ok(self.forms.get(id).map(|entry| entry.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<FormDefinition>, RepositoryError> {
        Ok(self
            .forms
            .iter()
            .find(|entry| entry.slug.as_str() == slug)
            .map(|entry| entry.clone()))
    }

    async fn list_by_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<FormDefinition>, RepositoryError> {
        let mut forms: Vec<FormDefinition> = self
            .forms
            .iter()
            .filter(|entry| entry.owner_id == *owner)
            .map(|entry| entry.clone())
            .collect();
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(forms)
    }

    async fn count_by_owner(&self, owner: &AccountId) -> Result<u64, RepositoryError> {
        Ok(self
            .forms
            .iter()
            .filter(|entry| entry.owner_id == *owner)
            .count() as u64)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError> {
        Ok(self.forms.iter().any(|entry| entry.slug.as_str() == slug))
    }

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
        self.forms.remove(id);
        Ok(())
    }
}

/// In-memory submission repository.
#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: DashMap<SubmissionId, SubmissionRecord>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), RepositoryError> {
        self.submissions.insert(record.id, record.clone());
        Ok(())
    }

    async fn list_by_form(
        &self,
        form_id: &FormId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let mut records: Vec<SubmissionRecord> = self
            .submissions
            .iter()
            .filter(|entry| entry.form_id == *form_id)
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    async fn delete_by_form(&self, form_id: &FormId) -> Result<(), RepositoryError> {
        self.submissions.retain(|_, record| record.form_id != *form_id);
        Ok(())
    }
}

/// Notification sender that only logs. Stands in for the mail
/// collaborator wherever delivery is not configured.
#[derive(Default)]
pub struct TracingNotificationSender;

#[async_trait]
impl NotificationSender for TracingNotificationSender {
    async fn submission_received(
        &self,
        form: &FormDefinition,
        record: &SubmissionRecord,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            form = %form.id,
            submission = %record.id,
            "submission notification (no mail transport configured)"
        );
        Ok(())
    }
}
