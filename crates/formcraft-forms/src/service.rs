//! Application services
//!
//! [`FormService`] handles the owner-facing lifecycle (create, replace-
//! on-save, delete with cascade, analytics reads); [`PublicFormService`]
//! handles the public paths (render fetch, submission). Both resolve the
//! owner's plan capabilities at the moment of use.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use formcraft_accounts::{Account, AccountDirectory, AccountId, PlanCapabilities};
use formcraft_analytics::{field_completion, AnalyticsEngine, CountersSnapshot, FieldCompletion};

use crate::field::FieldDefinition;
use crate::form::{validate_draft, FormDefinition, FormDraft, FormId, FormSettings};
use crate::ports::{FormRepository, NotificationSender, SubmissionRepository};
use crate::slug::Slug;
use crate::submission::{SubmissionMeta, SubmissionRecord};
use crate::validator::SubmissionValidator;
use crate::{FieldTypeRegistry, FormsError, Result};

/// Bounded attempts at disambiguating a taken slug before failing closed.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Default number of recent submissions sampled for field completion.
const DEFAULT_COMPLETION_SAMPLE: usize = 100;

/// Owner analytics payload: counters, the submission list, and the
/// per-field completion rates derived from a bounded sample of it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub analytics: CountersSnapshot,
    pub submissions: Vec<SubmissionRecord>,
    pub field_completion: Vec<FieldCompletion>,
}

/// Public projection of an open form; settings are already plan-gated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicForm {
    pub id: FormId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub settings: FormSettings,
}

/// Owner-facing form lifecycle.
pub struct FormService {
    registry: Arc<FieldTypeRegistry>,
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    accounts: Arc<dyn AccountDirectory>,
    analytics: Arc<AnalyticsEngine>,
    completion_sample_cap: usize,
}

impl FormService {
    pub fn new(
        registry: Arc<FieldTypeRegistry>,
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        accounts: Arc<dyn AccountDirectory>,
        analytics: Arc<AnalyticsEngine>,
    ) -> Self {
        Self {
            registry,
            forms,
            submissions,
            accounts,
            analytics,
            completion_sample_cap: DEFAULT_COMPLETION_SAMPLE,
        }
    }

    /// Override the field-completion sample bound.
    pub fn with_completion_sample_cap(mut self, cap: usize) -> Self {
        self.completion_sample_cap = cap;
        self
    }

    /// Create a form. The plan quota is checked before the slug is
    /// derived or anything touches storage; new forms start unpublished.
    pub async fn create(&self, owner: &AccountId, draft: FormDraft) -> Result<FormDefinition> {
        let account = self.owner(owner).await?;
        let caps = PlanCapabilities::for_tier(account.plan);

        let existing = self.forms.count_by_owner(owner).await?;
        if !caps.allows_another_form(existing) {
            return Err(FormsError::FormLimitReached);
        }

        let fields = validate_draft(&draft, &self.registry).map_err(FormsError::Definition)?;
        let slug = self.assign_slug(&draft.title).await?;

        let now = Utc::now();
        let form = FormDefinition {
            id: Uuid::new_v4(),
            owner_id: *owner,
            title: draft.title,
            description: draft.description,
            slug,
            is_published: false,
            expires_at: None,
            fields,
            settings: draft.settings,
            created_at: now,
            updated_at: now,
        };

        self.forms.insert(&form).await?;
        tracing::info!(form = %form.id, owner = %owner, slug = %form.slug, "form created");
        Ok(form)
    }

    /// Replace a form document. The slug survives every save; publish
    /// state only changes when the draft says so.
    pub async fn update(
        &self,
        owner: &AccountId,
        form_id: &FormId,
        draft: FormDraft,
    ) -> Result<FormDefinition> {
        let mut form = self.owned(owner, form_id).await?;

        let fields = validate_draft(&draft, &self.registry).map_err(FormsError::Definition)?;

        form.title = draft.title;
        form.description = draft.description;
        form.fields = fields;
        form.settings = draft.settings;
        if let Some(published) = draft.is_published {
            form.is_published = published;
        }
        form.expires_at = draft.expires_at;
        form.touch();

        self.forms.update(&form).await?;
        Ok(form)
    }

    pub async fn get(&self, owner: &AccountId, form_id: &FormId) -> Result<FormDefinition> {
        self.owned(owner, form_id).await
    }

    pub async fn list(&self, owner: &AccountId) -> Result<Vec<FormDefinition>> {
        Ok(self.forms.list_by_owner(owner).await?)
    }

    /// Delete a form and everything hanging off it. Irreversible.
    pub async fn delete(&self, owner: &AccountId, form_id: &FormId) -> Result<()> {
        let form = self.owned(owner, form_id).await?;

        self.submissions.delete_by_form(&form.id).await?;
        self.analytics.remove(&form.id);
        self.forms.delete(&form.id).await?;

        tracing::info!(form = %form.id, owner = %owner, "form deleted");
        Ok(())
    }

    /// Counters plus submissions plus derived field completion.
    pub async fn analytics_view(
        &self,
        owner: &AccountId,
        form_id: &FormId,
    ) -> Result<AnalyticsView> {
        let form = self.owned(owner, form_id).await?;

        let submissions = self.submissions.list_by_form(&form.id).await?;
        let field_completion = field_completion(
            submissions
                .iter()
                .take(self.completion_sample_cap)
                .map(|record| &record.data),
        );

        Ok(AnalyticsView {
            analytics: self.analytics.snapshot(&form.id),
            submissions,
            field_completion,
        })
    }

    async fn owner(&self, owner: &AccountId) -> Result<Account> {
        self.accounts
            .find(owner)
            .await?
            .ok_or(FormsError::OwnerNotFound)
    }

    /// Ownership-scoped fetch: a foreign form is indistinguishable from
    /// a missing one.
    async fn owned(&self, owner: &AccountId, form_id: &FormId) -> Result<FormDefinition> {
        let form = self
            .forms
            .find(form_id)
            .await?
            .ok_or(FormsError::FormNotFound)?;
        if form.owner_id != *owner {
            return Err(FormsError::FormNotFound);
        }
        Ok(form)
    }

    async fn assign_slug(&self, title: &str) -> Result<Slug> {
        let candidate = Slug::candidate(title);
        if !self.forms.slug_taken(candidate.as_str()).await? {
            return Ok(candidate);
        }

        for _ in 0..MAX_SLUG_ATTEMPTS {
            let next = candidate.disambiguated();
            if !self.forms.slug_taken(next.as_str()).await? {
                return Ok(next);
            }
        }

        tracing::warn!(candidate = %candidate, "slug disambiguation exhausted");
        Err(FormsError::SlugExhausted)
    }
}

/// Public render and submission paths.
pub struct PublicFormService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    accounts: Arc<dyn AccountDirectory>,
    analytics: Arc<AnalyticsEngine>,
    notifier: Arc<dyn NotificationSender>,
    validator: SubmissionValidator,
}

impl PublicFormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        accounts: Arc<dyn AccountDirectory>,
        analytics: Arc<AnalyticsEngine>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            forms,
            submissions,
            accounts,
            analytics,
            notifier,
            validator: SubmissionValidator::new(),
        }
    }

    /// Fetch an open form for rendering and count the view.
    pub async fn fetch(&self, slug: &str, now: DateTime<Utc>) -> Result<PublicForm> {
        let (form, caps) = self.open_form(slug, now).await?;

        self.analytics.record_view(&form.id);

        Ok(PublicForm {
            id: form.id,
            title: form.title.clone(),
            description: form.description.clone(),
            fields: form.fields.clone(),
            settings: form.settings.gated(&caps),
        })
    }

    /// Validate and store a submission.
    ///
    /// Gating runs before any per-field check: a form at its plan's
    /// submission cap rejects without revealing which fields would have
    /// failed.
    pub async fn submit(
        &self,
        slug: &str,
        payload: &Map<String, Value>,
        meta: SubmissionMeta,
        now: DateTime<Utc>,
    ) -> Result<SubmissionRecord> {
        let (form, caps) = self.open_form(slug, now).await?;

        let recorded = self.analytics.submissions_total(&form.id);
        if !caps.allows_another_submission(recorded) {
            return Err(FormsError::SubmissionLimitReached);
        }

        let data = self
            .validator
            .validate(&form, payload)
            .map_err(FormsError::Rejected)?;

        let completion_seconds = meta.completion_seconds;
        let record = SubmissionRecord::new(form.id, data, meta);
        self.submissions.insert(&record).await?;

        self.analytics.record_submission(&form.id);
        if let Some(seconds) = completion_seconds {
            self.analytics.record_completion_time(&form.id, seconds);
        }

        if form.settings.gated(&caps).enable_email_notifications {
            if let Err(err) = self.notifier.submission_received(&form, &record).await {
                // Best effort: the submission is already accepted.
                tracing::warn!(form = %form.id, error = %err, "submission notification failed");
            }
        }

        tracing::debug!(form = %form.id, submission = %record.id, "submission accepted");
        Ok(record)
    }

    /// Resolve a slug to a published, unexpired form and its owner's
    /// current capabilities.
    async fn open_form(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<(FormDefinition, PlanCapabilities)> {
        // A string that cannot be a slug cannot name a form.
        if Slug::parse(slug).is_err() {
            return Err(FormsError::FormNotFound);
        }

        let form = self
            .forms
            .find_by_slug(slug)
            .await?
            .filter(|form| form.is_published)
            .ok_or(FormsError::FormNotFound)?;

        if form.is_expired(now) {
            return Err(FormsError::Expired);
        }

        let owner = self
            .accounts
            .find(&form.owner_id)
            .await?
            .ok_or(FormsError::OwnerNotFound)?;
        let caps = PlanCapabilities::for_tier(owner.plan);

        Ok((form, caps))
    }
}
