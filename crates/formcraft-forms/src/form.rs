//! Form definition model
//!
//! The owner-authored document: ordered fields plus form-level
//! settings. Drafts arrive untyped from the editor and pass through
//! [`validate_draft`] before anything is persisted; every structural
//! problem is collected so the editor can show the full list at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use formcraft_accounts::{AccountId, PlanCapabilities};

use crate::field::{FieldConfig, FieldDefinition, FieldOption, NumericBounds, RawField};
use crate::registry::{FieldKind, FieldTypeRegistry};
use crate::slug::Slug;

/// Opaque form identifier.
pub type FormId = Uuid;

/// Form-level settings.
///
/// Pro-only knobs are stored regardless of the owner's tier and gated
/// when read, so a downgrade never destroys configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub theme: String,
    pub submit_button_text: String,
    pub success_message: String,
    pub require_email: bool,
    pub enable_captcha: bool,
    pub enable_redirect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    pub enable_email_notifications: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            submit_button_text: "Submit".into(),
            success_message: "Form submitted successfully!".into(),
            require_email: false,
            enable_captcha: false,
            enable_redirect: false,
            redirect_url: None,
            enable_email_notifications: false,
        }
    }
}

impl FormSettings {
    /// The settings a consumer on the given plan actually gets.
    pub fn gated(&self, caps: &PlanCapabilities) -> FormSettings {
        let mut effective = self.clone();
        if !caps.allows_theme(&effective.theme) {
            effective.theme = "light".into();
        }
        effective.require_email &= caps.require_email;
        effective.enable_captcha &= caps.captcha;
        effective.enable_email_notifications &= caps.email_notifications;
        if !caps.redirect {
            effective.enable_redirect = false;
            effective.redirect_url = None;
        }
        effective
    }
}

/// A stored form.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: FormId,
    pub owner_id: AccountId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: Slug,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub fields: Vec<FieldDefinition>,
    pub settings: FormSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormDefinition {
    /// Whether the public paths may see this form at `now`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_published && !self.is_expired(now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at < now).unwrap_or(false)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Candidate form document from the editor.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDraft {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<RawField>,
    pub settings: FormSettings,
    pub is_published: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// One structural problem found while validating a draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    pub message: String,
}

impl DefinitionIssue {
    fn form(message: impl Into<String>) -> Self {
        Self {
            field_id: None,
            message: message.into(),
        }
    }

    fn field(id: &str, message: impl Into<String>) -> Self {
        Self {
            field_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a draft against the registry, producing the typed fields.
///
/// All issues are collected; nothing is persisted on the error path.
pub fn validate_draft(
    draft: &FormDraft,
    registry: &FieldTypeRegistry,
) -> std::result::Result<Vec<FieldDefinition>, Vec<DefinitionIssue>> {
    let mut issues = Vec::new();
    let mut fields = Vec::with_capacity(draft.fields.len());

    if draft.title.trim().is_empty() {
        issues.push(DefinitionIssue::form("Title is required"));
    }

    let mut seen_ids: Vec<&str> = Vec::new();
    for raw in &draft.fields {
        if raw.id.is_empty() {
            issues.push(DefinitionIssue::form("Field id is required"));
            continue;
        }
        if seen_ids.contains(&raw.id.as_str()) {
            issues.push(DefinitionIssue::field(&raw.id, "Duplicate field id"));
            continue;
        }
        seen_ids.push(&raw.id);

        let descriptor = match registry.describe(&raw.kind) {
            Ok(descriptor) => descriptor,
            Err(_) => {
                issues.push(DefinitionIssue::field(
                    &raw.id,
                    format!("Unknown field type: {}", raw.kind),
                ));
                continue;
            }
        };

        match build_field(raw, descriptor.kind, registry) {
            Ok(field) => fields.push(field),
            Err(mut field_issues) => issues.append(&mut field_issues),
        }
    }

    if issues.is_empty() {
        Ok(fields)
    } else {
        Err(issues)
    }
}

fn build_field(
    raw: &RawField,
    kind: FieldKind,
    registry: &FieldTypeRegistry,
) -> std::result::Result<FieldDefinition, Vec<DefinitionIssue>> {
    let descriptor = registry.descriptor(kind);
    let mut issues = Vec::new();

    // Options must match the descriptor exactly: choice kinds need a
    // non-empty list, everything else must not carry one.
    let options = if descriptor.has_options {
        match collect_options(raw) {
            Ok(options) => options,
            Err(issue) => {
                issues.push(DefinitionIssue::field(&raw.id, issue));
                Vec::new()
            }
        }
    } else {
        if raw.options.as_ref().map(|o| !o.is_empty()).unwrap_or(false) {
            issues.push(DefinitionIssue::field(
                &raw.id,
                format!("{} fields do not take options", kind),
            ));
        }
        Vec::new()
    };

    let bounds = if descriptor.has_numeric_bounds {
        match collect_bounds(raw) {
            Ok(bounds) => bounds,
            Err(issue) => {
                issues.push(DefinitionIssue::field(&raw.id, issue));
                NumericBounds::default()
            }
        }
    } else {
        NumericBounds::default()
    };

    let placeholder = descriptor
        .has_placeholder
        .then(|| raw.placeholder.clone())
        .flatten();

    let label = if raw.label.trim().is_empty() {
        descriptor.default_label.to_string()
    } else {
        raw.label.clone()
    };

    if !issues.is_empty() {
        return Err(issues);
    }

    let config = match kind {
        FieldKind::Text => FieldConfig::Text { placeholder },
        FieldKind::Email => FieldConfig::Email { placeholder },
        FieldKind::Password => FieldConfig::Password { placeholder },
        FieldKind::Number => FieldConfig::Number { placeholder, bounds },
        FieldKind::Tel => FieldConfig::Tel { placeholder },
        FieldKind::Textarea => FieldConfig::Textarea {
            placeholder,
            rows: raw.rows,
        },
        FieldKind::Checkbox => FieldConfig::Checkbox,
        FieldKind::Radio => FieldConfig::Radio { options },
        FieldKind::Select => FieldConfig::Select {
            placeholder,
            options,
        },
        FieldKind::Date => FieldConfig::Date,
        FieldKind::File => FieldConfig::File {
            accept: raw.accept.clone(),
        },
    };

    Ok(FieldDefinition {
        id: raw.id.clone(),
        label,
        required: raw.required,
        help_text: raw.help_text.clone(),
        config,
        extra: raw.extra.clone(),
    })
}

fn collect_options(raw: &RawField) -> std::result::Result<Vec<FieldOption>, String> {
    let raw_options = match &raw.options {
        Some(options) if !options.is_empty() => options,
        _ => return Err("Options are required for this field type".into()),
    };

    let options: Vec<FieldOption> = raw_options
        .iter()
        .cloned()
        .map(|option| option.normalize())
        .collect();

    let mut values: Vec<&str> = Vec::new();
    for option in &options {
        if values.contains(&option.value.as_str()) {
            return Err(format!("Duplicate option value: {}", option.value));
        }
        values.push(&option.value);
    }

    Ok(options)
}

fn collect_bounds(raw: &RawField) -> std::result::Result<NumericBounds, String> {
    let min = match &raw.min {
        Some(bound) => Some(bound.as_f64().ok_or("Minimum must be a number")?),
        None => None,
    };
    let max = match &raw.max {
        Some(bound) => Some(bound.as_f64().ok_or("Maximum must be a number")?),
        None => None,
    };

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err("Minimum cannot be greater than maximum".into());
        }
    }

    Ok(NumericBounds { min, max })
}
