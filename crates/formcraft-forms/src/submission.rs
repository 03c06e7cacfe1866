//! Submission records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::form::FormId;

/// Opaque submission identifier.
pub type SubmissionId = Uuid;

/// Validated, per-field-coerced submission data keyed by field id.
pub type NormalizedData = Map<String, Value>;

/// An accepted submission. Immutable once created; only the validator's
/// accept path constructs one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub form_id: FormId,
    pub data: NormalizedData,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl SubmissionRecord {
    pub fn new(form_id: FormId, data: NormalizedData, meta: SubmissionMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            data,
            submitted_at: Utc::now(),
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
        }
    }
}

/// Transport-supplied metadata accompanying a submission.
#[derive(Clone, Debug, Default)]
pub struct SubmissionMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Client-reported fill-out duration, if the renderer measured one.
    pub completion_seconds: Option<u32>,
}
