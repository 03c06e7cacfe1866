//! Account aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque account identifier.
pub type AccountId = Uuid;

/// A form owner.
///
/// Credentials (password hash, verification/reset tokens) are handled
/// by the external identity service and never pass through here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: bool,
    pub plan: PlanTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account on the free tier.
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: username.into(),
            first_name: None,
            last_name: None,
            is_verified: false,
            plan: PlanTier::Free,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

/// Subscription tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
}

impl PlanTier {
    pub fn is_pro(self) -> bool {
        matches!(self, PlanTier::Pro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_starts_free_and_unverified() {
        let account = Account::new("owner@example.com", "owner");
        assert_eq!(account.plan, PlanTier::Free);
        assert!(!account.is_verified);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut account = Account::new("owner@example.com", "owner");
        assert_eq!(account.display_name(), "owner");

        account.first_name = Some("Ada".into());
        account.last_name = Some("Lovelace".into());
        assert_eq!(account.display_name(), "Ada Lovelace");
    }

    #[test]
    fn plan_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PlanTier::Pro).unwrap(), "\"pro\"");
        assert_eq!(serde_json::to_string(&PlanTier::Free).unwrap(), "\"free\"");
    }
}
