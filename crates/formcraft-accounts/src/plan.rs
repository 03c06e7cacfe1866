//! Plan capabilities
//!
//! The single place that answers "what does this tier unlock?". Every
//! consumer (form save, public rendering, submission flow) asks here at
//! the moment of use instead of re-deriving tier checks locally, so a
//! Pro document owned by a downgraded account keeps its stored settings
//! but stops exercising them.

use crate::account::PlanTier;

/// Free-tier themes; anything else requires Pro.
const FREE_THEMES: &[&str] = &["light", "dark", "system"];

/// Capability set derived from a subscription tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanCapabilities {
    pub custom_themes: bool,
    pub expiration: bool,
    pub captcha: bool,
    pub redirect: bool,
    pub email_notifications: bool,
    pub require_email: bool,
    /// Maximum number of forms an owner may have; `None` is unlimited.
    pub max_forms: Option<u32>,
    /// Maximum accepted submissions per form; `None` is unlimited.
    pub max_submissions_per_form: Option<u64>,
}

impl PlanCapabilities {
    pub fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => Self {
                custom_themes: false,
                expiration: false,
                captcha: false,
                redirect: false,
                email_notifications: false,
                require_email: false,
                max_forms: Some(3),
                max_submissions_per_form: Some(100),
            },
            PlanTier::Pro => Self {
                custom_themes: true,
                expiration: true,
                captcha: true,
                redirect: true,
                email_notifications: true,
                require_email: true,
                max_forms: None,
                max_submissions_per_form: None,
            },
        }
    }

    /// Whether `theme` may be rendered on this tier.
    pub fn allows_theme(&self, theme: &str) -> bool {
        self.custom_themes || FREE_THEMES.contains(&theme)
    }

    /// Whether an owner with `existing` forms may create another.
    pub fn allows_another_form(&self, existing: u64) -> bool {
        match self.max_forms {
            Some(limit) => existing < u64::from(limit),
            None => true,
        }
    }

    /// Whether a form with `recorded` accepted submissions may take more.
    pub fn allows_another_submission(&self, recorded: u64) -> bool {
        match self.max_submissions_per_form {
            Some(limit) => recorded < limit,
            None => true,
        }
    }
}
