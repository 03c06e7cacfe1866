//! FormCraft account model
//!
//! Form owners, their subscription tier, and the capability set each
//! tier unlocks. Billing itself (checkout, card handling) lives behind
//! the [`billing::BillingProvider`] port; this crate only tracks which
//! tier an account is currently on.

use thiserror::Error;

pub mod account;
pub mod billing;
pub mod directory;
pub mod plan;

pub use account::{Account, AccountId, PlanTier};
pub use billing::{
    BillingEvent, BillingProvider, CheckoutSession, StaticBillingProvider, SubscriptionService,
};
pub use directory::{AccountDirectory, InMemoryAccountDirectory};
pub use plan::PlanCapabilities;

/// Account error types
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Billing provider error: {0}")]
    Billing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, AccountError>;
