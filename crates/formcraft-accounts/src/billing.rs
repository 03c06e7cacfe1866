//! Billing collaborator
//!
//! The card-payment processor is an external service reached over
//! request/response. This module owns the seam: a provider port, the
//! events it reports back, and the service that maps those events onto
//! plan tiers. Checkout UI, card data and webhook signature schemes all
//! live on the provider's side of the port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, PlanTier};
use crate::directory::AccountDirectory;
use crate::{AccountError, Result};

/// A checkout handle returned by the provider for the client to finish.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub client_secret: String,
}

/// Subscription lifecycle events reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingEvent {
    /// Payment completed; the account moves to Pro.
    Activated { account_id: AccountId },
    /// Subscription ended or was canceled; the account returns to Free.
    Canceled { account_id: AccountId },
}

/// Outbound port to the payment processor.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Open a checkout session for upgrading `account_id` to Pro.
    async fn start_checkout(&self, account_id: &AccountId, email: &str) -> Result<CheckoutSession>;

    /// Verify and decode a webhook payload into a lifecycle event.
    async fn verify_event(&self, payload: &[u8], signature: &str) -> Result<BillingEvent>;
}

/// Maps billing events onto account plan tiers.
pub struct SubscriptionService {
    directory: Arc<dyn AccountDirectory>,
    provider: Arc<dyn BillingProvider>,
}

impl SubscriptionService {
    pub fn new(directory: Arc<dyn AccountDirectory>, provider: Arc<dyn BillingProvider>) -> Self {
        Self {
            directory,
            provider,
        }
    }

    /// Start a Pro upgrade for an existing account.
    pub async fn upgrade(&self, account_id: &AccountId) -> Result<CheckoutSession> {
        let account = self
            .directory
            .find(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if account.plan == PlanTier::Pro {
            return Err(AccountError::Billing("Subscription already active".into()));
        }

        self.provider.start_checkout(account_id, &account.email).await
    }

    /// Apply a verified webhook payload to the account's tier.
    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> Result<BillingEvent> {
        let event = self.provider.verify_event(payload, signature).await?;

        match &event {
            BillingEvent::Activated { account_id } => {
                self.directory.set_plan(account_id, PlanTier::Pro).await?;
                tracing::info!(account = %account_id, "subscription activated");
            }
            BillingEvent::Canceled { account_id } => {
                self.directory.set_plan(account_id, PlanTier::Free).await?;
                tracing::info!(account = %account_id, "subscription canceled");
            }
        }

        Ok(event)
    }
}

/// Provider stub that accepts every event unsigned. Test and demo use.
#[derive(Default)]
pub struct StaticBillingProvider;

#[async_trait]
impl BillingProvider for StaticBillingProvider {
    async fn start_checkout(&self, account_id: &AccountId, _email: &str) -> Result<CheckoutSession> {
        Ok(CheckoutSession {
            session_id: format!("cs_{account_id}"),
            client_secret: format!("secret_{account_id}"),
        })
    }

    async fn verify_event(&self, payload: &[u8], _signature: &str) -> Result<BillingEvent> {
        serde_json::from_slice(payload).map_err(|e| AccountError::Billing(e.to_string()))
    }
}
