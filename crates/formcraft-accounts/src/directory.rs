//! Account directory port and in-memory adapter

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::account::{Account, AccountId, PlanTier};
use crate::{AccountError, Result};

/// Lookup and mutation port for accounts.
///
/// The submission and form-save paths use this to resolve an owner's
/// current tier at the moment of use.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find(&self, id: &AccountId) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Insert a new account; fails on a duplicate email.
    async fn insert(&self, account: Account) -> Result<()>;

    /// Change an account's tier, touching `updated_at`.
    async fn set_plan(&self, id: &AccountId, tier: PlanTier) -> Result<Account>;
}

/// In-memory directory over a concurrent map.
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn find(&self, id: &AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.get(id).map(|entry| entry.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.clone()))
    }

    async fn insert(&self, account: Account) -> Result<()> {
        if self.find_by_email(&account.email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn set_plan(&self, id: &AccountId, tier: PlanTier) -> Result<Account> {
        let mut entry = self.accounts.get_mut(id).ok_or(AccountError::NotFound)?;
        entry.plan = tier;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn insert_and_find() {
        let directory = InMemoryAccountDirectory::new();
        let account = Account::new("owner@example.com", "owner");
        let id = account.id;

        directory.insert(account).await.unwrap();

        let found = directory.find(&id).await.unwrap().unwrap();
        assert_eq!(found.email, "owner@example.com");
        assert!(directory
            .find_by_email("owner@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let directory = InMemoryAccountDirectory::new();
        directory
            .insert(Account::new("owner@example.com", "owner"))
            .await
            .unwrap();

        let result = directory
            .insert(Account::new("owner@example.com", "other"))
            .await;
        assert!(matches!(result, Err(AccountError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn set_plan_flips_tier() {
        let directory = InMemoryAccountDirectory::new();
        let account = Account::new("owner@example.com", "owner");
        let id = account.id;
        directory.insert(account).await.unwrap();

        let updated = directory.set_plan(&id, PlanTier::Pro).await.unwrap();
        assert_eq!(updated.plan, PlanTier::Pro);

        let missing = directory.set_plan(&Uuid::new_v4(), PlanTier::Pro).await;
        assert!(matches!(missing, Err(AccountError::NotFound)));
    }
}
