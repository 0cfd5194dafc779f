use super::{from_document, to_document};
use crate::db::models::account_models::{Account, AccountFilter, AccountRole};
use crate::db::{Filter, Sort, StoreHandle};
use anyhow::Result;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

const COLLECTION: &str = "accounts";

/// Accounts repository for handling account records
#[derive(Clone)]
pub struct AccountsRepository {
    store: StoreHandle,
}

impl AccountsRepository {
    /// Create a new accounts repository
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Create a new account record
    pub async fn create(&self, account: &Account) -> Result<Account> {
        info!("Creating new account: {}", account.username);

        self.store
            .insert_one(COLLECTION, to_document(account)?)
            .await?;

        Ok(account.clone())
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Account>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", json!(id)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Get account by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("username", json!(username)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Get account by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("email", json!(email)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Replace the stored record for an account
    pub async fn update(&self, account: &Account) -> Result<Account> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", json!(account.id)),
                to_document(account)?,
            )
            .await?;

        Ok(account.clone())
    }

    /// Delete an account record
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("id", json!(id)))
            .await?;

        Ok(deleted > 0)
    }

    /// List accounts with optional role/active filters, newest first
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>> {
        let mut query = Filter::new();
        if let Some(role) = filter.role {
            query = query.eq("role", json!(role));
        }
        if let Some(active) = filter.active {
            query = query.eq("active", json!(active));
        }

        let docs = self
            .store
            .find(COLLECTION, &query, Some(&Sort::descending("created_at")))
            .await?;

        docs.into_iter().map(from_document).collect()
    }

    /// List active accounts holding a role, ordered by full name
    pub async fn list_by_role(&self, role: AccountRole) -> Result<Vec<Account>> {
        let query = Filter::new().eq("role", json!(role)).eq("active", json!(true));

        let docs = self
            .store
            .find(COLLECTION, &query, Some(&Sort::ascending("full_name")))
            .await?;

        docs.into_iter().map(from_document).collect()
    }

    /// Count accounts matching a role/active combination
    pub async fn count(&self, role: Option<AccountRole>, active: Option<bool>) -> Result<u64> {
        let mut query = Filter::new();
        if let Some(role) = role {
            query = query.eq("role", json!(role));
        }
        if let Some(active) = active {
            query = query.eq("active", json!(active));
        }

        self.store.count_documents(COLLECTION, &query).await
    }
}
