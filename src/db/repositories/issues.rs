use super::{from_document, to_document};
use crate::db::models::issue_models::{Issue, IssueFilter, IssueStatus};
use crate::db::{Filter, Predicate, Sort, StoreHandle};
use anyhow::Result;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

const COLLECTION: &str = "issues";

fn closed_statuses() -> Vec<serde_json::Value> {
    vec![json!(IssueStatus::Resolved), json!(IssueStatus::Closed)]
}

/// Issues repository for handling issue records
#[derive(Clone)]
pub struct IssuesRepository {
    store: StoreHandle,
}

impl IssuesRepository {
    /// Create a new issues repository
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Create a new issue record
    pub async fn create(&self, issue: &Issue) -> Result<Issue> {
        info!("Creating new issue: {}", issue.title);

        self.store
            .insert_one(COLLECTION, to_document(issue)?)
            .await?;

        Ok(issue.clone())
    }

    /// Get issue by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Issue>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", json!(id)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Replace the stored record for an issue
    pub async fn update(&self, issue: &Issue) -> Result<Issue> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", json!(issue.id)),
                to_document(issue)?,
            )
            .await?;

        Ok(issue.clone())
    }

    /// List issues with optional filters, newest first
    pub async fn list(&self, filter: &Filter) -> Result<Vec<Issue>> {
        let docs = self
            .store
            .find(COLLECTION, filter, Some(&Sort::descending("created_at")))
            .await?;

        docs.into_iter().map(from_document).collect()
    }

    /// Build a store filter from listing parameters
    pub fn build_filter(filter: &IssueFilter) -> Filter {
        let mut query = Filter::new();
        if let Some(status) = filter.status {
            query = query.eq("status", json!(status));
        }
        if let Some(priority) = filter.priority {
            query = query.eq("priority", json!(priority));
        }
        if let Some(code) = &filter.machine_code {
            query = query.eq("machine_code", json!(code));
        }
        if let Some(assignee) = filter.assigned_to {
            query = query.eq("assigned_to", json!(assignee));
        }
        query
    }

    /// Count open (not resolved/closed) issues against a machine code
    pub async fn count_open_for_machine(&self, machine_code: &str) -> Result<u64> {
        let query = Filter::new()
            .eq("machine_code", json!(machine_code))
            .not_in("status", closed_statuses());

        self.store.count_documents(COLLECTION, &query).await
    }

    /// Count open issues an account is attached to as assignee or reporter
    pub async fn count_open_for_account(&self, account_id: &Uuid) -> Result<u64> {
        let query = Filter::new()
            .not_in("status", closed_statuses())
            .any(vec![
                ("assigned_to".to_string(), Predicate::Eq(json!(account_id))),
                ("reported_by".to_string(), Predicate::Eq(json!(account_id))),
            ]);

        self.store.count_documents(COLLECTION, &query).await
    }
}
