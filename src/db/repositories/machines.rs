use super::{from_document, to_document};
use crate::db::models::machine_models::{Machine, MachineFilter, MachineStatus};
use crate::db::{Filter, Sort, StoreHandle};
use anyhow::Result;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

const COLLECTION: &str = "machines";

/// Machines repository for handling machine records
#[derive(Clone)]
pub struct MachinesRepository {
    store: StoreHandle,
}

impl MachinesRepository {
    /// Create a new machines repository
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Create a new machine record
    pub async fn create(&self, machine: &Machine) -> Result<Machine> {
        info!("Creating new machine: {}", machine.code);

        self.store
            .insert_one(COLLECTION, to_document(machine)?)
            .await?;

        Ok(machine.clone())
    }

    /// Get machine by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Machine>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", json!(id)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Get machine by external code
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Machine>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("code", json!(code)))
            .await?;

        doc.map(from_document).transpose()
    }

    /// Replace the stored record for a machine
    pub async fn update(&self, machine: &Machine) -> Result<Machine> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", json!(machine.id)),
                to_document(machine)?,
            )
            .await?;

        Ok(machine.clone())
    }

    /// Delete a machine record
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("id", json!(id)))
            .await?;

        Ok(deleted > 0)
    }

    /// List machines with optional filters, newest first
    pub async fn list(&self, filter: &MachineFilter) -> Result<Vec<Machine>> {
        let mut query = Filter::new();
        if let Some(status) = filter.status {
            query = query.eq("status", json!(status));
        }
        if let Some(location) = &filter.location {
            query = query.regex("location", &regex::escape(location));
        }

        let docs = self
            .store
            .find(COLLECTION, &query, Some(&Sort::descending("created_at")))
            .await?;

        docs.into_iter().map(from_document).collect()
    }

    /// Count machines, optionally restricted to a set of statuses
    pub async fn count(&self, statuses: Option<&[MachineStatus]>) -> Result<u64> {
        let mut query = Filter::new();
        if let Some(statuses) = statuses {
            query = query.is_in("status", statuses.iter().map(|s| json!(s)).collect());
        }

        self.store.count_documents(COLLECTION, &query).await
    }
}
