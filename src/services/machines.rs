use super::parse_id;
use crate::db::models::account_models::Account;
use crate::db::models::machine_models::{
    Machine, MachineFilter, MachineStats, MachineStatus, MachineUpdate, NewMachine,
};
use crate::db::repositories::issues::IssuesRepository;
use crate::db::repositories::machines::MachinesRepository;
use crate::db::StoreHandle;
use crate::error::Error;
use crate::security::policy::{authorize, Operation};
use anyhow::Result;
use chrono::Utc;
use tracing::info;

/// Machine management service
pub struct MachineService {
    machines_repo: MachinesRepository,
    issues_repo: IssuesRepository,
}

impl MachineService {
    /// Create a new machine service
    pub fn new(store: StoreHandle) -> Self {
        Self {
            machines_repo: MachinesRepository::new(store.clone()),
            issues_repo: IssuesRepository::new(store),
        }
    }

    /// Create a machine (admin only); duplicate codes conflict
    pub async fn create(&self, actor: &Account, new_machine: NewMachine) -> Result<Machine> {
        authorize(actor, &Operation::CreateMachine)?;

        if self
            .machines_repo
            .get_by_code(&new_machine.code)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("Machine code already exists".to_string()).into());
        }

        let now = Utc::now();
        let machine = Machine {
            id: uuid::Uuid::new_v4(),
            code: new_machine.code,
            name: new_machine.name,
            description: new_machine.description,
            location: new_machine.location,
            status: new_machine.status,
            last_maintenance: new_machine.last_maintenance,
            created_at: now,
            updated_at: now,
        };

        self.machines_repo.create(&machine).await
    }

    /// Get machine by record id
    pub async fn get(&self, actor: &Account, machine_id: &str) -> Result<Machine> {
        let id = parse_id(machine_id, "machine")?;
        let machine = self
            .machines_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Machine not found".to_string()))?;

        authorize(actor, &Operation::ViewMachine)?;

        Ok(machine)
    }

    /// Get machine by its external code
    pub async fn get_by_code(&self, actor: &Account, code: &str) -> Result<Machine> {
        let machine = self
            .machines_repo
            .get_by_code(code)
            .await?
            .ok_or_else(|| Error::NotFound("Machine not found".to_string()))?;

        authorize(actor, &Operation::ViewMachine)?;

        Ok(machine)
    }

    /// List machines with optional status/location filters
    pub async fn list(&self, actor: &Account, filter: &MachineFilter) -> Result<Vec<Machine>> {
        authorize(actor, &Operation::ListMachines)?;
        self.machines_repo.list(filter).await
    }

    /// Update machine fields (admin only)
    pub async fn update(
        &self,
        actor: &Account,
        machine_id: &str,
        update: MachineUpdate,
    ) -> Result<Machine> {
        let id = parse_id(machine_id, "machine")?;
        let machine = self
            .machines_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Machine not found".to_string()))?;

        authorize(actor, &Operation::UpdateMachine)?;

        let mut updated = machine.clone();
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(description) = update.description {
            updated.description = Some(description);
        }
        if let Some(location) = update.location {
            updated.location = location;
        }
        if let Some(status) = update.status {
            updated.status = status;
        }
        if let Some(last_maintenance) = update.last_maintenance {
            updated.last_maintenance = Some(last_maintenance);
        }
        updated.updated_at = Utc::now();

        self.machines_repo.update(&updated).await
    }

    /// Update operational status (admin or maintenance).
    /// Returning a machine to operational refreshes its maintenance stamp.
    pub async fn update_status(
        &self,
        actor: &Account,
        machine_id: &str,
        status: MachineStatus,
    ) -> Result<Machine> {
        let id = parse_id(machine_id, "machine")?;
        let machine = self
            .machines_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Machine not found".to_string()))?;

        authorize(actor, &Operation::UpdateMachineStatus)?;

        let mut updated = machine.clone();
        let now = Utc::now();
        updated.status = status;
        updated.updated_at = now;
        if status == MachineStatus::Operational {
            updated.last_maintenance = Some(now);
        }

        info!(
            "Machine {} status set to {} by {}",
            machine.code,
            status.as_str(),
            actor.username
        );

        self.machines_repo.update(&updated).await
    }

    /// Delete a machine (admin only); refused while open issues remain
    pub async fn delete(&self, actor: &Account, machine_id: &str) -> Result<()> {
        let id = parse_id(machine_id, "machine")?;
        let machine = self
            .machines_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Machine not found".to_string()))?;

        authorize(actor, &Operation::DeleteMachine)?;

        let open_issues = self.issues_repo.count_open_for_machine(&machine.code).await?;
        if open_issues > 0 {
            return Err(Error::Conflict(
                "Cannot delete machine with open issues. Please resolve all issues first."
                    .to_string(),
            )
            .into());
        }

        self.machines_repo.delete(&id).await?;

        info!("Machine {} deleted by {}", machine.code, actor.username);

        Ok(())
    }

    /// Machine summary statistics (admin or safety officer)
    pub async fn stats(&self, actor: &Account) -> Result<MachineStats> {
        authorize(actor, &Operation::ViewMachineStats)?;

        let mut by_status = Vec::new();
        for status in MachineStatus::ALL {
            let count = self.machines_repo.count(Some(&[status])).await?;
            by_status.push((status.as_str().to_string(), count));
        }

        let total = self.machines_repo.count(None).await?;
        let needs_attention = self
            .machines_repo
            .count(Some(&[MachineStatus::Maintenance, MachineStatus::OutOfOrder]))
            .await?;

        Ok(MachineStats {
            by_status,
            total,
            needs_attention,
        })
    }
}
