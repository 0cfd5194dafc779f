use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,
    /// External machine code, distinct from the record id
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub status: MachineStatus,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operational status of a machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Operational,
    Maintenance,
    OutOfOrder,
}

impl MachineStatus {
    pub const ALL: [MachineStatus; 3] = [
        MachineStatus::Operational,
        MachineStatus::Maintenance,
        MachineStatus::OutOfOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Operational => "operational",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::OutOfOrder => "out_of_order",
        }
    }
}

/// Fields for machine creation
#[derive(Debug, Clone, Deserialize)]
pub struct NewMachine {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    #[serde(default = "default_machine_status")]
    pub status: MachineStatus,
    pub last_maintenance: Option<DateTime<Utc>>,
}

fn default_machine_status() -> MachineStatus {
    MachineStatus::Operational
}

/// Partial machine update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<MachineStatus>,
    pub last_maintenance: Option<DateTime<Utc>>,
}

/// Listing filters for machine queries
#[derive(Debug, Clone, Default)]
pub struct MachineFilter {
    pub status: Option<MachineStatus>,
    /// Case-insensitive location match
    pub location: Option<String>,
}

/// Per-status machine counts
#[derive(Debug, Clone, Serialize)]
pub struct MachineStats {
    pub by_status: Vec<(String, u64)>,
    pub total: u64,
    /// Machines in maintenance or out of order
    pub needs_attention: u64,
}
