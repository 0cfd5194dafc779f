use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: AccountRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account role enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Admin,
    SafetyOfficer,
    Maintenance,
    Employee,
}

impl AccountRole {
    pub const ALL: [AccountRole; 4] = [
        AccountRole::Admin,
        AccountRole::SafetyOfficer,
        AccountRole::Maintenance,
        AccountRole::Employee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::SafetyOfficer => "safety_officer",
            AccountRole::Maintenance => "maintenance",
            AccountRole::Employee => "employee",
        }
    }
}

/// Fields for registration / admin account creation
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: AccountRole,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<AccountRole>,
    pub active: Option<bool>,
}

/// Listing filters for account queries
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<AccountRole>,
    pub active: Option<bool>,
}

/// Authentication token issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Per-role account counts
#[derive(Debug, Clone, Serialize)]
pub struct AccountStats {
    pub by_role: Vec<(String, u64)>,
    pub total_active: u64,
    pub total_inactive: u64,
    pub total: u64,
}
