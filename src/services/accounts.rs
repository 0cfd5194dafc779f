use super::parse_id;
use crate::db::models::account_models::{
    Account, AccountFilter, AccountRole, AccountStats, AccountUpdate, NewAccount,
};
use crate::db::repositories::accounts::AccountsRepository;
use crate::db::repositories::issues::IssuesRepository;
use crate::db::StoreHandle;
use crate::error::Error;
use crate::security::auth::MIN_PASSWORD_LEN;
use crate::security::password;
use crate::security::policy::{authorize, Operation};
use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Account management service (admin operations)
pub struct AccountService {
    accounts_repo: AccountsRepository,
    issues_repo: IssuesRepository,
}

impl AccountService {
    /// Create a new account service
    pub fn new(store: StoreHandle) -> Self {
        Self {
            accounts_repo: AccountsRepository::new(store.clone()),
            issues_repo: IssuesRepository::new(store),
        }
    }

    /// List accounts with optional role/active filters (admin only)
    pub async fn list(&self, actor: &Account, filter: &AccountFilter) -> Result<Vec<Account>> {
        authorize(actor, &Operation::ListAccounts)?;
        self.accounts_repo.list(filter).await
    }

    /// Create an account on behalf of an admin
    pub async fn create(&self, actor: &Account, new_account: &NewAccount) -> Result<Account> {
        authorize(actor, &Operation::CreateAccount)?;

        if new_account.password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        if self
            .accounts_repo
            .get_by_username(&new_account.username)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("Username already exists".to_string()).into());
        }

        if self
            .accounts_repo
            .get_by_email(&new_account.email)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("Email already exists".to_string()).into());
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: new_account.username.clone(),
            email: new_account.email.clone(),
            full_name: new_account.full_name.clone(),
            password_hash: password::hash_password(&new_account.password),
            role: new_account.role,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.accounts_repo.create(&account).await
    }

    /// Get account by id (admin only)
    pub async fn get(&self, actor: &Account, account_id: &str) -> Result<Account> {
        let id = parse_id(account_id, "account")?;
        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::ViewAccount)?;

        Ok(account)
    }

    /// Update account profile fields (admin only)
    pub async fn update(
        &self,
        actor: &Account,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account> {
        let id = parse_id(account_id, "account")?;
        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::UpdateAccount)?;

        let mut updated = account.clone();
        if let Some(email) = update.email {
            if email != account.email
                && self.accounts_repo.get_by_email(&email).await?.is_some()
            {
                return Err(Error::Conflict("Email already exists".to_string()).into());
            }
            updated.email = email;
        }
        if let Some(full_name) = update.full_name {
            updated.full_name = full_name;
        }
        if let Some(role) = update.role {
            updated.role = role;
        }
        if let Some(active) = update.active {
            updated.active = active;
        }
        updated.updated_at = Utc::now();

        self.accounts_repo.update(&updated).await
    }

    /// Change an account's role (admin only)
    pub async fn update_role(
        &self,
        actor: &Account,
        account_id: &str,
        role: AccountRole,
    ) -> Result<Account> {
        let id = parse_id(account_id, "account")?;
        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::UpdateAccount)?;

        let mut updated = account.clone();
        updated.role = role;
        updated.updated_at = Utc::now();

        let result = self.accounts_repo.update(&updated).await?;

        info!(
            "Role updated for account {}: {}",
            account.username,
            role.as_str()
        );

        Ok(result)
    }

    /// Flip an account's active flag (admin only, never the acting account)
    pub async fn toggle_active(&self, actor: &Account, account_id: &str) -> Result<Account> {
        let id = parse_id(account_id, "account")?;
        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::SetAccountActive { target: &account })?;

        let mut updated = account.clone();
        updated.active = !account.active;
        updated.updated_at = Utc::now();

        let result = self.accounts_repo.update(&updated).await?;

        info!(
            "Account {} {} by {}",
            account.username,
            if result.active {
                "activated"
            } else {
                "deactivated"
            },
            actor.username
        );

        Ok(result)
    }

    /// Reset an account's password (admin only)
    pub async fn reset_password(
        &self,
        actor: &Account,
        account_id: &str,
        new_password: &str,
    ) -> Result<()> {
        let id = parse_id(account_id, "account")?;

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::ResetPassword)?;

        let mut updated = account.clone();
        updated.password_hash = password::hash_password(new_password);
        updated.updated_at = Utc::now();

        self.accounts_repo.update(&updated).await?;

        info!("Password reset for account: {}", account.username);

        Ok(())
    }

    /// Delete an account (admin only); refused while the account has open
    /// work attached as assignee or reporter
    pub async fn delete(&self, actor: &Account, account_id: &str) -> Result<()> {
        let id = parse_id(account_id, "account")?;
        let account = self
            .accounts_repo
            .get_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        authorize(actor, &Operation::DeleteAccount { target: &account })?;

        let open_issues = self.issues_repo.count_open_for_account(&id).await?;
        if open_issues > 0 {
            return Err(Error::Conflict(
                "Cannot delete account with open issues. Please resolve or reassign issues first."
                    .to_string(),
            )
            .into());
        }

        self.accounts_repo.delete(&id).await?;

        info!("Account {} deleted by {}", account.username, actor.username);

        Ok(())
    }

    /// List active accounts holding a role (admin or safety officer)
    pub async fn list_by_role(&self, actor: &Account, role: AccountRole) -> Result<Vec<Account>> {
        authorize(actor, &Operation::ListAccountsByRole)?;
        self.accounts_repo.list_by_role(role).await
    }

    /// Account summary statistics (admin or safety officer)
    pub async fn stats(&self, actor: &Account) -> Result<AccountStats> {
        authorize(actor, &Operation::ViewAccountStats)?;

        let mut by_role = Vec::new();
        for role in AccountRole::ALL {
            let count = self.accounts_repo.count(Some(role), Some(true)).await?;
            by_role.push((role.as_str().to_string(), count));
        }

        Ok(AccountStats {
            by_role,
            total_active: self.accounts_repo.count(None, Some(true)).await?,
            total_inactive: self.accounts_repo.count(None, Some(false)).await?,
            total: self.accounts_repo.count(None, None).await?,
        })
    }
}
