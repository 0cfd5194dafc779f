use crate::config::SecurityConfig;
use crate::db::models::account_models::{Account, AuthToken, LoginCredentials, NewAccount};
use crate::db::repositories::accounts::AccountsRepository;
use crate::db::StoreHandle;
use crate::error::Error;
use crate::security::{password, TokenService};
use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication service: login, registration and identity resolution
pub struct AuthService {
    accounts_repo: AccountsRepository,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: StoreHandle, config: &SecurityConfig) -> Self {
        Self {
            accounts_repo: AccountsRepository::new(store),
            tokens: TokenService::new(config.clone()),
        }
    }

    /// Login with username/password.
    /// Unknown username and wrong password produce the same error.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(Account, AuthToken)> {
        let account = self
            .accounts_repo
            .get_by_username(&credentials.username)
            .await?
            .ok_or_else(|| Error::Unauthenticated("Invalid username or password".to_string()))?;

        let valid = password::verify_password(&credentials.password, &account.password_hash);
        if !valid {
            return Err(Error::Unauthenticated("Invalid username or password".to_string()).into());
        }

        if !account.active {
            return Err(Error::Inactive("Account is deactivated".to_string()).into());
        }

        let token = self.tokens.issue_token(&account.username)?;

        info!("Account logged in: {}", account.username);

        Ok((account, token))
    }

    /// Register a new account
    pub async fn register(&self, new_account: &NewAccount) -> Result<Account> {
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

        let created = self.accounts_repo.create(&account).await?;

        info!("New account registered: {}", created.username);

        Ok(created)
    }

    /// Resolve a session token to its account.
    /// Invalid tokens and vanished subjects both fail as Unauthenticated.
    pub async fn resolve_token(&self, token: &str) -> Result<Account> {
        let claims = self.tokens.verify_token(token)?;

        self.accounts_repo
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthenticated("Invalid credentials".to_string()).into())
    }

    /// Fail if the account has been deactivated
    pub fn require_active(account: &Account) -> Result<()> {
        if !account.active {
            return Err(Error::Inactive("Account is deactivated".to_string()).into());
        }
        Ok(())
    }

    /// Resolve a token to an active account: the entry point every
    /// protected operation composes with the authorization policy
    pub async fn authenticate(&self, token: &str) -> Result<Account> {
        let account = self.resolve_token(token).await?;
        Self::require_active(&account)?;
        Ok(account)
    }

    /// Change the acting account's own password
    pub async fn change_password(
        &self,
        account_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let account = self
            .accounts_repo
            .get_by_id(account_id)
            .await?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

        let valid = password::verify_password(current_password, &account.password_hash);
        if !valid {
            return Err(Error::Unauthenticated("Current password is incorrect".to_string()).into());
        }

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        let mut updated = account.clone();
        updated.password_hash = password::hash_password(new_password);
        updated.updated_at = Utc::now();

        self.accounts_repo.update(&updated).await?;

        info!("Password changed for account: {}", account.username);

        Ok(())
    }
}
