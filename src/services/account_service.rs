//! Account service - profile and user administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::is_valid_role;
use crate::domain::{UpdateAccount, UpdateProfile, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::Persistence;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Get one account by ID
    async fn get_account(&self, id: Uuid) -> AppResult<User>;

    /// Update the caller's own profile
    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User>;

    /// List every account, including deactivated ones (admin)
    async fn list_accounts(&self) -> AppResult<Vec<User>>;

    /// Change role or active flag on an account (admin)
    async fn update_account(&self, id: Uuid, update: UpdateAccount) -> AppResult<User>;

    /// Deactivate an account (admin "delete")
    async fn deactivate_account(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager<P: Persistence> {
    persistence: Arc<P>,
}

impl<P: Persistence> AccountManager<P> {
    /// Create new account service instance
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl<P: Persistence> AccountService for AccountManager<P> {
    async fn get_account(&self, id: Uuid) -> AppResult<User> {
        self.persistence
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User> {
        if let Some(email) = &update.email {
            // A different account may not already own the new address
            if let Some(existing) = self.persistence.users().find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Email"));
                }
            }
        }

        self.persistence
            .users()
            .update_profile(id, update.full_name, update.email)
            .await
    }

    async fn list_accounts(&self) -> AppResult<Vec<User>> {
        self.persistence.users().list().await
    }

    async fn update_account(&self, id: Uuid, update: UpdateAccount) -> AppResult<User> {
        if let Some(role) = &update.role {
            if !is_valid_role(role) {
                return Err(AppError::validation(format!("Unknown role: {role}")));
            }
        }

        self.persistence
            .users()
            .update_account(id, update.role, update.is_active)
            .await
    }

    async fn deactivate_account(&self, id: Uuid) -> AppResult<()> {
        self.persistence
            .users()
            .update_account(id, None, Some(false))
            .await?;
        Ok(())
    }
}
