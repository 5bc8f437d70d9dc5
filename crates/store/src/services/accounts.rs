//! Chart of accounts management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use saldo_core::account::{
    ensure_acyclic, Account, AccountFilter, CreateAccountInput, UpdateAccountInput,
};
use saldo_core::LedgerError;
use saldo_shared::types::{AccountId, TenantContext};

use crate::repo::LedgerRepository;

/// Manages the per-tenant chart of accounts.
pub struct AccountService<R> {
    repo: Arc<R>,
}

impl<R: LedgerRepository> AccountService<R> {
    /// Creates the service on top of a repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Creates an account. The code must be unique within the tenant and
    /// the parent, if given, must exist.
    pub async fn create_account(
        &self,
        ctx: &TenantContext,
        input: CreateAccountInput,
    ) -> Result<Account, LedgerError> {
        if let Some(parent_id) = input.parent_id {
            self.repo
                .get_account(ctx, parent_id)
                .await
                .map_err(|_| LedgerError::ParentNotFound(parent_id))?;
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            tenant_id: ctx.tenant_id,
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            parent_id: input.parent_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let account = self.repo.insert_account(ctx, account).await?;
        info!(account_id = %account.id, code = %account.code, "Created account");
        Ok(account)
    }

    /// Updates an account. `account_type` is immutable once the account
    /// has posted lines; reparenting must stay acyclic.
    pub async fn update_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<Account, LedgerError> {
        let mut account = self.repo.get_account(ctx, id).await?;

        let type_changes = input
            .account_type
            .is_some_and(|t| t != account.account_type);
        if type_changes && self.repo.account_has_posted_lines(ctx, id).await? {
            return Err(LedgerError::ImmutableField {
                account_id: id,
                field: "account_type",
            });
        }

        if let Some(new_parent) = input.parent_id {
            if let Some(parent_id) = new_parent {
                self.repo
                    .get_account(ctx, parent_id)
                    .await
                    .map_err(|_| LedgerError::ParentNotFound(parent_id))?;
                let accounts = self.repo.list_accounts(ctx, &AccountFilter::default()).await?;
                ensure_acyclic(id, parent_id, |ancestor| {
                    accounts
                        .iter()
                        .find(|a| a.id == ancestor)
                        .and_then(|a| a.parent_id)
                })?;
            }
            account.parent_id = new_parent;
        }

        if let Some(code) = input.code {
            account.code = code;
        }
        if let Some(name) = input.name {
            account.name = name;
        }
        if let Some(account_type) = input.account_type {
            account.account_type = account_type;
        }
        if let Some(is_active) = input.is_active {
            account.is_active = is_active;
        }
        account.updated_at = Utc::now();

        self.repo.update_account(ctx, account).await
    }

    /// Deactivates an account. Existing lines keep referencing it; only
    /// new draft lines are rejected. There is no hard delete.
    pub async fn deactivate_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Account, LedgerError> {
        let mut account = self.repo.get_account(ctx, id).await?;
        account.is_active = false;
        account.updated_at = Utc::now();
        let account = self.repo.update_account(ctx, account).await?;
        info!(account_id = %id, "Deactivated account");
        Ok(account)
    }

    /// Fetches one account.
    pub async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Account, LedgerError> {
        self.repo.get_account(ctx, id).await
    }

    /// Lists accounts matching the filter, ordered by code.
    pub async fn list_accounts(
        &self,
        ctx: &TenantContext,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, LedgerError> {
        self.repo.list_accounts(ctx, filter).await
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
