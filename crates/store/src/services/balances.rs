//! Balance and trial balance reads.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::error;

use saldo_core::account::AccountFilter;
use saldo_core::balance::{self, AccountBalance, TrialBalance};
use saldo_core::LedgerError;
use saldo_shared::types::{AccountId, TenantContext, TenantId};

use crate::repo::LedgerRepository;

/// Read-only balance computation over posted lines.
pub struct BalanceService<R> {
    repo: Arc<R>,
}

impl<R: LedgerRepository> BalanceService<R> {
    /// Creates the service on top of a repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Computes one account's balance as of a date, descendants rolled
    /// up.
    pub async fn account_balance(
        &self,
        ctx: &TenantContext,
        id: AccountId,
        as_of: NaiveDate,
    ) -> Result<AccountBalance, LedgerError> {
        let account = self.repo.get_account(ctx, id).await?;
        let accounts = self
            .repo
            .list_accounts(ctx, &AccountFilter::default())
            .await?;
        let lines = self.repo.list_posted_lines(ctx, as_of).await?;
        balance::account_balance(&account, &accounts, &lines, as_of)
    }

    /// Builds the tenant's trial balance as of a date.
    ///
    /// A mismatch between grand totals means the ledger is corrupt; it is
    /// logged at error level and surfaced, never papered over.
    pub async fn trial_balance(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<TrialBalance, LedgerError> {
        let accounts = self
            .repo
            .list_accounts(ctx, &AccountFilter::default())
            .await?;
        let lines = self.repo.list_posted_lines(ctx, as_of).await?;
        balance::trial_balance(&accounts, &lines, as_of).map_err(|e| {
            if e.is_integrity() {
                error!(tenant_id = %ctx.tenant_id, error = %e, "Trial balance integrity failure");
            }
            e
        })
    }

    /// Builds trial balances for many tenants, one shard at a time.
    ///
    /// Each tenant's result stands alone; a failure for one tenant is
    /// collected, not propagated, so it cannot abort the remaining
    /// tenants.
    pub async fn trial_balance_many(
        &self,
        ctxs: &[TenantContext],
        as_of: NaiveDate,
    ) -> Vec<(TenantId, Result<TrialBalance, LedgerError>)> {
        let mut results = Vec::with_capacity(ctxs.len());
        for ctx in ctxs {
            let result = self.trial_balance(ctx, as_of).await;
            results.push((ctx.tenant_id, result));
        }
        results
    }
}

#[cfg(test)]
#[path = "balances_tests.rs"]
mod tests;
