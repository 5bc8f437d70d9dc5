//! In-memory ledger store, sharded per tenant schema.
//!
//! Each provisioned schema gets its own [`TenantShard`] behind its own
//! `RwLock`. A shard holds everything the tenant owns and nothing else;
//! there is no shared table to mis-filter, so a query physically cannot
//! see another tenant's rows. The atomic `post_entry`/`void_entry`
//! primitives run entirely inside one shard's write lock, which is what
//! keeps entry numbering gap-free under concurrent posts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use saldo_core::account::{Account, AccountFilter};
use saldo_core::journal::{self, EntryStatus, JournalEntry, JournalLine, PostedLine};
use saldo_core::period::{AccountingPeriod, PeriodStatus};
use saldo_core::rates::{self, RateWindow, VatClass};
use saldo_core::LedgerError;
use saldo_shared::types::{
    AccountId, Currency, EntryId, PeriodId, SchemaName, TenantContext, TenantId,
};

use crate::repo::LedgerRepository;

/// All state owned by one tenant schema.
#[derive(Debug)]
struct TenantShard {
    tenant_id: TenantId,
    base_currency: Currency,
    accounts: HashMap<AccountId, Account>,
    entries: HashMap<EntryId, JournalEntry>,
    exchange_windows: Vec<RateWindow<Currency>>,
    vat_windows: Vec<RateWindow<VatClass>>,
    periods: Vec<AccountingPeriod>,
    next_entry_number: i64,
}

impl TenantShard {
    fn new(tenant_id: TenantId, base_currency: Currency) -> Self {
        Self {
            tenant_id,
            base_currency,
            accounts: HashMap::new(),
            entries: HashMap::new(),
            exchange_windows: Vec::new(),
            vat_windows: Vec::new(),
            periods: Vec::new(),
            next_entry_number: 1,
        }
    }

    fn entry(&self, id: EntryId) -> Result<&JournalEntry, LedgerError> {
        self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))
    }

    fn take_next_number(&mut self) -> i64 {
        let number = self.next_entry_number;
        self.next_entry_number += 1;
        number
    }

    fn code_taken(&self, code: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.code == code && Some(a.id) != except)
    }
}

/// In-memory [`LedgerRepository`] implementation.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    shards: DashMap<SchemaName, Arc<RwLock<TenantShard>>>,
}

impl MemoryRepository {
    /// Creates an empty store with no tenants provisioned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the shard for the context's schema and checks that the
    /// caller's tenant id matches the one the schema was provisioned for.
    fn shard(&self, ctx: &TenantContext) -> Result<Arc<RwLock<TenantShard>>, LedgerError> {
        let shard = self
            .shards
            .get(&ctx.schema)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::TenantNotProvisioned(ctx.schema.to_string()))?;
        Ok(shard)
    }
}

fn check_tenant(shard: &TenantShard, ctx: &TenantContext) -> Result<(), LedgerError> {
    if shard.tenant_id == ctx.tenant_id {
        Ok(())
    } else {
        Err(LedgerError::TenantNotProvisioned(ctx.schema.to_string()))
    }
}

fn truncate_windows<K: PartialEq>(
    windows: &mut [RateWindow<K>],
    ids: &[saldo_shared::types::RateWindowId],
    cut: NaiveDate,
) {
    for window in windows.iter_mut().filter(|w| ids.contains(&w.id)) {
        window.valid_to = Some(cut);
    }
}

#[async_trait]
impl LedgerRepository for MemoryRepository {
    async fn provision_tenant(
        &self,
        ctx: &TenantContext,
        base_currency: Currency,
    ) -> Result<(), LedgerError> {
        // Re-provisioning an existing schema would erase the tenant's
        // ledger, so an occupied slot is left untouched.
        self.shards
            .entry(ctx.schema.clone())
            .or_insert_with(|| Arc::new(RwLock::new(TenantShard::new(ctx.tenant_id, base_currency))));
        Ok(())
    }

    async fn base_currency(&self, ctx: &TenantContext) -> Result<Currency, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        Ok(guard.base_currency)
    }

    async fn insert_account(
        &self,
        ctx: &TenantContext,
        account: Account,
    ) -> Result<Account, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        if guard.code_taken(&account.code, None) {
            return Err(LedgerError::DuplicateCode(account.code));
        }
        guard.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(
        &self,
        ctx: &TenantContext,
        account: Account,
    ) -> Result<Account, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        if !guard.accounts.contains_key(&account.id) {
            return Err(LedgerError::AccountNotFound(account.id));
        }
        if guard.code_taken(&account.code, Some(account.id)) {
            return Err(LedgerError::DuplicateCode(account.code));
        }
        guard.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Account, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        guard
            .accounts
            .get(&id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(id))
    }

    async fn list_accounts(
        &self,
        ctx: &TenantContext,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        let mut accounts: Vec<Account> = guard
            .accounts
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn account_has_posted_lines(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<bool, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        // Voided entries count too: their lines are posted history even
        // though they no longer contribute to balances.
        Ok(guard.entries.values().any(|e| {
            matches!(e.status, EntryStatus::Posted | EntryStatus::Void)
                && e.lines.iter().any(|l| l.account_id == id)
        }))
    }

    async fn insert_entry(
        &self,
        ctx: &TenantContext,
        entry: JournalEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        guard.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_draft_entry(
        &self,
        ctx: &TenantContext,
        entry: JournalEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        let stored = guard.entry(entry.id)?;
        journal::ensure_can_modify(stored.status)?;
        guard.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_entry(&self, ctx: &TenantContext, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        guard.entry(id).cloned()
    }

    async fn list_entries(
        &self,
        ctx: &TenantContext,
        status: Option<EntryStatus>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        let mut entries: Vec<JournalEntry> = guard
            .entries
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn delete_draft_entry(&self, ctx: &TenantContext, id: EntryId) -> Result<(), LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        let stored = guard.entry(id)?;
        journal::ensure_can_modify(stored.status)?;
        guard.entries.remove(&id);
        Ok(())
    }

    async fn post_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        resolved_lines: Vec<JournalLine>,
        posted_at: DateTime<Utc>,
    ) -> Result<JournalEntry, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        journal::ensure_can_post(guard.entry(id)?)?;
        // The service checks accounts too, but outside this lock; an
        // account deactivated between that check and here must still be
        // caught before the status flips.
        for line in &resolved_lines {
            let account = guard
                .accounts
                .get(&line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if !account.is_active {
                return Err(LedgerError::InactiveAccount(account.id));
            }
        }
        let number = guard.take_next_number();
        let entry = guard
            .entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        entry.entry_number = Some(number);
        entry.lines = resolved_lines;
        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(posted_at);
        Ok(entry.clone())
    }

    async fn void_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        mut reversal: JournalEntry,
        reason: String,
        voided_at: DateTime<Utc>,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        journal::ensure_can_void(guard.entry(id)?)?;

        let number = guard.take_next_number();
        reversal.entry_number = Some(number);
        reversal.status = EntryStatus::Posted;
        reversal.posted_at = Some(voided_at);

        let original = guard
            .entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        original.status = EntryStatus::Void;
        original.void_reason = Some(reason);
        original.voided_at = Some(voided_at);
        original.reversed_by = Some(reversal.id);
        let voided = original.clone();

        guard.entries.insert(reversal.id, reversal.clone());
        Ok((voided, reversal))
    }

    async fn list_posted_lines(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<Vec<PostedLine>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        let mut lines = Vec::new();
        // Voided originals stay in the aggregation. Their posted reversal
        // carries the same amounts with sides swapped, so the pair nets
        // every touched account back to its pre-entry balance.
        for entry in guard
            .entries
            .values()
            .filter(|e| {
                matches!(e.status, EntryStatus::Posted | EntryStatus::Void)
                    && e.entry_date <= as_of
            })
        {
            for line in &entry.lines {
                let base_amount = line.base_currency_amount.ok_or_else(|| {
                    LedgerError::Internal(format!(
                        "posted entry {} line {} has no base amount",
                        entry.id, line.line_number
                    ))
                })?;
                lines.push(PostedLine {
                    entry_id: entry.id,
                    entry_date: entry.entry_date,
                    account_id: line.account_id,
                    side: line.side(),
                    base_amount,
                });
            }
        }
        Ok(lines)
    }

    async fn insert_exchange_window(
        &self,
        ctx: &TenantContext,
        window: RateWindow<Currency>,
    ) -> Result<RateWindow<Currency>, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        if window.key == guard.base_currency {
            return Err(LedgerError::BaseCurrencyRate);
        }
        let truncate = rates::plan_insert(&guard.exchange_windows, &window)?;
        truncate_windows(&mut guard.exchange_windows, &truncate, window.valid_from);
        guard.exchange_windows.push(window.clone());
        Ok(window)
    }

    async fn list_exchange_windows(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<Currency>>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        Ok(guard.exchange_windows.clone())
    }

    async fn insert_vat_window(
        &self,
        ctx: &TenantContext,
        window: RateWindow<VatClass>,
    ) -> Result<RateWindow<VatClass>, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        let truncate = rates::plan_insert(&guard.vat_windows, &window)?;
        truncate_windows(&mut guard.vat_windows, &truncate, window.valid_from);
        guard.vat_windows.push(window.clone());
        Ok(window)
    }

    async fn list_vat_windows(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<VatClass>>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        Ok(guard.vat_windows.clone())
    }

    async fn upsert_period(
        &self,
        ctx: &TenantContext,
        period: AccountingPeriod,
    ) -> Result<AccountingPeriod, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        if let Some(existing) = guard.periods.iter_mut().find(|p| p.id == period.id) {
            *existing = period.clone();
        } else {
            guard.periods.push(period.clone());
        }
        Ok(period)
    }

    async fn set_period_status(
        &self,
        ctx: &TenantContext,
        id: PeriodId,
        status: PeriodStatus,
    ) -> Result<AccountingPeriod, LedgerError> {
        let shard = self.shard(ctx)?;
        let mut guard = shard.write().await;
        check_tenant(&guard, ctx)?;
        let period = guard
            .periods
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::Storage(format!("unknown period id {id}")))?;
        period.status = status;
        Ok(period.clone())
    }

    async fn period_for(
        &self,
        ctx: &TenantContext,
        date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, LedgerError> {
        let shard = self.shard(ctx)?;
        let guard = shard.read().await;
        check_tenant(&guard, ctx)?;
        Ok(guard.periods.iter().find(|p| p.contains(date)).cloned())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
