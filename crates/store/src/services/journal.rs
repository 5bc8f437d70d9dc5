//! Journal entry lifecycle orchestration.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use saldo_core::journal::{
    build_reversal, ensure_can_modify, ensure_can_post, ensure_can_void, resolve_entry,
    validate_lines, CreateEntryInput, EntryStatus, JournalEntry, JournalLine, ResolvedLine,
};
use saldo_core::period::ensure_open;
use saldo_core::rates;
use saldo_core::LedgerError;
use saldo_shared::types::{EntryId, TenantContext};

use crate::repo::LedgerRepository;

/// Drives the `DRAFT -> POSTED -> VOID` lifecycle.
pub struct JournalService<R> {
    repo: Arc<R>,
    conversion_scale: u32,
}

impl<R: LedgerRepository> JournalService<R> {
    /// Creates the service. `conversion_scale` is the number of decimal
    /// places base-currency amounts are rounded to (from configuration).
    pub fn new(repo: Arc<R>, conversion_scale: u32) -> Self {
        Self {
            repo,
            conversion_scale,
        }
    }

    /// Creates a draft entry. Drafts are fully editable and carry no
    /// entry number and no base-currency amounts yet.
    pub async fn create_draft(
        &self,
        ctx: &TenantContext,
        input: CreateEntryInput,
    ) -> Result<JournalEntry, LedgerError> {
        let entry = JournalEntry::new_draft(ctx.tenant_id, &input, Utc::now());
        validate_lines(&entry.lines)?;
        self.check_line_accounts(ctx, &entry.lines).await?;
        let entry = self.repo.insert_entry(ctx, entry).await?;
        info!(entry_id = %entry.id, lines = entry.lines.len(), "Created draft entry");
        Ok(entry)
    }

    /// Replaces a draft's content. Fails with `InvalidState` once the
    /// entry is posted or void.
    pub async fn update_draft(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        input: CreateEntryInput,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.repo.get_entry(ctx, id).await?;
        ensure_can_modify(entry.status)?;

        let replacement = JournalEntry::new_draft(ctx.tenant_id, &input, entry.created_at);
        validate_lines(&replacement.lines)?;
        self.check_line_accounts(ctx, &replacement.lines).await?;

        entry.entry_date = replacement.entry_date;
        entry.currency = replacement.currency;
        entry.description = replacement.description;
        entry.lines = replacement.lines;
        self.repo.update_draft_entry(ctx, entry).await
    }

    /// Deletes a draft and its lines.
    pub async fn delete_draft(&self, ctx: &TenantContext, id: EntryId) -> Result<(), LedgerError> {
        self.repo.delete_draft_entry(ctx, id).await?;
        info!(entry_id = %id, "Deleted draft entry");
        Ok(())
    }

    /// Fetches one entry with its lines.
    pub async fn get_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<JournalEntry, LedgerError> {
        self.repo.get_entry(ctx, id).await
    }

    /// Lists entries, optionally filtered by status.
    pub async fn list_entries(
        &self,
        ctx: &TenantContext,
        status: Option<EntryStatus>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        self.repo.list_entries(ctx, status).await
    }

    /// Posts a draft.
    ///
    /// Validates the lines, checks the accounting period is open, resolves
    /// every line to the tenant base currency at the entry date's rate,
    /// and hands the result to the atomic `post_entry` primitive, which
    /// assigns the entry number and flips the status in one step.
    pub async fn post(&self, ctx: &TenantContext, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let entry = self.repo.get_entry(ctx, id).await?;
        ensure_can_post(&entry)?;
        // Accounts may have been deactivated since the draft was created.
        self.check_line_accounts(ctx, &entry.lines).await?;

        let period = self.repo.period_for(ctx, entry.entry_date).await?;
        ensure_open(period.as_ref(), entry.entry_date)?;

        let base_currency = self.repo.base_currency(ctx).await?;
        let windows = self.repo.list_exchange_windows(ctx).await?;
        let (resolved, totals) =
            resolve_entry(&entry, base_currency, self.conversion_scale, |currency, date| {
                rates::resolve(&windows, &currency, date).map(|w| w.rate)
            })?;
        let lines: Vec<JournalLine> = resolved.into_iter().map(ResolvedLine::into_line).collect();

        let posted = self.repo.post_entry(ctx, id, lines, Utc::now()).await?;
        info!(
            entry_id = %posted.id,
            entry_number = posted.entry_number,
            total = %totals.base_debit,
            "Posted journal entry"
        );
        Ok(posted)
    }

    /// Voids a posted entry by posting a reversal.
    ///
    /// The original's lines are never touched; the reversal mirrors them
    /// with sides swapped at the originally resolved rates. It is dated
    /// at the void timestamp, never the original entry date and never a
    /// caller-chosen date, so a void cannot reach back into a closed
    /// period. The current period must be open. Returns the voided
    /// original and the posted reversal.
    pub async fn void(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        reason: &str,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError> {
        let original = self.repo.get_entry(ctx, id).await?;
        ensure_can_void(&original)?;

        let now = Utc::now();
        let void_date = now.date_naive();
        let period = self.repo.period_for(ctx, void_date).await?;
        ensure_open(period.as_ref(), void_date)?;

        let reversal = build_reversal(&original, reason, void_date, now).map_err(|e| {
            error!(entry_id = %id, error = %e, "Failed to build reversal");
            e
        })?;

        let (voided, reversal) = self
            .repo
            .void_entry(ctx, id, reversal, reason.to_string(), now)
            .await?;
        info!(
            entry_id = %voided.id,
            reversal_id = %reversal.id,
            reversal_number = reversal.entry_number,
            "Voided journal entry"
        );
        Ok((voided, reversal))
    }

    /// Checks that every line's account exists and is active.
    async fn check_line_accounts(
        &self,
        ctx: &TenantContext,
        lines: &[JournalLine],
    ) -> Result<(), LedgerError> {
        for line in lines {
            let account = self.repo.get_account(ctx, line.account_id).await?;
            if !account.is_active {
                return Err(LedgerError::InactiveAccount(account.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
