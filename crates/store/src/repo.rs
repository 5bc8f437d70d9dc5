//! The repository seam between services and storage.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use saldo_core::account::{Account, AccountFilter};
use saldo_core::journal::{EntryStatus, JournalEntry, JournalLine, PostedLine};
use saldo_core::period::{AccountingPeriod, PeriodStatus};
use saldo_core::rates::{RateWindow, VatClass};
use saldo_core::LedgerError;
use saldo_shared::types::{AccountId, Currency, EntryId, PeriodId, TenantContext};

/// Storage operations for the ledger, namespaced per tenant.
///
/// Every method takes a [`TenantContext`]; an implementation must scope
/// all reads and writes to that tenant's schema and never follow a
/// reference across schemas. New storage concerns extend this trait, the
/// services never reach around it to a concrete store.
///
/// The `post_entry` and `void_entry` primitives are atomic: number
/// assignment and the status flip happen as one operation, so two
/// concurrent posts can never share an entry number and a half-voided
/// entry is never observable.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    // ===== Tenant lifecycle =====

    /// Creates the tenant's storage namespace with its base currency.
    async fn provision_tenant(
        &self,
        ctx: &TenantContext,
        base_currency: Currency,
    ) -> Result<(), LedgerError>;

    /// Returns the tenant's base currency.
    async fn base_currency(&self, ctx: &TenantContext) -> Result<Currency, LedgerError>;

    // ===== Chart of accounts =====

    /// Inserts a new account. Fails with `DuplicateCode` if the code is
    /// already taken within the tenant.
    async fn insert_account(
        &self,
        ctx: &TenantContext,
        account: Account,
    ) -> Result<Account, LedgerError>;

    /// Replaces an existing account by id.
    async fn update_account(
        &self,
        ctx: &TenantContext,
        account: Account,
    ) -> Result<Account, LedgerError>;

    /// Fetches one account.
    async fn get_account(&self, ctx: &TenantContext, id: AccountId)
        -> Result<Account, LedgerError>;

    /// Lists accounts matching the filter, ordered by code.
    async fn list_accounts(
        &self,
        ctx: &TenantContext,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, LedgerError>;

    /// Returns true if any posted or voided entry has a line on the
    /// account. Voided entries count: their lines are posted history.
    async fn account_has_posted_lines(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<bool, LedgerError>;

    // ===== Journal entries =====

    /// Inserts a draft entry.
    async fn insert_entry(
        &self,
        ctx: &TenantContext,
        entry: JournalEntry,
    ) -> Result<JournalEntry, LedgerError>;

    /// Replaces a draft entry by id. Fails with `InvalidState` if the
    /// stored entry is no longer a draft.
    async fn update_draft_entry(
        &self,
        ctx: &TenantContext,
        entry: JournalEntry,
    ) -> Result<JournalEntry, LedgerError>;

    /// Fetches one entry with its lines.
    async fn get_entry(&self, ctx: &TenantContext, id: EntryId)
        -> Result<JournalEntry, LedgerError>;

    /// Lists entries, optionally filtered by status, ordered by creation.
    async fn list_entries(
        &self,
        ctx: &TenantContext,
        status: Option<EntryStatus>,
    ) -> Result<Vec<JournalEntry>, LedgerError>;

    /// Deletes a draft entry and its lines. Posted and voided entries
    /// cannot be deleted.
    async fn delete_draft_entry(&self, ctx: &TenantContext, id: EntryId)
        -> Result<(), LedgerError>;

    /// Atomically posts a draft: assigns the next tenant entry number,
    /// stores the resolved lines, and flips the status to `Posted`.
    async fn post_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        resolved_lines: Vec<JournalLine>,
        posted_at: DateTime<Utc>,
    ) -> Result<JournalEntry, LedgerError>;

    /// Atomically voids a posted entry: marks it `Void`, posts the
    /// prepared reversal with the next entry number, and links the two.
    /// Returns the voided original and the posted reversal.
    async fn void_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        reversal: JournalEntry,
        reason: String,
        voided_at: DateTime<Utc>,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError>;

    /// Returns the lines of all `Posted` entries with
    /// `entry_date <= as_of`, in base currency. Voided entries are
    /// excluded; their posted reversals are not.
    async fn list_posted_lines(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<Vec<PostedLine>, LedgerError>;

    // ===== Rate windows =====

    /// Inserts an exchange rate window, truncating an older open-ended
    /// window for the same currency and rejecting any other overlap.
    async fn insert_exchange_window(
        &self,
        ctx: &TenantContext,
        window: RateWindow<Currency>,
    ) -> Result<RateWindow<Currency>, LedgerError>;

    /// Lists all exchange rate windows.
    async fn list_exchange_windows(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<Currency>>, LedgerError>;

    /// Inserts a VAT rate window under the same overlap policy as
    /// exchange windows.
    async fn insert_vat_window(
        &self,
        ctx: &TenantContext,
        window: RateWindow<VatClass>,
    ) -> Result<RateWindow<VatClass>, LedgerError>;

    /// Lists all VAT rate windows.
    async fn list_vat_windows(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<VatClass>>, LedgerError>;

    // ===== Accounting periods =====

    /// Inserts or replaces a period by id.
    async fn upsert_period(
        &self,
        ctx: &TenantContext,
        period: AccountingPeriod,
    ) -> Result<AccountingPeriod, LedgerError>;

    /// Opens or closes a period.
    async fn set_period_status(
        &self,
        ctx: &TenantContext,
        id: PeriodId,
        status: PeriodStatus,
    ) -> Result<AccountingPeriod, LedgerError>;

    /// Returns the period containing `date`, if one is configured.
    async fn period_for(
        &self,
        ctx: &TenantContext,
        date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, LedgerError>;
}
