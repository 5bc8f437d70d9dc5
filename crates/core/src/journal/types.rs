//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{AccountId, Currency, EntryId, TenantId};

use crate::error::LedgerError;

/// Journal entry lifecycle status.
///
/// `Draft` is the only mutable state. `Void` is terminal: a void entry
/// never reopens, and its lines are never altered; the offsetting effect
/// comes entirely from a separate reversal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified or deleted.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been voided via a reversal (immutable, terminal).
    Void,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Posted => write!(f, "posted"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Side of a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit (increases debit-normal accounts).
    Debit,
    /// Credit (increases credit-normal accounts).
    Credit,
}

impl EntrySide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// A single line of a journal entry.
///
/// Exactly one of `debit_amount`/`credit_amount` is non-zero; both are in
/// the entry currency. `exchange_rate` and `base_currency_amount` are
/// filled in at posting time from the date-effective rate and are `None`
/// while the entry is a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line number within the entry (1-based).
    pub line_number: u32,
    /// The account this line posts to.
    pub account_id: AccountId,
    /// Debit amount in the entry currency (zero if this is a credit line).
    pub debit_amount: Decimal,
    /// Credit amount in the entry currency (zero if this is a debit line).
    pub credit_amount: Decimal,
    /// Rate applied at posting (entry currency -> tenant base currency).
    pub exchange_rate: Option<Decimal>,
    /// Absolute line amount in the tenant base currency, set at posting.
    pub base_currency_amount: Option<Decimal>,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

impl JournalLine {
    /// Builds a draft line from caller input.
    #[must_use]
    pub fn from_input(line_number: u32, input: &LineInput) -> Self {
        let (debit_amount, credit_amount) = match input.side {
            EntrySide::Debit => (input.amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, input.amount),
        };
        Self {
            line_number,
            account_id: input.account_id,
            debit_amount,
            credit_amount,
            exchange_rate: None,
            base_currency_amount: None,
            memo: input.memo.clone(),
        }
    }

    /// Returns which side this line is on.
    ///
    /// Only meaningful for a line that passed [`Self::validate`].
    #[must_use]
    pub fn side(&self) -> EntrySide {
        if self.credit_amount.is_zero() {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }

    /// Returns the line amount in the entry currency.
    #[must_use]
    pub fn entry_currency_amount(&self) -> Decimal {
        // One of the pair is always zero for a valid line.
        self.debit_amount + self.credit_amount
    }

    /// Validates the exactly-one-side invariant.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if both sides are zero, `BothSidesSet` if both
    /// are non-zero, `NegativeAmount` if either side is negative.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.debit_amount < Decimal::ZERO || self.credit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(self.line_number));
        }
        match (self.debit_amount.is_zero(), self.credit_amount.is_zero()) {
            (true, true) => Err(LedgerError::ZeroAmount(self.line_number)),
            (false, false) => Err(LedgerError::BothSidesSet(self.line_number)),
            _ => Ok(()),
        }
    }
}

/// A journal entry: an atomic, balanced set of debit/credit lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Tenant this entry belongs to.
    pub tenant_id: TenantId,
    /// Tenant-scoped monotonic sequence number, assigned only at posting.
    pub entry_number: Option<i64>,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// The single currency all lines of this entry are denominated in.
    pub currency: Currency,
    /// Human-readable description.
    pub description: String,
    /// Set on a reversal entry: the entry it reverses.
    pub reversal_of: Option<EntryId>,
    /// Set on a voided entry: the reversal that offsets it.
    pub reversed_by: Option<EntryId>,
    /// Reason given when the entry was voided.
    pub void_reason: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
    /// The entry's lines. Owned: cascade-deleted only while Draft.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Creates a new draft entry from caller input.
    #[must_use]
    pub fn new_draft(tenant_id: TenantId, input: &CreateEntryInput, now: DateTime<Utc>) -> Self {
        let lines = input
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| JournalLine::from_input(u32::try_from(i + 1).unwrap_or(u32::MAX), line))
            .collect();
        Self {
            id: EntryId::new(),
            tenant_id,
            entry_number: None,
            entry_date: input.entry_date,
            status: EntryStatus::Draft,
            currency: input.currency,
            description: input.description.clone(),
            reversal_of: None,
            reversed_by: None,
            void_reason: None,
            created_at: now,
            posted_at: None,
            voided_at: None,
            lines,
        }
    }

    /// Returns true if the entry can still be edited or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Returns true if the entry can be posted.
    #[must_use]
    pub fn can_post(&self) -> bool {
        self.status == EntryStatus::Draft
    }

    /// Returns true if the entry can be voided.
    #[must_use]
    pub fn can_void(&self) -> bool {
        self.status == EntryStatus::Posted
    }
}

/// Input for a single line of a new entry.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Amount in the entry currency (must be positive).
    pub amount: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Input for creating a draft entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// The accounting date.
    pub entry_date: NaiveDate,
    /// The currency all lines are denominated in.
    pub currency: Currency,
    /// Description of the business event.
    pub description: String,
    /// The lines (at least 2).
    pub lines: Vec<LineInput>,
}

/// A line with its base-currency amount resolved, ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Line number within the entry.
    pub line_number: u32,
    /// The account this line posts to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Amount in the entry currency.
    pub entry_currency_amount: Decimal,
    /// Rate applied (entry currency -> base currency).
    pub exchange_rate: Decimal,
    /// Absolute amount in the base currency.
    pub base_amount: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

impl ResolvedLine {
    /// Converts the resolved line back into a stored journal line.
    #[must_use]
    pub fn into_line(self) -> JournalLine {
        let (debit_amount, credit_amount) = match self.side {
            EntrySide::Debit => (self.entry_currency_amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, self.entry_currency_amount),
        };
        JournalLine {
            line_number: self.line_number,
            account_id: self.account_id,
            debit_amount,
            credit_amount,
            exchange_rate: Some(self.exchange_rate),
            base_currency_amount: Some(self.base_amount),
            memo: self.memo,
        }
    }
}

/// Totals of an entry in base currency.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount in base currency.
    pub base_debit: Decimal,
    /// Total credit amount in base currency.
    pub base_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(base_debit: Decimal, base_credit: Decimal) -> Self {
        Self {
            base_debit,
            base_credit,
            is_balanced: base_debit == base_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.base_debit - self.base_credit
    }
}

/// A line of a posted entry, as seen by the balance calculator.
///
/// Only lines of `Posted` entries appear in this view; a voided entry's
/// lines are excluded, which is what makes voiding mathematically safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedLine {
    /// The entry this line belongs to.
    pub entry_id: EntryId,
    /// The entry's accounting date.
    pub entry_date: NaiveDate,
    /// The account this line posted to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Absolute amount in the tenant base currency.
    pub base_amount: Decimal,
}
