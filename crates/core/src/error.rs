//! Ledger error taxonomy: validation, state, and integrity errors.
//!
//! Validation and state errors are caller mistakes and map to 4xx at the
//! API boundary. Integrity errors mean the ledger itself (or its reference
//! data) is corrupt; they map to 5xx and must never be swallowed or
//! auto-corrected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use saldo_shared::types::{AccountId, EntryId};

use crate::journal::EntryStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits in base currency).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount in base currency.
        debit: Decimal,
        /// Total credit amount in base currency.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line {0} amount cannot be zero")]
    ZeroAmount(u32),

    /// Line amount cannot be negative.
    #[error("Line {0} amount cannot be negative")]
    NegativeAmount(u32),

    /// A line must carry exactly one of debit or credit.
    #[error("Line {0} must set exactly one of debit or credit")]
    BothSidesSet(u32),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Account is inactive and cannot take new lines.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    /// Account code already exists in the tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Reparenting would create a cycle in the account hierarchy.
    #[error("Reparenting account {0} would create a cycle")]
    CyclicHierarchy(AccountId),

    /// Field is immutable once the account has posted lines.
    #[error("Field '{field}' of account {account_id} is immutable once posted lines exist")]
    ImmutableField {
        /// The account whose field was rejected.
        account_id: AccountId,
        /// The immutable field name.
        field: &'static str,
    },

    // ========== Period Errors ==========
    /// No accounting period covers the date.
    #[error("No accounting period found for date {0}")]
    PeriodNotFound(NaiveDate),

    /// Accounting period is closed, no posting allowed.
    #[error("Accounting period covering {0} is closed")]
    ClosedPeriod(NaiveDate),

    // ========== Rate Errors ==========
    /// No rate window covers the date. Never defaults to 1.0.
    #[error("No rate found for {key} on {date}")]
    NoRate {
        /// The rate key (currency code or VAT class).
        key: String,
        /// The date the lookup was made for.
        date: NaiveDate,
    },

    /// Rate value is not usable.
    #[error("Rate must be positive")]
    InvalidRate,

    /// A rate for the tenant base currency makes no sense.
    #[error("Cannot store a rate for the tenant base currency")]
    BaseCurrencyRate,

    /// A new rate window overlaps an existing one for the same key.
    #[error("Rate window for {key} overlaps an existing window")]
    OverlappingRateWindow {
        /// The rate key (currency code or VAT class).
        key: String,
    },

    /// Window dates are inverted or empty.
    #[error("Rate window must end after it starts")]
    EmptyRateWindow,

    // ========== Entry State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The operation is not legal in the entry's current state.
    #[error("Operation not allowed while entry is {0}")]
    InvalidState(EntryStatus),

    /// Entry is already void.
    #[error("Journal entry {0} is already void")]
    AlreadyVoid(EntryId),

    // ========== Tenant Errors ==========
    /// Tenant schema has not been provisioned.
    #[error("Tenant schema '{0}' is not provisioned")]
    TenantNotProvisioned(String),

    // ========== Integrity Errors ==========
    /// Trial balance does not net to zero: ledger corruption.
    #[error("Trial balance mismatch. Debit: {debit}, Credit: {credit}")]
    TrialBalanceMismatch {
        /// Total debits across all accounts.
        debit: Decimal,
        /// Total credits across all accounts.
        credit: Decimal,
    },

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::BothSidesSet(_) => "BOTH_SIDES_SET",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::InactiveAccount(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::CyclicHierarchy(_) => "CYCLIC_HIERARCHY",
            Self::ImmutableField { .. } => "IMMUTABLE_FIELD",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::ClosedPeriod(_) => "PERIOD_CLOSED",
            Self::NoRate { .. } => "NO_RATE",
            Self::InvalidRate => "INVALID_RATE",
            Self::BaseCurrencyRate => "BASE_CURRENCY_RATE",
            Self::OverlappingRateWindow { .. } => "OVERLAPPING_RATE_WINDOW",
            Self::EmptyRateWindow => "EMPTY_RATE_WINDOW",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::AlreadyVoid(_) => "ALREADY_VOID",
            Self::TenantNotProvisioned(_) => "TENANT_NOT_PROVISIONED",
            Self::TrialBalanceMismatch { .. } => "TRIAL_BALANCE_MISMATCH",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::UnbalancedEntry { .. }
            | Self::ZeroAmount(_)
            | Self::NegativeAmount(_)
            | Self::BothSidesSet(_)
            | Self::InactiveAccount(_)
            | Self::ImmutableField { .. }
            | Self::PeriodNotFound(_)
            | Self::ClosedPeriod(_)
            | Self::InvalidRate
            | Self::BaseCurrencyRate
            | Self::EmptyRateWindow
            | Self::CyclicHierarchy(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::ParentNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict - state and uniqueness errors
            Self::DuplicateCode(_)
            | Self::OverlappingRateWindow { .. }
            | Self::InvalidState(_)
            | Self::AlreadyVoid(_) => 409,

            // 500 Internal Server Error - integrity failures
            Self::NoRate { .. }
            | Self::TenantNotProvisioned(_)
            | Self::TrialBalanceMismatch { .. }
            | Self::Storage(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error means the ledger or its reference data is
    /// corrupt, rather than the caller having made a mistake.
    #[must_use]
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::NoRate { .. }
                | Self::TrialBalanceMismatch { .. }
                | Self::Storage(_)
                | Self::Internal(_)
        )
    }
}
