//! Accounting period posting rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use saldo_shared::types::PeriodId;

use crate::error::LedgerError;

/// Whether a period accepts postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Posting allowed.
    Open,
    /// Posting rejected; the period is locked for reporting.
    Closed,
}

/// A bounded accounting period (typically a month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// Display name, e.g. "2025-03".
    pub name: String,
    /// First date of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Open or closed.
    pub status: PeriodStatus,
}

impl AccountingPeriod {
    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the period accepts postings.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, PeriodStatus::Open)
    }
}

/// Checks that a posting on `date` is allowed.
///
/// `period` is the period covering `date`, if any. No period configured
/// for the date and a closed period are distinct failures: the first is a
/// setup gap, the second a deliberate lock.
pub fn ensure_open(period: Option<&AccountingPeriod>, date: NaiveDate) -> Result<(), LedgerError> {
    match period {
        None => Err(LedgerError::PeriodNotFound(date)),
        Some(p) if !p.is_open() => Err(LedgerError::ClosedPeriod(date)),
        Some(_) => Ok(()),
    }
}
