//! Entry validation and base-currency resolution.
//!
//! Pure functions with no storage dependencies: rate lookup is passed in as
//! a closure so posting logic can be exercised against any backing store.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_shared::types::Currency;

use super::types::{EntrySide, EntryStatus, EntryTotals, JournalEntry, JournalLine, ResolvedLine};
use crate::error::LedgerError;
use crate::rates::convert::to_base;

/// Validates draft lines: at least two, each with exactly one positive side.
///
/// # Errors
///
/// Returns `InsufficientLines` or a per-line validation error.
pub fn validate_lines(lines: &[JournalLine]) -> Result<(), LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }
    for line in lines {
        line.validate()?;
    }
    Ok(())
}

/// Resolves every line of an entry to the tenant base currency and checks
/// the balance invariant.
///
/// The rate is 1 when the entry currency equals the base currency;
/// otherwise `rate_lookup` must produce a date-effective rate for
/// `entry_date`; there is no silent default. Conversion uses banker's
/// rounding at `scale` decimal places.
///
/// # Errors
///
/// Returns a line validation error, `NoRate` if no rate covers the entry
/// date, or `UnbalancedEntry` if debits != credits in base currency.
pub fn resolve_entry<F>(
    entry: &JournalEntry,
    base_currency: Currency,
    scale: u32,
    rate_lookup: F,
) -> Result<(Vec<ResolvedLine>, EntryTotals), LedgerError>
where
    F: Fn(Currency, NaiveDate) -> Option<Decimal>,
{
    validate_lines(&entry.lines)?;

    let exchange_rate = if entry.currency == base_currency {
        Decimal::ONE
    } else {
        rate_lookup(entry.currency, entry.entry_date).ok_or_else(|| LedgerError::NoRate {
            key: entry.currency.to_string(),
            date: entry.entry_date,
        })?
    };

    let mut resolved = Vec::with_capacity(entry.lines.len());
    for line in &entry.lines {
        let amount = line.entry_currency_amount();
        resolved.push(ResolvedLine {
            line_number: line.line_number,
            account_id: line.account_id,
            side: line.side(),
            entry_currency_amount: amount,
            exchange_rate,
            base_amount: to_base(amount, exchange_rate, scale),
            memo: line.memo.clone(),
        });
    }

    let totals = calculate_totals(&resolved);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.base_debit,
            credit: totals.base_credit,
        });
    }

    Ok((resolved, totals))
}

/// Calculates base-currency totals from resolved lines.
#[must_use]
pub fn calculate_totals(lines: &[ResolvedLine]) -> EntryTotals {
    let base_debit: Decimal = lines
        .iter()
        .filter(|l| l.side == EntrySide::Debit)
        .map(|l| l.base_amount)
        .sum();
    let base_credit: Decimal = lines
        .iter()
        .filter(|l| l.side == EntrySide::Credit)
        .map(|l| l.base_amount)
        .sum();

    EntryTotals::new(base_debit, base_credit)
}

/// Validates that an entry can be modified or deleted.
///
/// # Errors
///
/// Returns `InvalidState` unless the entry is a draft.
pub fn ensure_can_modify(status: EntryStatus) -> Result<(), LedgerError> {
    if status.is_editable() {
        Ok(())
    } else {
        Err(LedgerError::InvalidState(status))
    }
}

/// Validates that an entry can be posted.
///
/// A second post on an already-posted entry fails here; the caller must
/// check status before retrying a failed post.
///
/// # Errors
///
/// Returns `InvalidState` unless the entry is a draft.
pub fn ensure_can_post(entry: &JournalEntry) -> Result<(), LedgerError> {
    if entry.can_post() {
        Ok(())
    } else {
        Err(LedgerError::InvalidState(entry.status))
    }
}

/// Validates that an entry can be voided.
///
/// # Errors
///
/// Returns `AlreadyVoid` for a void entry and `InvalidState` for a draft
/// (drafts are deleted, never voided).
pub fn ensure_can_void(entry: &JournalEntry) -> Result<(), LedgerError> {
    match entry.status {
        EntryStatus::Posted => Ok(()),
        EntryStatus::Void => Err(LedgerError::AlreadyVoid(entry.id)),
        EntryStatus::Draft => Err(LedgerError::InvalidState(entry.status)),
    }
}
