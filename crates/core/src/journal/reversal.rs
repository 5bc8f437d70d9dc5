//! Reversal construction for voids.
//!
//! Voiding never mutates a posted entry's lines. Instead a brand-new entry
//! is built with every line's debit/credit side swapped at the same
//! magnitude, dated at the void timestamp. The reversal reuses the original
//! lines' resolved rate and base amount verbatim: re-resolving at the void
//! date's rate would fail to restore balances exactly.

use chrono::{DateTime, NaiveDate, Utc};

use saldo_shared::types::EntryId;

use super::types::{EntryStatus, JournalEntry, JournalLine};
use crate::error::LedgerError;

/// Builds the reversal entry for a posted entry.
///
/// The returned entry carries `Draft` status and no number; the atomic void
/// operation in the repository posts it in the same transaction that flips
/// the original to `Void`; it is never observable as a draft.
///
/// # Errors
///
/// Returns `Internal` if the original's lines are missing resolved base
/// amounts, which cannot happen for a correctly posted entry.
pub fn build_reversal(
    original: &JournalEntry,
    reason: &str,
    entry_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<JournalEntry, LedgerError> {
    let mut lines = Vec::with_capacity(original.lines.len());
    for line in &original.lines {
        if line.exchange_rate.is_none() || line.base_currency_amount.is_none() {
            return Err(LedgerError::Internal(format!(
                "posted entry {} line {} has no resolved base amount",
                original.id, line.line_number
            )));
        }
        lines.push(JournalLine {
            line_number: line.line_number,
            account_id: line.account_id,
            // Sides swapped 1:1, same magnitudes.
            debit_amount: line.credit_amount,
            credit_amount: line.debit_amount,
            exchange_rate: line.exchange_rate,
            base_currency_amount: line.base_currency_amount,
            memo: line.memo.clone(),
        });
    }

    Ok(JournalEntry {
        id: EntryId::new(),
        tenant_id: original.tenant_id,
        entry_number: None,
        entry_date,
        status: EntryStatus::Draft,
        currency: original.currency,
        description: format!("Reversal of '{}': {reason}", original.description),
        reversal_of: Some(original.id),
        reversed_by: None,
        void_reason: None,
        created_at: now,
        posted_at: None,
        voided_at: None,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use saldo_shared::types::{AccountId, Currency, TenantId};

    fn posted_entry() -> JournalEntry {
        let now = Utc::now();
        JournalEntry {
            id: EntryId::new(),
            tenant_id: TenantId::new(),
            entry_number: Some(7),
            entry_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            status: EntryStatus::Posted,
            currency: Currency::Usd,
            description: "Office supplies".to_string(),
            reversal_of: None,
            reversed_by: None,
            void_reason: None,
            created_at: now,
            posted_at: Some(now),
            voided_at: None,
            lines: vec![
                JournalLine {
                    line_number: 1,
                    account_id: AccountId::new(),
                    debit_amount: dec!(100),
                    credit_amount: Decimal::ZERO,
                    exchange_rate: Some(dec!(0.92)),
                    base_currency_amount: Some(dec!(92.00)),
                    memo: None,
                },
                JournalLine {
                    line_number: 2,
                    account_id: AccountId::new(),
                    debit_amount: Decimal::ZERO,
                    credit_amount: dec!(100),
                    exchange_rate: Some(dec!(0.92)),
                    base_currency_amount: Some(dec!(92.00)),
                    memo: Some("cash".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_reversal_swaps_sides_and_keeps_amounts() {
        let original = posted_entry();
        let void_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let reversal = build_reversal(&original, "data entry error", void_date, Utc::now()).unwrap();

        assert_eq!(reversal.reversal_of, Some(original.id));
        assert_eq!(reversal.entry_date, void_date);
        assert_eq!(reversal.currency, original.currency);
        assert!(reversal.entry_number.is_none());
        assert_eq!(reversal.lines.len(), original.lines.len());

        for (orig, rev) in original.lines.iter().zip(&reversal.lines) {
            assert_eq!(rev.account_id, orig.account_id);
            assert_eq!(rev.debit_amount, orig.credit_amount);
            assert_eq!(rev.credit_amount, orig.debit_amount);
            assert_eq!(rev.side(), orig.side().opposite());
            // Base amounts are copied, not re-resolved.
            assert_eq!(rev.exchange_rate, orig.exchange_rate);
            assert_eq!(rev.base_currency_amount, orig.base_currency_amount);
        }
    }

    #[test]
    fn test_reversal_mentions_reason() {
        let original = posted_entry();
        let reversal = build_reversal(
            &original,
            "data entry error",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            Utc::now(),
        )
        .unwrap();
        assert!(reversal.description.contains("data entry error"));
        assert!(reversal.description.contains("Office supplies"));
    }

    #[test]
    fn test_reversal_requires_resolved_lines() {
        let mut original = posted_entry();
        original.lines[0].base_currency_amount = None;

        let result = build_reversal(
            &original,
            "reason",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::Internal(_))));
    }
}
