//! Property suites for journal validation and reversal construction.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use saldo_shared::types::{AccountId, Currency, TenantId};

use super::reversal::build_reversal;
use super::types::{CreateEntryInput, EntrySide, EntryStatus, JournalEntry, LineInput};
use super::validation::resolve_entry;
use crate::error::LedgerError;

/// Strategy for positive line amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a balanced set of lines: every debit amount is mirrored by
/// one credit line carrying the total.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<LineInput>> {
    prop::collection::vec(amount_strategy(), 1..8).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<LineInput> = debits
            .into_iter()
            .map(|amount| LineInput {
                account_id: AccountId::new(),
                side: EntrySide::Debit,
                amount,
                memo: None,
            })
            .collect();
        lines.push(LineInput {
            account_id: AccountId::new(),
            side: EntrySide::Credit,
            amount: total,
            memo: None,
        });
        lines
    })
}

fn make_entry(currency: Currency, lines: Vec<LineInput>) -> JournalEntry {
    let input = CreateEntryInput {
        entry_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        currency,
        description: "prop entry".to_string(),
        lines,
    };
    JournalEntry::new_draft(TenantId::new(), &input, Utc::now())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A resolved entry is always balanced in base currency; unbalanced
    /// inputs never come back as Ok.
    #[test]
    fn prop_resolve_output_is_balanced(lines in balanced_lines_strategy()) {
        let entry = make_entry(Currency::Eur, lines);
        let (resolved, totals) = resolve_entry(&entry, Currency::Eur, 4, |_, _| None).unwrap();

        prop_assert!(totals.is_balanced);
        let debit: Decimal = resolved.iter()
            .filter(|l| l.side == EntrySide::Debit)
            .map(|l| l.base_amount)
            .sum();
        let credit: Decimal = resolved.iter()
            .filter(|l| l.side == EntrySide::Credit)
            .map(|l| l.base_amount)
            .sum();
        prop_assert_eq!(debit, credit);
    }

    /// Skewing any single line of a balanced entry breaks the balance check.
    #[test]
    fn prop_skewed_entry_rejected(
        lines in balanced_lines_strategy(),
        skew in 1i64..10_000i64,
    ) {
        let mut lines = lines;
        lines[0].amount += Decimal::new(skew, 2);
        let entry = make_entry(Currency::Eur, lines);

        let result = resolve_entry(&entry, Currency::Eur, 4, |_, _| None);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedEntry { .. })),
            "expected UnbalancedEntry, got {:?}",
            result
        );
    }

    /// Same-currency resolution keeps amounts bit-for-bit (rate 1).
    #[test]
    fn prop_same_currency_is_identity(lines in balanced_lines_strategy()) {
        let entry = make_entry(Currency::Eur, lines);
        let (resolved, _) = resolve_entry(&entry, Currency::Eur, 4, |_, _| None).unwrap();

        for line in &resolved {
            prop_assert_eq!(line.exchange_rate, Decimal::ONE);
            prop_assert_eq!(line.base_amount, line.entry_currency_amount);
        }
    }

    /// For any posted entry, original plus reversal nets every account to
    /// exactly zero in base currency.
    #[test]
    fn prop_reversal_nets_to_zero(lines in balanced_lines_strategy()) {
        let mut entry = make_entry(Currency::Eur, lines);
        let (resolved, _) = resolve_entry(&entry, Currency::Eur, 4, |_, _| None).unwrap();
        entry.lines = resolved.into_iter().map(super::types::ResolvedLine::into_line).collect();
        entry.status = EntryStatus::Posted;
        entry.entry_number = Some(1);

        let reversal = build_reversal(
            &entry,
            "prop void",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            Utc::now(),
        ).unwrap();

        let mut net: HashMap<AccountId, Decimal> = HashMap::new();
        for line in entry.lines.iter().chain(&reversal.lines) {
            let base = line.base_currency_amount.unwrap();
            let signed = match line.side() {
                EntrySide::Debit => base,
                EntrySide::Credit => -base,
            };
            *net.entry(line.account_id).or_insert(Decimal::ZERO) += signed;
        }

        for (account, balance) in net {
            prop_assert_eq!(balance, Decimal::ZERO, "account {} did not net to zero", account);
        }
    }
}
