//! Pure balance arithmetic over posted lines.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::AccountId;

use crate::account::{Account, NormalBalanceSide};
use crate::error::LedgerError;
use crate::journal::{EntrySide, PostedLine};

/// Debit/credit totals and the signed balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Sum of debit lines in the base currency.
    pub debit_total: Decimal,
    /// Sum of credit lines in the base currency.
    pub credit_total: Decimal,
    /// Net balance signed by the account's normal side.
    pub balance: Decimal,
}

/// One row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code, for presentation ordering.
    pub code: String,
    /// Account name.
    pub name: String,
    /// The account's own debit total (children not rolled up, so the rows
    /// sum to the grand totals without double counting).
    pub debit_total: Decimal,
    /// The account's own credit total.
    pub credit_total: Decimal,
    /// Net balance signed by the account's normal side.
    pub balance: Decimal,
}

/// A trial balance as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// The cutoff date (inclusive).
    pub as_of: NaiveDate,
    /// One row per account, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Grand total of all debit lines.
    pub total_debit: Decimal,
    /// Grand total of all credit lines.
    pub total_credit: Decimal,
}

fn signed(debit_total: Decimal, credit_total: Decimal, side: NormalBalanceSide) -> Decimal {
    match side {
        NormalBalanceSide::Debit => debit_total - credit_total,
        NormalBalanceSide::Credit => credit_total - debit_total,
    }
}

/// Sums posted lines with `entry_date <= as_of` into per-account
/// `(debit_total, credit_total)` pairs.
fn own_totals(lines: &[PostedLine], as_of: NaiveDate) -> HashMap<AccountId, (Decimal, Decimal)> {
    let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
    for line in lines.iter().filter(|l| l.entry_date <= as_of) {
        let entry = totals.entry(line.account_id).or_default();
        match line.side {
            EntrySide::Debit => entry.0 += line.base_amount,
            EntrySide::Credit => entry.1 += line.base_amount,
        }
    }
    totals
}

/// Computes the balance of `account` as of a date, rolling up all
/// descendant accounts.
///
/// `accounts` must contain the tenant's full chart so the descendant set
/// can be walked. The hierarchy is kept acyclic at write time, but a
/// parent cycle slipping in through corrupt data would make this walk
/// revisit a node; that is caught and surfaced as
/// [`LedgerError::Internal`] instead of looping or double counting.
pub fn account_balance(
    account: &Account,
    accounts: &[Account],
    lines: &[PostedLine],
    as_of: NaiveDate,
) -> Result<AccountBalance, LedgerError> {
    let totals = own_totals(lines, as_of);

    // Collect the subtree rooted at `account` breadth-first.
    let mut subtree = HashSet::from([account.id]);
    let mut frontier = vec![account.id];
    while let Some(parent) = frontier.pop() {
        for child in accounts.iter().filter(|a| a.parent_id == Some(parent)) {
            if !subtree.insert(child.id) {
                return Err(LedgerError::Internal(format!(
                    "account hierarchy cycle through {}",
                    child.id
                )));
            }
            frontier.push(child.id);
        }
    }

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    for id in subtree {
        if let Some((debit, credit)) = totals.get(&id) {
            debit_total += *debit;
            credit_total += *credit;
        }
    }

    Ok(AccountBalance {
        account_id: account.id,
        debit_total,
        credit_total,
        balance: signed(debit_total, credit_total, account.normal_balance_side()),
    })
}

/// Builds a trial balance over every account in the chart.
///
/// Rows carry each account's own totals only; the grand totals are the sum
/// of the rows. A non-zero net between the grand totals means posted data
/// has been corrupted somewhere below the validation layer and is reported
/// as [`LedgerError::TrialBalanceMismatch`], never returned as a report.
pub fn trial_balance(
    accounts: &[Account],
    lines: &[PostedLine],
    as_of: NaiveDate,
) -> Result<TrialBalance, LedgerError> {
    let totals = own_totals(lines, as_of);

    let mut rows: Vec<TrialBalanceRow> = accounts
        .iter()
        .map(|account| {
            let (debit_total, credit_total) =
                totals.get(&account.id).copied().unwrap_or_default();
            TrialBalanceRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                debit_total,
                credit_total,
                balance: signed(debit_total, credit_total, account.normal_balance_side()),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let total_debit: Decimal = rows.iter().map(|r| r.debit_total).sum();
    let total_credit: Decimal = rows.iter().map(|r| r.credit_total).sum();
    if total_debit != total_credit {
        return Err(LedgerError::TrialBalanceMismatch {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(TrialBalance {
        as_of,
        rows,
        total_debit,
        total_credit,
    })
}
