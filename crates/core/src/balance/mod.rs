//! Account balance and trial balance calculation.
//!
//! Balances are always derived from the lines of POSTED entries; there is
//! no mutable running-balance cache to drift out of sync. Voided entries
//! contribute nothing themselves, their posted reversals carry the offset.

pub mod calc;

pub use calc::{
    account_balance, trial_balance, AccountBalance, TrialBalance, TrialBalanceRow,
};
