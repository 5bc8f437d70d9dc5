//! Ledger domain logic for Saldo.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts types and hierarchy rules
//! - `journal` - Journal entry lifecycle, validation, and reversals
//! - `rates` - Date-effective rate windows and currency conversion
//! - `balance` - Account balance and trial balance calculation
//! - `period` - Accounting period posting rules
//! - `error` - The ledger error taxonomy

pub mod account;
pub mod balance;
pub mod error;
pub mod journal;
pub mod period;
pub mod rates;

pub use error::LedgerError;
