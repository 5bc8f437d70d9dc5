//! Ledger services: domain logic orchestrated through the repository.
//!
//! Services own the ordering of checks (validation before resolution
//! before the atomic storage primitive) and the logging; the arithmetic
//! and rules themselves live in `saldo-core`.

pub mod accounts;
pub mod balances;
pub mod journal;
pub mod rates;

pub use accounts::AccountService;
pub use balances::BalanceService;
pub use journal::JournalService;
pub use rates::RateService;
