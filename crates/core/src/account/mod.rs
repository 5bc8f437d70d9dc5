//! Chart of accounts domain types and hierarchy rules.

pub mod hierarchy;
pub mod types;

pub use hierarchy::ensure_acyclic;
pub use types::{
    Account, AccountFilter, AccountType, CreateAccountInput, NormalBalanceSide, UpdateAccountInput,
};
