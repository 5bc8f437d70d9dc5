//! Account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use saldo_shared::types::{AccountId, TenantId};

/// Account type classification.
///
/// The type fixes which side of the ledger increases the account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the normal balance side derived from the type.
    ///
    /// Asset/Expense accounts are debit-normal; Liability/Equity/Revenue
    /// accounts are credit-normal. This is derived, never stored or set by
    /// callers.
    #[must_use]
    pub const fn normal_balance_side(self) -> NormalBalanceSide {
        match self {
            Self::Asset | Self::Expense => NormalBalanceSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalanceSide::Credit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Liability => write!(f, "liability"),
            Self::Equity => write!(f, "equity"),
            Self::Revenue => write!(f, "revenue"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Which side of the ledger increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalanceSide {
    /// Debit-normal: balance = debits - credits.
    Debit,
    /// Credit-normal: balance = credits - debits.
    Credit,
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Tenant this account belongs to.
    pub tenant_id: TenantId,
    /// Account code, unique within the tenant (e.g., "1000").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account type; immutable once the account has posted lines.
    pub account_type: AccountType,
    /// Optional parent for hierarchical rollup; the hierarchy is acyclic.
    pub parent_id: Option<AccountId>,
    /// Inactive accounts reject new draft lines but keep their history.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns the normal balance side (derived from the account type).
    #[must_use]
    pub const fn normal_balance_side(&self) -> NormalBalanceSide {
        self.account_type.normal_balance_side()
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique within the tenant).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account for hierarchical structure.
    pub parent_id: Option<AccountId>,
}

/// Input for updating an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account type (rejected once posted lines exist).
    pub account_type: Option<AccountType>,
    /// Parent account (`Some(None)` detaches from the current parent).
    pub parent_id: Option<Option<AccountId>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<AccountId>>,
}

impl AccountFilter {
    /// Returns true if the account matches every set filter field.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(account_type) = self.account_type {
            if account.account_type != account_type {
                return false;
            }
        }
        if let Some(is_active) = self.is_active {
            if account.is_active != is_active {
                return false;
            }
        }
        if let Some(parent_id) = self.parent_id {
            if account.parent_id != parent_id {
                return false;
            }
        }
        true
    }
}
