//! Account hierarchy rules.
//!
//! The chart of accounts forms a forest: every account has at most one
//! parent and no ancestor chain may loop back on itself.

use saldo_shared::types::AccountId;

use crate::error::LedgerError;

/// Upper bound on ancestor walks. Real charts are a handful of levels deep;
/// hitting this means the stored hierarchy is already corrupt.
const MAX_DEPTH: usize = 64;

/// Validates that attaching `account_id` under `new_parent` keeps the
/// hierarchy acyclic.
///
/// `parent_of` resolves an account's current parent; it is a closure so the
/// check works against any storage shape.
///
/// # Errors
///
/// Returns `CyclicHierarchy` if `account_id` appears among the ancestors of
/// `new_parent` (including `new_parent` itself), or `Internal` if the walk
/// exceeds `MAX_DEPTH`.
pub fn ensure_acyclic<F>(
    account_id: AccountId,
    new_parent: AccountId,
    parent_of: F,
) -> Result<(), LedgerError>
where
    F: Fn(AccountId) -> Option<AccountId>,
{
    let mut current = Some(new_parent);
    for _ in 0..MAX_DEPTH {
        match current {
            None => return Ok(()),
            Some(ancestor) if ancestor == account_id => {
                return Err(LedgerError::CyclicHierarchy(account_id));
            }
            Some(ancestor) => current = parent_of(ancestor),
        }
    }
    Err(LedgerError::Internal(format!(
        "account hierarchy deeper than {MAX_DEPTH} levels starting at {new_parent}"
    )))
}
