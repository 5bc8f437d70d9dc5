//! Journal entry lifecycle: draft, posting, void/reversal.
//!
//! This module implements the core double-entry bookkeeping rules:
//! - Entry and line domain types
//! - The `DRAFT -> POSTED -> VOID` state machine
//! - Validation and base-currency resolution before posting
//! - Reversal construction for voids

pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use reversal::build_reversal;
pub use types::{
    CreateEntryInput, EntrySide, EntryStatus, EntryTotals, JournalEntry, JournalLine, LineInput,
    PostedLine, ResolvedLine,
};
pub use validation::{
    ensure_can_modify, ensure_can_post, ensure_can_void, resolve_entry, validate_lines,
};
