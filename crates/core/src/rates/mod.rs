//! Date-effective rate windows and currency conversion.
//!
//! Exchange rates and VAT rates share one policy: a rate is valid over a
//! half-open `[valid_from, valid_to)` window, lookups select the window
//! containing the date, and overlapping windows are rejected when written,
//! not papered over when read. The window table is generic over its key so
//! both rate kinds reuse the same resolver.

pub mod convert;
pub mod resolver;
pub mod window;

#[cfg(test)]
mod props;

pub use convert::to_base;
pub use resolver::{plan_insert, resolve, resolve_rate};
pub use window::{RateWindow, VatClass};
