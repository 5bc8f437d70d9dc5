//! Rate validity windows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::RateWindowId;

/// A rate valid over a half-open `[valid_from, valid_to)` window.
///
/// `valid_to = None` means open-ended. The key is a currency for exchange
/// rates and a [`VatClass`] for VAT rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateWindow<K> {
    /// Unique identifier.
    pub id: RateWindowId,
    /// What this rate applies to.
    pub key: K,
    /// The rate value. For exchange rates: 1 unit of `key` currency in the
    /// tenant base currency.
    pub rate: Decimal,
    /// First date (inclusive) the rate applies.
    pub valid_from: NaiveDate,
    /// First date (exclusive) the rate no longer applies; `None` = open.
    pub valid_to: Option<NaiveDate>,
    /// When the window was defined; breaks ties between bad overlapping data.
    pub defined_at: DateTime<Utc>,
}

impl<K> RateWindow<K> {
    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_to.is_none_or(|to| date < to)
    }

    /// Returns true if the two windows' date ranges intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.valid_to, other.valid_to) {
            (None, None) => true,
            (Some(self_to), None) => other.valid_from < self_to,
            (None, Some(other_to)) => self.valid_from < other_to,
            (Some(self_to), Some(other_to)) => {
                self.valid_from < other_to && other.valid_from < self_to
            }
        }
    }
}

/// VAT rate classes; resolved through the same window table as exchange
/// rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatClass {
    /// Standard rate.
    Standard,
    /// Reduced rate (e.g., food, books).
    Reduced,
    /// Zero-rated goods.
    Zero,
}

impl std::fmt::Display for VatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "vat:standard"),
            Self::Reduced => write!(f, "vat:reduced"),
            Self::Zero => write!(f, "vat:zero"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use saldo_shared::types::Currency;

    fn window(from: (i32, u32, u32), to: Option<(i32, u32, u32)>) -> RateWindow<Currency> {
        RateWindow {
            id: RateWindowId::new(),
            key: Currency::Usd,
            rate: dec!(0.92),
            valid_from: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            valid_to: to.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            defined_at: Utc::now(),
        }
    }

    #[test]
    fn test_contains_half_open() {
        let w = window((2024, 1, 1), Some((2024, 12, 31)));
        assert!(w.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(w.contains(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(w.contains(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()));
        // valid_to is exclusive.
        assert!(!w.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn test_contains_open_ended() {
        let w = window((2024, 1, 1), None);
        assert!(w.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn test_overlaps() {
        let a = window((2024, 1, 1), Some((2024, 7, 1)));
        let b = window((2024, 6, 1), Some((2024, 12, 1)));
        let c = window((2024, 7, 1), Some((2024, 12, 1)));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Adjacent half-open windows do not overlap.
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_overlaps_open_ended() {
        let open = window((2024, 1, 1), None);
        let later = window((2025, 1, 1), Some((2026, 1, 1)));
        let earlier = window((2023, 1, 1), Some((2024, 1, 1)));
        assert!(open.overlaps(&later));
        assert!(!open.overlaps(&earlier));
        assert!(open.overlaps(&window((2030, 1, 1), None)));
    }
}
