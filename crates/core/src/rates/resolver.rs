//! Window selection and write-time overlap checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_shared::types::RateWindowId;

use crate::error::LedgerError;
use crate::rates::window::RateWindow;

/// Finds the window for `key` that contains `as_of`.
///
/// Write-time overlap checks keep at most one containing window per key,
/// but if bad data slips in anyway the most recently started window wins,
/// with `defined_at` breaking ties.
#[must_use]
pub fn resolve<'a, K: PartialEq>(
    windows: &'a [RateWindow<K>],
    key: &K,
    as_of: NaiveDate,
) -> Option<&'a RateWindow<K>> {
    windows
        .iter()
        .filter(|w| w.key == *key && w.contains(as_of))
        .max_by_key(|w| (w.valid_from, w.defined_at))
}

/// Resolves the rate for `key` on `as_of`, or fails with [`LedgerError::NoRate`].
///
/// There is deliberately no fallback rate: a missing window is a data
/// problem the caller must surface, not silently convert at 1.0.
pub fn resolve_rate<K>(
    windows: &[RateWindow<K>],
    key: &K,
    as_of: NaiveDate,
) -> Result<Decimal, LedgerError>
where
    K: PartialEq + std::fmt::Display,
{
    resolve(windows, key, as_of)
        .map(|w| w.rate)
        .ok_or_else(|| LedgerError::NoRate {
            key: key.to_string(),
            date: as_of,
        })
}

/// Validates a new window against the existing windows for the same table.
///
/// Returns the ids of open-ended windows that must be truncated to
/// `new.valid_from` before the insert: defining a newer rate closes the
/// previous open-ended one. Any other overlap is rejected outright.
pub fn plan_insert<K>(
    existing: &[RateWindow<K>],
    new: &RateWindow<K>,
) -> Result<Vec<RateWindowId>, LedgerError>
where
    K: PartialEq + std::fmt::Display,
{
    if new.rate <= Decimal::ZERO {
        return Err(LedgerError::InvalidRate);
    }
    if let Some(to) = new.valid_to {
        if to <= new.valid_from {
            return Err(LedgerError::EmptyRateWindow);
        }
    }

    let mut truncate = Vec::new();
    for window in existing.iter().filter(|w| w.key == new.key) {
        if !window.overlaps(new) {
            continue;
        }
        if window.valid_to.is_none() && window.valid_from < new.valid_from {
            truncate.push(window.id);
        } else {
            return Err(LedgerError::OverlappingRateWindow {
                key: new.key.to_string(),
            });
        }
    }
    Ok(truncate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use saldo_shared::types::Currency;

    use crate::rates::window::VatClass;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(
        key: Currency,
        rate: Decimal,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> RateWindow<Currency> {
        RateWindow {
            id: RateWindowId::new(),
            key,
            rate,
            valid_from: from,
            valid_to: to,
            defined_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_containing_window() {
        let windows = vec![
            window(
                Currency::Usd,
                dec!(0.95),
                date(2025, 1, 1),
                Some(date(2025, 6, 1)),
            ),
            window(Currency::Usd, dec!(0.92), date(2025, 6, 1), None),
            window(Currency::Gbp, dec!(1.17), date(2025, 1, 1), None),
        ];
        assert_eq!(
            resolve_rate(&windows, &Currency::Usd, date(2025, 3, 15)).unwrap(),
            dec!(0.95)
        );
        assert_eq!(
            resolve_rate(&windows, &Currency::Usd, date(2025, 6, 1)).unwrap(),
            dec!(0.92)
        );
        assert_eq!(
            resolve_rate(&windows, &Currency::Gbp, date(2025, 3, 15)).unwrap(),
            dec!(1.17)
        );
    }

    #[test]
    fn missing_window_is_no_rate_not_one() {
        let windows = vec![window(
            Currency::Usd,
            dec!(0.92),
            date(2025, 6, 1),
            Some(date(2025, 7, 1)),
        )];
        let err = resolve_rate(&windows, &Currency::Usd, date(2025, 5, 31)).unwrap_err();
        match err {
            LedgerError::NoRate { key, date: d } => {
                assert_eq!(key, "USD");
                assert_eq!(d, date(2025, 5, 31));
            }
            other => panic!("expected NoRate, got {other:?}"),
        }
        assert!(resolve_rate(&windows, &Currency::Usd, date(2025, 7, 1)).is_err());
    }

    #[test]
    fn most_recent_start_wins_among_bad_overlaps() {
        let older = window(Currency::Usd, dec!(0.90), date(2025, 1, 1), None);
        let newer = window(Currency::Usd, dec!(0.92), date(2025, 3, 1), None);
        let windows = vec![older, newer];
        assert_eq!(
            resolve_rate(&windows, &Currency::Usd, date(2025, 4, 1)).unwrap(),
            dec!(0.92)
        );
    }

    #[test]
    fn insert_rejects_nonpositive_rate_and_empty_window() {
        let zero = window(Currency::Usd, dec!(0), date(2025, 1, 1), None);
        assert!(matches!(
            plan_insert(&[], &zero),
            Err(LedgerError::InvalidRate)
        ));

        let inverted = window(
            Currency::Usd,
            dec!(0.92),
            date(2025, 6, 1),
            Some(date(2025, 6, 1)),
        );
        assert!(matches!(
            plan_insert(&[], &inverted),
            Err(LedgerError::EmptyRateWindow)
        ));
    }

    #[test]
    fn insert_truncates_older_open_ended_window() {
        let open = window(Currency::Usd, dec!(0.90), date(2025, 1, 1), None);
        let open_id = open.id;
        let new = window(Currency::Usd, dec!(0.92), date(2025, 6, 1), None);
        let truncate = plan_insert(&[open], &new).unwrap();
        assert_eq!(truncate, vec![open_id]);
    }

    #[test]
    fn insert_rejects_bounded_overlap() {
        let existing = window(
            Currency::Usd,
            dec!(0.90),
            date(2025, 1, 1),
            Some(date(2025, 6, 1)),
        );
        let new = window(
            Currency::Usd,
            dec!(0.92),
            date(2025, 5, 1),
            Some(date(2025, 8, 1)),
        );
        assert!(matches!(
            plan_insert(&[existing], &new),
            Err(LedgerError::OverlappingRateWindow { key }) if key == "USD"
        ));
    }

    #[test]
    fn insert_rejects_open_window_starting_inside_new() {
        // Open-ended truncation only applies when the existing window
        // started before the new one.
        let existing = window(Currency::Usd, dec!(0.90), date(2025, 7, 1), None);
        let new = window(Currency::Usd, dec!(0.92), date(2025, 6, 1), None);
        assert!(plan_insert(&[existing], &new).is_err());
    }

    #[test]
    fn insert_ignores_other_keys_and_adjacent_windows() {
        let other_key = window(Currency::Gbp, dec!(1.17), date(2025, 1, 1), None);
        let adjacent = window(
            Currency::Usd,
            dec!(0.90),
            date(2025, 1, 1),
            Some(date(2025, 6, 1)),
        );
        let new = window(Currency::Usd, dec!(0.92), date(2025, 6, 1), None);
        assert_eq!(plan_insert(&[other_key, adjacent], &new).unwrap(), vec![]);
    }

    #[test]
    fn vat_windows_share_the_resolver() {
        let windows = vec![RateWindow {
            id: RateWindowId::new(),
            key: VatClass::Reduced,
            rate: dec!(0.07),
            valid_from: date(2025, 1, 1),
            valid_to: None,
            defined_at: Utc::now(),
        }];
        assert_eq!(
            resolve_rate(&windows, &VatClass::Reduced, date(2025, 3, 1)).unwrap(),
            dec!(0.07)
        );
        let err = resolve_rate(&windows, &VatClass::Standard, date(2025, 3, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::NoRate { key, .. } if key == "vat:standard"));
    }
}
