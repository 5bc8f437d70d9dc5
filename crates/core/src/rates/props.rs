//! Property suites for window resolution and the insert policy.

use chrono::{Days, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use saldo_shared::types::{Currency, RateWindowId};

use super::resolver::{plan_insert, resolve};
use super::window::RateWindow;

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..2000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn window_strategy() -> impl Strategy<Value = RateWindow<Currency>> {
    (day_strategy(), prop::option::of(1u64..400), 1i64..10_000).prop_map(
        |(valid_from, span, rate)| RateWindow {
            id: RateWindowId::new(),
            key: Currency::Usd,
            rate: Decimal::new(rate, 4),
            valid_from,
            valid_to: span.map(|days| {
                valid_from
                    .checked_add_days(Days::new(days))
                    .unwrap()
            }),
            defined_at: Utc::now(),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Resolution never returns a window that does not contain the date,
    /// whatever the (possibly overlapping) window table looks like.
    #[test]
    fn prop_resolution_only_picks_containing_windows(
        windows in prop::collection::vec(window_strategy(), 0..12),
        as_of in day_strategy(),
    ) {
        match resolve(&windows, &Currency::Usd, as_of) {
            Some(window) => {
                prop_assert!(window.contains(as_of));
                prop_assert_eq!(window.key, Currency::Usd);
            }
            None => {
                prop_assert!(windows.iter().all(|w| !w.contains(as_of)));
            }
        }
    }

    /// Growing a table only through `plan_insert` keeps the windows of a
    /// key pairwise disjoint, so any date has at most one covering window.
    #[test]
    fn prop_insert_policy_keeps_windows_disjoint(
        candidates in prop::collection::vec(window_strategy(), 1..10),
        as_of in day_strategy(),
    ) {
        let mut windows: Vec<RateWindow<Currency>> = Vec::new();
        for candidate in candidates {
            if let Ok(truncate) = plan_insert(&windows, &candidate) {
                for window in windows.iter_mut().filter(|w| truncate.contains(&w.id)) {
                    window.valid_to = Some(candidate.valid_from);
                }
                windows.push(candidate);
            }
        }

        for (i, a) in windows.iter().enumerate() {
            for b in &windows[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
        let covering = windows.iter().filter(|w| w.contains(as_of)).count();
        prop_assert!(covering <= 1);
    }
}
