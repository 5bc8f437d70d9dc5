//! Exchange rate and VAT rate window management.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use saldo_core::rates::{self, RateWindow, VatClass};
use saldo_core::LedgerError;
use saldo_shared::types::{Currency, RateWindowId, TenantContext};

use crate::repo::LedgerRepository;

/// Manages date-effective rate windows.
pub struct RateService<R> {
    repo: Arc<R>,
}

impl<R: LedgerRepository> RateService<R> {
    /// Creates the service on top of a repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Defines an exchange rate window: 1 unit of `currency` equals
    /// `rate` units of the tenant base currency over
    /// `[valid_from, valid_to)`. An older open-ended window for the same
    /// currency is truncated at `valid_from`; other overlaps are
    /// rejected.
    pub async fn set_exchange_rate(
        &self,
        ctx: &TenantContext,
        currency: Currency,
        rate: Decimal,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> Result<RateWindow<Currency>, LedgerError> {
        let window = RateWindow {
            id: RateWindowId::new(),
            key: currency,
            rate,
            valid_from,
            valid_to,
            defined_at: Utc::now(),
        };
        let window = self.repo.insert_exchange_window(ctx, window).await?;
        info!(currency = %currency, rate = %rate, valid_from = %valid_from, "Defined exchange rate window");
        Ok(window)
    }

    /// Lists all exchange rate windows.
    pub async fn list_exchange_rates(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<Currency>>, LedgerError> {
        self.repo.list_exchange_windows(ctx).await
    }

    /// Resolves the exchange rate for `currency` on `as_of`. The base
    /// currency is always 1; any other currency needs a covering window.
    pub async fn resolve_exchange_rate(
        &self,
        ctx: &TenantContext,
        currency: Currency,
        as_of: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        if currency == self.repo.base_currency(ctx).await? {
            return Ok(Decimal::ONE);
        }
        let windows = self.repo.list_exchange_windows(ctx).await?;
        rates::resolve_rate(&windows, &currency, as_of)
    }

    /// Defines a VAT rate window for a VAT class, under the same overlap
    /// policy as exchange rates.
    pub async fn set_vat_rate(
        &self,
        ctx: &TenantContext,
        class: VatClass,
        rate: Decimal,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> Result<RateWindow<VatClass>, LedgerError> {
        let window = RateWindow {
            id: RateWindowId::new(),
            key: class,
            rate,
            valid_from,
            valid_to,
            defined_at: Utc::now(),
        };
        let window = self.repo.insert_vat_window(ctx, window).await?;
        info!(class = %class, rate = %rate, valid_from = %valid_from, "Defined VAT rate window");
        Ok(window)
    }

    /// Lists all VAT rate windows.
    pub async fn list_vat_rates(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<RateWindow<VatClass>>, LedgerError> {
        self.repo.list_vat_windows(ctx).await
    }

    /// Resolves the VAT rate for a class on `as_of`.
    pub async fn resolve_vat_rate(
        &self,
        ctx: &TenantContext,
        class: VatClass,
        as_of: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let windows = self.repo.list_vat_windows(ctx).await?;
        rates::resolve_rate(&windows, &class, as_of)
    }
}

#[cfg(test)]
#[path = "rates_tests.rs"]
mod tests;
