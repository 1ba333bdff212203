//! Monthly income tax in the local currency.
//!
//! | Income currency | Formula |
//! |-----------------|---------|
//! | local (GEL)     | `round(income × percent / 100, 2)` |
//! | foreign         | `round(rate × income × percent / 100, 2)` |
//!
//! Rounding is half-up to two fractional digits. A foreign-currency
//! calculation needs the official rate of that currency for the income date.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxCalculator;
//! use tax_core::{Currency, ExchangeRate, TaxCalculationRequest};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let request = TaxCalculationRequest::new(dec!(500), dec!(20), Currency::Usd, date);
//! let rate = ExchangeRate::new(Currency::Usd, date, dec!(2.70));
//!
//! let result = TaxCalculator::calculate(&request, Some(&rate)).unwrap();
//!
//! assert_eq!(result.tax_amount, dec!(270.00));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::{Currency, ExchangeRate, TaxCalculationRequest, TaxCalculationResult};

/// Reasons a calculation produced no result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxCalculationError {
    /// Income is zero or negative.
    #[error("income amount must be positive, got {0}")]
    NonPositiveIncome(Decimal),

    /// Tax percent is zero or negative.
    #[error("tax percent must be positive, got {0}")]
    NonPositiveTaxPercent(Decimal),

    /// Foreign-currency income without an exchange rate.
    #[error("no exchange rate supplied for {0}")]
    MissingRate(Currency),

    /// The supplied rate is for another currency.
    #[error("exchange rate is for {actual}, expected {expected}")]
    RateCurrencyMismatch { expected: Currency, actual: Currency },

    /// The supplied rate is zero or negative.
    #[error("exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    /// The tax does not fit in a decimal.
    #[error("amount too large to calculate")]
    Overflow,
}

/// Stateless tax calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculator;

impl TaxCalculator {
    /// Calculates the tax owed for `request`.
    ///
    /// `rate` is ignored for local-currency income and required otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculationError`] when the income or percent is not
    /// positive, when a foreign-currency request has no usable rate, or when
    /// an intermediate product overflows.
    pub fn calculate(
        request: &TaxCalculationRequest,
        rate: Option<&ExchangeRate>,
    ) -> Result<TaxCalculationResult, TaxCalculationError> {
        Self::validate(request)?;

        let income_in_local = if request.currency.is_local() {
            request.income_amount
        } else {
            let rate = Self::usable_rate(request.currency, rate)?;
            rate.checked_mul(request.income_amount)
                .ok_or(TaxCalculationError::Overflow)?
        };
        let tax = percent_of(income_in_local, request.tax_percent)
            .ok_or(TaxCalculationError::Overflow)?;

        Ok(TaxCalculationResult {
            tax_amount: round_half_up(tax),
        })
    }

    /// Checks the numeric fields of a request.
    ///
    /// Zero counts as absent: no calculation is attempted for it.
    pub fn validate(request: &TaxCalculationRequest) -> Result<(), TaxCalculationError> {
        if request.income_amount <= Decimal::ZERO {
            return Err(TaxCalculationError::NonPositiveIncome(
                request.income_amount,
            ));
        }
        if request.tax_percent <= Decimal::ZERO {
            return Err(TaxCalculationError::NonPositiveTaxPercent(
                request.tax_percent,
            ));
        }
        Ok(())
    }

    fn usable_rate(
        currency: Currency,
        rate: Option<&ExchangeRate>,
    ) -> Result<Decimal, TaxCalculationError> {
        let rate = rate.ok_or(TaxCalculationError::MissingRate(currency))?;
        if rate.currency != currency {
            return Err(TaxCalculationError::RateCurrencyMismatch {
                expected: currency,
                actual: rate.currency,
            });
        }
        if rate.rate <= Decimal::ZERO {
            return Err(TaxCalculationError::NonPositiveRate(rate.rate));
        }
        Ok(rate.rate)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn request(
        income: Decimal,
        percent: Decimal,
        currency: Currency,
    ) -> TaxCalculationRequest {
        TaxCalculationRequest::new(income, percent, currency, date())
    }

    // =========================================================================
    // local currency
    // =========================================================================

    #[test]
    fn local_currency_one_percent_of_thousand() {
        let result = TaxCalculator::calculate(&request(dec!(1000), dec!(1), Currency::Gel), None)
            .unwrap();

        assert_eq!(result.tax_amount.to_string(), "10.00");
    }

    #[test]
    fn local_currency_ignores_supplied_rate() {
        let rate = ExchangeRate::new(Currency::Usd, date(), dec!(2.70));

        let result =
            TaxCalculator::calculate(&request(dec!(1000), dec!(1), Currency::Gel), Some(&rate))
                .unwrap();

        assert_eq!(result.tax_amount, dec!(10.00));
    }

    #[test]
    fn local_currency_rounds_half_up() {
        // 333.33 * 1.5% = 4.99995
        let result =
            TaxCalculator::calculate(&request(dec!(333.33), dec!(1.5), Currency::Gel), None)
                .unwrap();

        assert_eq!(result.tax_amount, dec!(5.00));
    }

    #[test]
    fn percent_above_hundred_is_not_capped() {
        let result =
            TaxCalculator::calculate(&request(dec!(100), dec!(150), Currency::Gel), None).unwrap();

        assert_eq!(result.tax_amount, dec!(150.00));
    }

    // =========================================================================
    // foreign currency
    // =========================================================================

    #[test]
    fn foreign_currency_applies_rate() {
        let rate = ExchangeRate::new(Currency::Usd, date(), dec!(2.70));

        let result =
            TaxCalculator::calculate(&request(dec!(500), dec!(20), Currency::Usd), Some(&rate))
                .unwrap();

        assert_eq!(result.tax_amount.to_string(), "270.00");
    }

    #[test]
    fn foreign_currency_large_income() {
        let rate = ExchangeRate::new(Currency::Usd, date(), dec!(2.70));

        let result =
            TaxCalculator::calculate(&request(dec!(5000), dec!(20), Currency::Usd), Some(&rate))
                .unwrap();

        assert_eq!(result.tax_amount, dec!(2700.00));
    }

    #[test]
    fn foreign_currency_rounds_product() {
        // 2.7182 * 1234.56 * 1% = 33.5578...
        let rate = ExchangeRate::new(Currency::Eur, date(), dec!(2.7182));

        let result =
            TaxCalculator::calculate(&request(dec!(1234.56), dec!(1), Currency::Eur), Some(&rate))
                .unwrap();

        assert_eq!(result.tax_amount, dec!(33.56));
    }

    #[test]
    fn foreign_currency_without_rate_fails() {
        let result = TaxCalculator::calculate(&request(dec!(500), dec!(20), Currency::Eur), None);

        assert_eq!(result, Err(TaxCalculationError::MissingRate(Currency::Eur)));
    }

    #[test]
    fn foreign_currency_with_rate_for_other_currency_fails() {
        let rate = ExchangeRate::new(Currency::Usd, date(), dec!(2.70));

        let result =
            TaxCalculator::calculate(&request(dec!(500), dec!(20), Currency::Eur), Some(&rate));

        assert_eq!(
            result,
            Err(TaxCalculationError::RateCurrencyMismatch {
                expected: Currency::Eur,
                actual: Currency::Usd,
            })
        );
    }

    #[test]
    fn zero_rate_fails() {
        let rate = ExchangeRate::new(Currency::Usd, date(), Decimal::ZERO);

        let result =
            TaxCalculator::calculate(&request(dec!(500), dec!(20), Currency::Usd), Some(&rate));

        assert_eq!(result, Err(TaxCalculationError::NonPositiveRate(Decimal::ZERO)));
    }

    // =========================================================================
    // extreme magnitudes
    // =========================================================================

    #[test]
    fn local_maximum_income_overflowing_percent_fails() {
        let result =
            TaxCalculator::calculate(&request(Decimal::MAX, dec!(50), Currency::Gel), None);

        assert_eq!(result, Err(TaxCalculationError::Overflow));
    }

    #[test]
    fn local_maximum_income_at_one_percent_succeeds() {
        let result = TaxCalculator::calculate(&request(Decimal::MAX, dec!(1), Currency::Gel), None);

        assert!(result.is_ok(), "expected Ok, got {result:?}");
    }

    #[test]
    fn foreign_income_overflowing_conversion_fails() {
        let rate = ExchangeRate::new(Currency::Usd, date(), dec!(2.70));

        let income: Decimal = "50000000000000000000000000000".parse().unwrap();

        let result =
            TaxCalculator::calculate(&request(income, dec!(1), Currency::Usd), Some(&rate));

        assert_eq!(result, Err(TaxCalculationError::Overflow));
    }

    // =========================================================================
    // absent inputs
    // =========================================================================

    #[test]
    fn zero_percent_is_rejected_for_every_currency() {
        for currency in Currency::all() {
            let rate = ExchangeRate::new(*currency, date(), dec!(1));
            let result =
                TaxCalculator::calculate(&request(dec!(500), Decimal::ZERO, *currency), Some(&rate));

            assert_eq!(
                result,
                Err(TaxCalculationError::NonPositiveTaxPercent(Decimal::ZERO))
            );
        }
    }

    #[test]
    fn zero_income_is_rejected() {
        let result = TaxCalculator::calculate(&request(Decimal::ZERO, dec!(5), Currency::Gel), None);

        assert_eq!(result, Err(TaxCalculationError::NonPositiveIncome(Decimal::ZERO)));
    }

    #[test]
    fn negative_income_is_rejected() {
        let result = TaxCalculator::calculate(&request(dec!(-10), dec!(5), Currency::Gel), None);

        assert_eq!(result, Err(TaxCalculationError::NonPositiveIncome(dec!(-10))));
    }
}
