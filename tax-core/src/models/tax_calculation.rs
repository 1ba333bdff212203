use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, ExchangeRate};

/// Validated input of a single monthly tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationRequest {
    /// Monthly income, in `currency`.
    pub income_amount: Decimal,
    /// Tax rate as a percentage (`20` means 20%).
    pub tax_percent: Decimal,
    pub currency: Currency,
    /// Date the income was received; selects the exchange rate.
    pub reference_date: NaiveDate,
}

impl TaxCalculationRequest {
    pub fn new(
        income_amount: Decimal,
        tax_percent: Decimal,
        currency: Currency,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            income_amount,
            tax_percent,
            currency,
            reference_date,
        }
    }

    pub fn needs_exchange_rate(&self) -> bool {
        !self.currency.is_local()
    }
}

/// Tax owed, in the local currency, with exactly two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub tax_amount: Decimal,
}

impl fmt::Display for TaxCalculationResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "₾ {}", self.tax_amount)
    }
}

/// Document written to the calculation sink after a remote-rate calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub income_amount: Decimal,
    pub income_date: NaiveDate,
    pub currency: Currency,
    /// Rate used for the conversion.
    pub rate: Decimal,
    pub tax_amount: Decimal,
}

impl CalculationRecord {
    pub fn new(
        request: &TaxCalculationRequest,
        rate: &ExchangeRate,
        result: &TaxCalculationResult,
    ) -> Self {
        Self {
            income_amount: request.income_amount,
            income_date: request.reference_date,
            currency: request.currency,
            rate: rate.rate,
            tax_amount: result.tax_amount,
        }
    }
}
