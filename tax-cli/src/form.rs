//! Raw inputs of the calculator screen.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tax_core::{Currency, TaxCalculationRequest};

/// Trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a strictly positive [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`). Empty,
/// unparsable, zero and negative input all count as absent.
pub fn parse_positive_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return None;
    }
    match normalized.parse::<Decimal>() {
        Ok(value) if value > Decimal::ZERO => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(input = %s, "invalid decimal: {}", e);
            None
        }
    }
}

/// The four inputs, kept as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorForm {
    pub income: String,
    pub percent: String,
    pub currency: Currency,
    pub date: NaiveDate,
}

impl CalculatorForm {
    /// Empty form in US dollars, dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            income: String::new(),
            percent: String::new(),
            currency: Currency::Usd,
            date: today,
        }
    }

    pub fn income_amount(&self) -> Option<Decimal> {
        parse_positive_decimal(&self.income)
    }

    pub fn tax_percent(&self) -> Option<Decimal> {
        parse_positive_decimal(&self.percent)
    }

    pub fn is_complete(&self) -> bool {
        self.to_request().is_some()
    }

    /// The calculation request, once every input is present.
    pub fn to_request(&self) -> Option<TaxCalculationRequest> {
        Some(TaxCalculationRequest::new(
            self.income_amount()?,
            self.tax_percent()?,
            self.currency,
            self.date,
        ))
    }
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}
