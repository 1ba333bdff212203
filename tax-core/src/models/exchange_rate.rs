use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Official rate of one unit of `currency`, in the local currency, on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub currency: Currency,
    pub date: NaiveDate,
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn new(
        currency: Currency,
        date: NaiveDate,
        rate: Decimal,
    ) -> Self {
        Self {
            currency,
            date,
            rate,
        }
    }
}
