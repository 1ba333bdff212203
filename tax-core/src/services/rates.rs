use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Currency, ExchangeRate};

/// Why an exchange rate could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("Rate service returned HTTP {0}")]
    Status(u16),

    /// The service has no rate for this currency on this date.
    #[error("No rate published for {currency} on {date}")]
    MissingData { currency: Currency, date: NaiveDate },

    /// The response did not have the expected shape.
    #[error("Malformed rate response: {0}")]
    Malformed(String),
}

/// Source of official exchange rates.
///
/// One call is one outbound request; implementations do not retry.
#[async_trait]
pub trait RateService: Send + Sync {
    async fn fetch_rate(
        &self,
        currency: Currency,
        date: NaiveDate,
    ) -> Result<ExchangeRate, RateError>;
}
