//! National Bank of Georgia official exchange rates.
//!
//! `GET {base}?currencies=USD&date=2024-01-31` answers with
//!
//! ```json
//! [{ "date": "2024-01-31T00:00:00.000Z",
//!    "currencies": [{ "code": "USD", "quantity": 1, "rate": "2.6800", ... }] }]
//! ```
//!
//! `rate` is the price in GEL of `quantity` units; it arrives either as a
//! string or as a number. Only the first day and its first currency are read.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tax_core::services::{RateError, RateService};
use tax_core::{Currency, ExchangeRate};
use tracing::debug;

use crate::client::{http_client, snippet};

/// Public rates endpoint.
pub const NBG_RATES_URL: &str = "https://nbg.gov.ge/gw/api/ct/monetarypolicy/currencies/";

#[derive(Debug, Deserialize)]
struct RateDay {
    currencies: Vec<CurrencyRate>,
}

#[derive(Debug, Deserialize)]
struct CurrencyRate {
    code: Option<String>,
    quantity: Option<u32>,
    rate: Value,
}

/// [`RateService`] backed by the NBG API.
pub struct NbgRateClient {
    client: Client,
    base_url: String,
}

impl NbgRateClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
        }
    }

    /// URL of the rate for `currency` on `date`.
    pub fn rate_url(
        &self,
        currency: Currency,
        date: NaiveDate,
    ) -> Result<Url, RateError> {
        let date = date.format("%Y-%m-%d").to_string();
        Url::parse_with_params(
            &self.base_url,
            &[("currencies", currency.as_str()), ("date", date.as_str())],
        )
        .map_err(|e| RateError::Network(format!("invalid rate service URL '{}': {e}", self.base_url)))
    }
}

impl Default for NbgRateClient {
    fn default() -> Self {
        Self::new(NBG_RATES_URL, crate::client::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl RateService for NbgRateClient {
    async fn fetch_rate(
        &self,
        currency: Currency,
        date: NaiveDate,
    ) -> Result<ExchangeRate, RateError> {
        let url = self.rate_url(currency, date)?;
        debug!(%url, "requesting exchange rate");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RateError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, body = %snippet(&body), "rate service error");
            return Err(RateError::Status(status.as_u16()));
        }

        parse_rate_response(&body, currency, date)
    }
}

/// Extracts the per-unit rate of `currency` from a rates response body.
///
/// # Errors
/// * [`RateError::MissingData`] when the day or currency list is empty.
/// * [`RateError::Malformed`] for any other unexpected shape, a rate that is
///   not a positive number, or a rate quoted for a different currency.
pub fn parse_rate_response(
    body: &str,
    currency: Currency,
    date: NaiveDate,
) -> Result<ExchangeRate, RateError> {
    let days: Vec<RateDay> =
        serde_json::from_str(body).map_err(|e| RateError::Malformed(e.to_string()))?;

    let quote = days
        .into_iter()
        .next()
        .and_then(|day| day.currencies.into_iter().next())
        .ok_or(RateError::MissingData { currency, date })?;

    if let Some(code) = &quote.code {
        if Currency::parse(code) != Some(currency) {
            return Err(RateError::Malformed(format!(
                "expected a {currency} rate, got {code}"
            )));
        }
    }

    let rate = decimal_from_json(&quote.rate).ok_or_else(|| {
        RateError::Malformed(format!("rate is not a number: {}", quote.rate))
    })?;
    if rate <= Decimal::ZERO {
        return Err(RateError::Malformed(format!("rate must be positive, got {rate}")));
    }

    let quantity = match quote.quantity {
        Some(0) => return Err(RateError::Malformed("quantity must not be zero".to_string())),
        Some(quantity) => Decimal::from(quantity),
        None => Decimal::ONE,
    };

    Ok(ExchangeRate::new(currency, date, rate / quantity))
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
