//! End-to-end calculation workflow.
//!
//! Local-currency income is calculated immediately. Foreign-currency income
//! first needs the official rate for the income date, fetched with exactly
//! one request. When that succeeds and the user is signed in, the
//! calculation is handed to the configured sink in a background task.
//!
//! Recording is best-effort and non-blocking: a failed write is logged,
//! never retried, and never changes the returned result.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::calculations::{TaxCalculationError, TaxCalculator};
use crate::db::CalculationRepository;
use crate::models::{CalculationRecord, ExchangeRate, TaxCalculationRequest, TaxCalculationResult};

use super::{RateError, RateService, Session};

/// Why a calculation did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationFailure {
    #[error("exchange rate lookup failed: {0}")]
    RateLookup(#[from] RateError),

    #[error(transparent)]
    Calculation(#[from] TaxCalculationError),
}

/// A completed calculation.
#[derive(Debug)]
pub struct CalculationOutcome {
    pub result: TaxCalculationResult,
    /// Rate used, for foreign-currency income.
    pub rate: Option<ExchangeRate>,
    /// Background write to the sink, if one was started.
    ///
    /// Dropping the handle detaches the task; await it only to keep a
    /// short-lived process alive until the write finishes.
    pub recording: Option<JoinHandle<()>>,
}

pub struct TaxService {
    rates: Arc<dyn RateService>,
    sink: Option<Arc<dyn CalculationRepository>>,
}

impl TaxService {
    pub fn new(rates: Arc<dyn RateService>) -> Self {
        Self { rates, sink: None }
    }

    /// Sets the sink that receives calculations of signed-in users.
    pub fn with_sink(
        mut self,
        sink: Arc<dyn CalculationRepository>,
    ) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Calculates the tax for `request`.
    ///
    /// # Errors
    ///
    /// [`CalculationFailure::Calculation`] for absent inputs (checked before
    /// any request is made) and [`CalculationFailure::RateLookup`] when the
    /// rate service fails.
    pub async fn calculate(
        &self,
        request: &TaxCalculationRequest,
        session: &Session,
    ) -> Result<CalculationOutcome, CalculationFailure> {
        if !request.needs_exchange_rate() {
            let result = TaxCalculator::calculate(request, None)?;
            info!(tax = %result.tax_amount, currency = %request.currency, "calculated tax");
            return Ok(CalculationOutcome {
                result,
                rate: None,
                recording: None,
            });
        }

        TaxCalculator::validate(request)?;

        debug!(currency = %request.currency, date = %request.reference_date, "fetching exchange rate");
        let rate = self
            .rates
            .fetch_rate(request.currency, request.reference_date)
            .await
            .inspect_err(|error| warn!(%error, "exchange rate lookup failed"))?;

        let result = TaxCalculator::calculate(request, Some(&rate))?;
        info!(
            tax = %result.tax_amount,
            currency = %request.currency,
            rate = %rate.rate,
            "calculated tax"
        );

        let recording = self.record(CalculationRecord::new(request, &rate, &result), session);

        Ok(CalculationOutcome {
            result,
            rate: Some(rate),
            recording,
        })
    }

    fn record(
        &self,
        record: CalculationRecord,
        session: &Session,
    ) -> Option<JoinHandle<()>> {
        if !session.is_authenticated() {
            return None;
        }
        let sink = self.sink.clone()?;

        Some(tokio::spawn(async move {
            match sink.record_calculation(&record).await {
                Ok(()) => debug!(currency = %record.currency, "recorded calculation"),
                Err(error) => error!(%error, "failed to record calculation"),
            }
        }))
    }
}
