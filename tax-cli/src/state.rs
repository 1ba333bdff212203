//! State of the calculator screen.
//!
//! The screen owns the form and moves through [`ScreenState`] as inputs are
//! edited and calculations run:
//!
//! ```text
//!          edit (complete)            begin                 finish(Ok)
//!   Idle ------------------> Ready ---------> Loading ------------------> Result
//!     ^  <------------------   ^                 |
//!     |   edit (incomplete)    |                 | finish(Err)
//!     |                        |     begin       v
//!     |                        +-- (retry) --- Failed
//!     +--------------- any edit from any state ---------------+
//! ```
//!
//! Every edit invalidates the running calculation, so a completion that
//! arrives after the user changed an input is dropped.

use chrono::NaiveDate;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use tax_core::services::{
    CalculationFailure, MessageService, Session, TaxService, load_server_message,
};
use tax_core::{Currency, TaxCalculationRequest, TaxCalculationResult};

use crate::form::CalculatorForm;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// Some input is missing; nothing can be calculated.
    #[default]
    Idle,
    /// Inputs are complete; a calculation may start.
    Ready,
    Loading,
    Result(TaxCalculationResult),
    /// The last calculation failed; it may be started again.
    Failed,
}

/// Why a calculation cannot start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScreenError {
    #[error("Income and tax percent must both be positive numbers")]
    Incomplete,

    #[error("A calculation is already running")]
    Busy,

    #[error("Result already shown; change an input to calculate again")]
    AlreadyCalculated,
}

/// Identifies one calculation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct CalculatorScreen {
    form: CalculatorForm,
    state: ScreenState,
    server_message: Option<String>,
    generation: u64,
}

impl CalculatorScreen {
    pub fn new(form: CalculatorForm) -> Self {
        let mut screen = Self {
            form,
            ..Default::default()
        };
        screen.edited();
        screen
    }

    pub fn form(&self) -> &CalculatorForm {
        &self.form
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn result(&self) -> Option<&TaxCalculationResult> {
        match &self.state {
            ScreenState::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    pub fn set_income(
        &mut self,
        income: impl Into<String>,
    ) {
        self.form.income = income.into();
        self.edited();
    }

    pub fn set_percent(
        &mut self,
        percent: impl Into<String>,
    ) {
        self.form.percent = percent.into();
        self.edited();
    }

    pub fn set_currency(
        &mut self,
        currency: Currency,
    ) {
        self.form.currency = currency;
        self.edited();
    }

    pub fn set_date(
        &mut self,
        date: NaiveDate,
    ) {
        self.form.date = date;
        self.edited();
    }

    fn edited(&mut self) {
        self.generation += 1;
        self.state = if self.form.is_complete() {
            ScreenState::Ready
        } else {
            ScreenState::Idle
        };
    }

    /// Whether the calculate action is offered.
    pub fn can_invoke(&self) -> bool {
        matches!(self.state, ScreenState::Ready | ScreenState::Failed)
    }

    /// Moves to `Loading` and hands out the request to run.
    pub fn begin_calculation(&mut self) -> Result<(Ticket, TaxCalculationRequest), ScreenError> {
        match self.state {
            ScreenState::Ready | ScreenState::Failed => {}
            ScreenState::Idle => return Err(ScreenError::Incomplete),
            ScreenState::Loading => return Err(ScreenError::Busy),
            ScreenState::Result(_) => return Err(ScreenError::AlreadyCalculated),
        }
        let request = self.form.to_request().ok_or(ScreenError::Incomplete)?;

        self.generation += 1;
        self.state = ScreenState::Loading;
        Ok((Ticket(self.generation), request))
    }

    /// Applies the outcome of the run identified by `ticket`.
    ///
    /// Returns `false`, leaving the screen untouched, when the ticket is no
    /// longer current.
    pub fn finish_calculation(
        &mut self,
        ticket: Ticket,
        outcome: Result<TaxCalculationResult, CalculationFailure>,
    ) -> bool {
        if ticket.0 != self.generation || self.state != ScreenState::Loading {
            debug!(?ticket, "dropping stale calculation result");
            return false;
        }

        self.state = match outcome {
            Ok(result) => ScreenState::Result(result),
            Err(_) => ScreenState::Failed,
        };
        true
    }

    /// Runs one calculation through `service`.
    ///
    /// Returns the background task recording the calculation, if one was
    /// started.
    pub async fn submit(
        &mut self,
        service: &TaxService,
        session: &Session,
    ) -> Result<Option<JoinHandle<()>>, ScreenError> {
        let (ticket, request) = self.begin_calculation()?;

        match service.calculate(&request, session).await {
            Ok(outcome) => {
                self.finish_calculation(ticket, Ok(outcome.result));
                Ok(outcome.recording)
            }
            Err(failure) => {
                self.finish_calculation(ticket, Err(failure));
                Ok(None)
            }
        }
    }

    pub fn set_server_message(
        &mut self,
        message: Option<String>,
    ) {
        self.server_message = message.filter(|m| !m.trim().is_empty());
    }

    /// Fetches the banner for `session` and shows it.
    pub async fn load_server_message(
        &mut self,
        session: &Session,
        service: &dyn MessageService,
    ) {
        let message = load_server_message(session, service).await;
        self.set_server_message(message);
    }
}
