//! Collaborators of the calculator and the workflow that ties them together.

pub mod messages;
pub mod rates;
pub mod session;
pub mod tax_service;

pub use messages::{MessageError, MessageService, load_server_message};
pub use rates::{RateError, RateService};
pub use session::Session;
pub use tax_service::{CalculationFailure, CalculationOutcome, TaxService};
