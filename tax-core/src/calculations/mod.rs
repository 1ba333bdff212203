//! Tax calculation logic.
//!
//! [`income_tax`] turns a validated request (and, for foreign-currency
//! income, an exchange rate) into the tax owed in the local currency.

pub mod common;
pub mod income_tax;

pub use income_tax::{TaxCalculationError, TaxCalculator};
