mod currency;
mod exchange_rate;
mod tax_calculation;

pub use currency::{Currency, LOCAL_CURRENCY};
pub use exchange_rate::ExchangeRate;
pub use tax_calculation::{CalculationRecord, TaxCalculationRequest, TaxCalculationResult};
