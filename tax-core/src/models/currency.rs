use std::fmt;

use serde::{Deserialize, Serialize};

/// Currencies the calculator accepts.
///
/// `Gel` is the local currency: tax on GEL income needs no exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Gel,
    Usd,
    Eur,
    Gbp,
    Chf,
    Try,
    Rub,
    Uah,
    Amd,
    Azn,
    Jpy,
}

/// The currency tax amounts are expressed in.
pub const LOCAL_CURRENCY: Currency = Currency::Gel;

impl Currency {
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Gel,
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Chf,
            Currency::Try,
            Currency::Rub,
            Currency::Uah,
            Currency::Amd,
            Currency::Azn,
            Currency::Jpy,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gel => "GEL",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Chf => "CHF",
            Self::Try => "TRY",
            Self::Rub => "RUB",
            Self::Uah => "UAH",
            Self::Amd => "AMD",
            Self::Azn => "AZN",
            Self::Jpy => "JPY",
        }
    }

    /// Parses an ISO 4217 code. Matching is case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GEL" => Some(Self::Gel),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            "CHF" => Some(Self::Chf),
            "TRY" => Some(Self::Try),
            "RUB" => Some(Self::Rub),
            "UAH" => Some(Self::Uah),
            "AMD" => Some(Self::Amd),
            "AZN" => Some(Self::Azn),
            "JPY" => Some(Self::Jpy),
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        *self == LOCAL_CURRENCY
    }
}

impl fmt::Display for Currency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
