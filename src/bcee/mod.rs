pub mod format;
pub mod rates;

pub use format::*;
pub use rates::*;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CurrencyError {
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
}

/// Price shown in the viewer's currency next to the listed one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPrice {
    pub original: f64,
    pub original_currency: &'static str,
    pub converted: f64,
    pub currency: &'static str,
    pub rate: f64,
    pub formatted_original: String,
    pub formatted_converted: String,
    /// Static rates are indicative, so any cross-currency figure is approximate
    pub approximate: bool,
}
