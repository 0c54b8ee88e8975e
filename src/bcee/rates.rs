use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::{format_amount, CurrencyError, DisplayPrice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Digits after the decimal point
    pub minor_units: u8,
    /// Units of this currency per US dollar
    pub per_usd: f64,
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    minor_units: u8,
    per_usd: f64,
) -> CurrencyInfo {
    CurrencyInfo { code, name, symbol, minor_units, per_usd }
}

static CURRENCIES: [CurrencyInfo; 13] = [
    currency("USD", "US Dollar", "$", 2, 1.0),
    currency("CAD", "Canadian Dollar", "CA$", 2, 1.36),
    currency("GBP", "British Pound", "£", 2, 0.79),
    currency("EUR", "Euro", "€", 2, 0.92),
    currency("NGN", "Nigerian Naira", "₦", 2, 1550.0),
    currency("GHS", "Ghanaian Cedi", "GH₵", 2, 15.2),
    currency("KES", "Kenyan Shilling", "KSh", 2, 129.0),
    currency("ZAR", "South African Rand", "R", 2, 18.1),
    currency("JMD", "Jamaican Dollar", "J$", 2, 156.0),
    currency("TTD", "Trinidad and Tobago Dollar", "TT$", 2, 6.78),
    currency("BBD", "Barbadian Dollar", "Bds$", 2, 2.0),
    currency("XOF", "West African CFA Franc", "CFA", 0, 603.0),
    currency("BRL", "Brazilian Real", "R$", 2, 5.05),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static CurrencyInfo>> =
    Lazy::new(|| CURRENCIES.iter().map(|c| (c.code, c)).collect());

static REGION_CURRENCY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("US", "USD"),
        ("CA", "CAD"),
        ("GB", "GBP"),
        ("UK", "GBP"),
        ("FR", "EUR"),
        ("DE", "EUR"),
        ("NL", "EUR"),
        ("NG", "NGN"),
        ("GH", "GHS"),
        ("KE", "KES"),
        ("ZA", "ZAR"),
        ("JM", "JMD"),
        ("TT", "TTD"),
        ("BB", "BBD"),
        ("SN", "XOF"),
        ("CI", "XOF"),
        ("BR", "BRL"),
    ]
    .into_iter()
    .collect()
});

/// Currency conversion and display over the static rate table
#[derive(Debug, Clone)]
pub struct CurrencyService {
    default_currency: &'static CurrencyInfo,
}

impl CurrencyService {
    /// Fails when the configured default is not in the table.
    pub fn new(default_currency: &str) -> Result<Self, CurrencyError> {
        Ok(Self { default_currency: lookup(default_currency)? })
    }

    pub fn default_currency(&self) -> &'static CurrencyInfo {
        self.default_currency
    }

    pub fn supported(&self) -> &'static [CurrencyInfo] {
        &CURRENCIES
    }

    pub fn info(&self, code: &str) -> Result<&'static CurrencyInfo, CurrencyError> {
        lookup(code)
    }

    /// Rate to multiply an amount in `from` by to get `to`
    pub fn rate(&self, from: &str, to: &str) -> Result<f64, CurrencyError> {
        let from = lookup(from)?;
        let to = lookup(to)?;
        if from.code == to.code {
            return Ok(1.0);
        }
        Ok(to.per_usd / from.per_usd)
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, CurrencyError> {
        check_amount(amount)?;
        Ok(amount * self.rate(from, to)?)
    }

    pub fn format(&self, amount: f64, code: &str) -> Result<String, CurrencyError> {
        let info = lookup(code)?;
        if !amount.is_finite() {
            return Err(CurrencyError::InvalidAmount(amount));
        }
        Ok(format_amount(amount, info))
    }

    pub fn display_price(&self, amount: f64, from: &str, to: &str) -> Result<DisplayPrice, CurrencyError> {
        check_amount(amount)?;
        let from_info = lookup(from)?;
        let to_info = lookup(to)?;
        let rate = self.rate(from, to)?;
        let converted = amount * rate;
        debug!(from = from_info.code, to = to_info.code, rate, "price converted");

        Ok(DisplayPrice {
            original: amount,
            original_currency: from_info.code,
            converted,
            currency: to_info.code,
            rate,
            formatted_original: format_amount(amount, from_info),
            formatted_converted: format_amount(converted, to_info),
            approximate: from_info.code != to_info.code,
        })
    }

    /// Default currency for an ISO country code, or the service default.
    pub fn currency_for_region(&self, region: &str) -> &'static CurrencyInfo {
        REGION_CURRENCY
            .get(region.trim().to_ascii_uppercase().as_str())
            .and_then(|code| BY_CODE.get(code).copied())
            .unwrap_or(self.default_currency)
    }
}

fn lookup(code: &str) -> Result<&'static CurrencyInfo, CurrencyError> {
    BY_CODE
        .get(code.trim().to_ascii_uppercase().as_str())
        .copied()
        .ok_or_else(|| CurrencyError::UnsupportedCurrency(code.to_string()))
}

fn check_amount(amount: f64) -> Result<(), CurrencyError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CurrencyError::InvalidAmount(amount));
    }
    Ok(())
}
