//! Monetary amounts as reported by the Storefront API.
//!
//! Shopify returns `Decimal` scalars as strings. The string is kept verbatim so
//! prices render exactly as the upstream formatted them; [`Money::amount_decimal`]
//! parses it when arithmetic is needed.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency used when the upstream omits one (e.g. a cart without tax lines).
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// Errors raised when constructing or parsing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("invalid decimal amount: {0}")]
    InvalidAmount(String),
    #[error("negative amount: {0}")]
    NegativeAmount(String),
    #[error("invalid ISO 4217 currency code: {0}")]
    InvalidCurrencyCode(String),
}

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a validated money value.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if the amount is not a non-negative decimal or the
    /// currency code is not three ASCII uppercase letters.
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Result<Self, MoneyError> {
        let money = Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        };
        money.validate()?;
        Ok(money)
    }

    /// A zero amount in the given currency, formatted the way Shopify does (`"0.0"`).
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self {
            amount: "0.0".to_string(),
            currency_code: currency_code.into(),
        }
    }

    /// Parse the amount as a decimal.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the string is not a decimal number.
    pub fn amount_decimal(&self) -> Result<Decimal, MoneyError> {
        Decimal::from_str(&self.amount).map_err(|_| MoneyError::InvalidAmount(self.amount.clone()))
    }

    /// Check the amount and currency code invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), MoneyError> {
        if self.amount_decimal()?.is_sign_negative() {
            return Err(MoneyError::NegativeAmount(self.amount.clone()));
        }

        let code = self.currency_code.as_bytes();
        if code.len() != 3 || !code.iter().all(u8::is_ascii_uppercase) {
            return Err(MoneyError::InvalidCurrencyCode(self.currency_code.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_uses_shopify_format() {
        let zero = Money::zero(DEFAULT_CURRENCY_CODE);
        assert_eq!(zero.amount, "0.0");
        assert_eq!(zero.currency_code, "USD");
        assert_eq!(zero.amount_decimal().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_new_accepts_valid_money() {
        let money = Money::new("19.99", "EUR").unwrap();
        assert_eq!(money.amount_decimal().unwrap(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_new_rejects_negative_amount() {
        assert_eq!(
            Money::new("-1.00", "USD"),
            Err(MoneyError::NegativeAmount("-1.00".to_string()))
        );
    }

    #[test]
    fn test_new_rejects_garbage_amount() {
        assert!(matches!(
            Money::new("ten dollars", "USD"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_currency_code() {
        assert!(matches!(
            Money::new("1.00", "usd"),
            Err(MoneyError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            Money::new("1.00", "DOLLAR"),
            Err(MoneyError::InvalidCurrencyCode(_))
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Money::zero("CAD")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "amount": "0.0", "currencyCode": "CAD" })
        );
    }
}
