//! Price values as they travel between the store, the admin form and the
//! estimate engine.
//!
//! A price is `Option<Decimal>`: `None` is "not configured" and is kept
//! distinct from an explicit zero. The store writes an unset price as the
//! empty string `""` and a configured one as a JSON number.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;

/// A single price leaf: configured amount or unset.
pub type Price = Option<Decimal>;

/// Interprets a raw store leaf as a price.
///
/// Numbers and numeric strings are accepted. Empty strings, `null`, other
/// JSON types, unparseable strings and negative amounts are all unset.
#[must_use]
pub fn price_from_value(value: &Value) -> Price {
    let amount = match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Decimal::from_str(trimmed).ok()
            }
        }
        _ => None,
    }?;

    if amount.is_sign_negative() && !amount.is_zero() {
        tracing::debug!(%amount, "negative price treated as unset");
        return None;
    }
    Some(amount)
}

/// Renders a price the way the store keeps it: a JSON number, or `""` when unset.
#[must_use]
pub fn price_to_value(price: Price) -> Value {
    match price {
        None => Value::String(String::new()),
        Some(amount) => decimal_to_value(amount),
    }
}

/// Renders an amount as a JSON number, integral when it has no fraction.
#[must_use]
pub fn decimal_to_value(amount: Decimal) -> Value {
    if amount.fract().is_zero() {
        if let Some(n) = amount.to_i64() {
            return Value::from(n);
        }
    }
    amount
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// Parses admin form input: every non-digit is stripped, nothing left means unset.
#[must_use]
pub fn parse_price_input(input: &str) -> Price {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Decimal::from_str(&digits).ok()
}

/// The amount the engine bills with: unset counts as zero.
#[must_use]
pub fn billable(price: Price) -> Decimal {
    price.unwrap_or(Decimal::ZERO)
}

/// `true` when the price is configured and strictly positive.
#[must_use]
pub fn is_positive(price: Price) -> bool {
    price.is_some_and(|p| p > Decimal::ZERO)
}

/// Formats an amount as whole won with thousands separators, e.g. `1,234,000원`.
#[must_use]
pub fn format_won(amount: Decimal) -> String {
    let whole = amount.round_dp(0).trunc();
    let raw = whole.abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-{grouped}원")
    } else {
        format!("{grouped}원")
    }
}

/// Serde adapter for `Price` fields in store-shaped records.
pub(crate) mod price_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{price_from_value, price_to_value, Price};

    pub(crate) fn serialize<S>(price: &Price, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde::Serialize::serialize(&price_to_value(*price), serializer)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Price, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(price_from_value(&raw))
    }
}
