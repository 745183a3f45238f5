//! Field-level wire codec.
//!
//! Decoding side: exact decimals, millisecond timestamps and field lookup on
//! raw `serde_json::Value` objects, plus serde adapters so keyed response
//! structs can use the same rules through `#[serde(with = ...)]`.
//!
//! Encoding side: [`ParamValue`] and the ordered [`QueryParams`] list with
//! its presence rules.

use crate::core::errors::ExchangeError;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_decimal_text(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("'{}' is not a decimal: {}", text, e))
}

/// Decode a decimal from a JSON string or number.
///
/// Numbers are read through their literal text (serde_json is built with
/// `arbitrary_precision`), so no value ever passes through `f64`.
pub fn decimal_from_value(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::String(text) => parse_decimal_text(text),
        Value::Number(number) => parse_decimal_text(&number.to_string()),
        other => Err(format!("expected decimal, found {}", kind(other))),
    }
}

/// Decode epoch milliseconds into an absolute time.
pub fn timestamp_from_value(value: &Value) -> Result<DateTime<Utc>, String> {
    let millis = value
        .as_i64()
        .ok_or_else(|| format!("expected integer milliseconds, found {}", kind(value)))?;
    timestamp_from_millis(millis)
}

pub fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| format!("{} is out of range for a timestamp", millis))
}

pub fn timestamp_to_millis(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

/// Look up a mandatory field of a JSON object.
pub fn field<'a>(object: &'a Value, shape: &str, name: &str) -> Result<&'a Value, ExchangeError> {
    match object {
        Value::Object(map) => map
            .get(name)
            .ok_or_else(|| ExchangeError::decode(shape, format!("missing field '{}'", name))),
        other => Err(ExchangeError::decode(
            shape,
            format!("expected object, found {}", kind(other)),
        )),
    }
}

pub fn decimal_field(object: &Value, shape: &str, name: &str) -> Result<Decimal, ExchangeError> {
    decimal_from_value(field(object, shape, name)?)
        .map_err(|e| ExchangeError::decode(shape, format!("field '{}': {}", name, e)))
}

/// Best-effort decimal lookup: absent or undecodable both yield `None`.
pub fn probe_decimal(object: &Value, name: &str) -> Option<Decimal> {
    object.get(name).and_then(|v| decimal_from_value(v).ok())
}

pub fn string_field(object: &Value, shape: &str, name: &str) -> Result<String, ExchangeError> {
    match field(object, shape, name)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(ExchangeError::decode(
            shape,
            format!("field '{}': expected string, found {}", name, kind(other)),
        )),
    }
}

pub fn u64_field(object: &Value, shape: &str, name: &str) -> Result<u64, ExchangeError> {
    let value = field(object, shape, name)?;
    value.as_u64().ok_or_else(|| {
        ExchangeError::decode(
            shape,
            format!("field '{}': expected unsigned integer, found {}", name, kind(value)),
        )
    })
}

pub fn array_field<'a>(
    object: &'a Value,
    shape: &str,
    name: &str,
) -> Result<&'a [Value], ExchangeError> {
    match field(object, shape, name)? {
        Value::Array(items) => Ok(items),
        other => Err(ExchangeError::decode(
            shape,
            format!("field '{}': expected array, found {}", name, kind(other)),
        )),
    }
}

pub fn as_array<'a>(value: &'a Value, shape: &str) -> Result<&'a [Value], ExchangeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ExchangeError::decode(
            shape,
            format!("expected array, found {}", kind(other)),
        )),
    }
}

/// Decode a keyed object through its serde derive.
pub fn from_json<T: DeserializeOwned>(value: Value, shape: &str) -> Result<T, ExchangeError> {
    serde_json::from_value(value).map_err(|e| ExchangeError::decode(shape, e))
}

/// `#[serde(with = "codec::decimal")]`
pub mod decimal {
    use rust_decimal::Decimal;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        super::decimal_from_value(&value).map_err(D::Error::custom)
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }
}

/// `#[serde(default, with = "codec::option_decimal")]`
pub mod option_decimal {
    use rust_decimal::Decimal;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => super::decimal_from_value(&value)
                .map(Some)
                .map_err(D::Error::custom),
        }
    }

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }
}

/// `#[serde(with = "codec::timestamp_ms")]`
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        super::timestamp_from_value(&value).map_err(D::Error::custom)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(super::timestamp_to_millis(*value))
    }
}

/// Semantic value of a request parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    /// Documented enum code such as `BUY` or `1h`
    Code(&'static str),
}

impl ParamValue {
    /// Numeric zero; text, codes and timestamps are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Decimal(v) => v.is_zero(),
            Self::Text(_) | Self::Timestamp(_) | Self::Code(_) => false,
        }
    }

    /// Wire text of the value
    pub fn encode(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            // Display never switches to scientific notation
            Self::Decimal(v) => v.to_string(),
            Self::Timestamp(v) => timestamp_to_millis(*v).to_string(),
            Self::Code(v) => (*v).to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Presence rule of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    OmitIfAbsent,
    /// Identifier- and limit-like values: zero means "not provided"
    OmitIfZero,
}

/// Ordered request parameters, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(&'static str, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with an explicit presence rule.
    pub fn declare(
        &mut self,
        name: &'static str,
        value: Option<ParamValue>,
        presence: Presence,
    ) -> &mut Self {
        let keep = match (&value, presence) {
            (Some(v), Presence::OmitIfZero) => !v.is_zero(),
            (Some(_), _) => true,
            (None, _) => false,
        };
        if let (true, Some(value)) = (keep, value) {
            self.params.push((name, value));
        }
        self
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<ParamValue>) -> &mut Self {
        self.declare(name, Some(value.into()), Presence::Required)
    }

    pub fn push_optional<V: Into<ParamValue>>(
        &mut self,
        name: &'static str,
        value: Option<V>,
    ) -> &mut Self {
        self.declare(name, value.map(Into::into), Presence::OmitIfAbsent)
    }

    pub fn push_nonzero<V: Into<ParamValue>>(
        &mut self,
        name: &'static str,
        value: Option<V>,
    ) -> &mut Self {
        self.declare(name, value.map(Into::into), Presence::OmitIfZero)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, ParamValue)> {
        self.params.iter()
    }

    /// Wire pairs in declaration order
    pub fn encode(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.encode()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_from_string_and_number() {
        assert_eq!(decimal_from_value(&json!("0.00100000")).unwrap(), dec!(0.001));
        assert_eq!(decimal_from_value(&json!("42")).unwrap(), dec!(42));
        let number: Value = serde_json::from_str("0.1").unwrap();
        assert_eq!(decimal_from_value(&number).unwrap(), dec!(0.1));
        assert!(decimal_from_value(&json!(true)).is_err());
        assert!(decimal_from_value(&json!("abc")).is_err());
    }

    #[test]
    fn test_number_keeps_exact_digits() {
        let number: Value = serde_json::from_str("0.30000000000000004441").unwrap();
        assert_eq!(
            decimal_from_value(&number).unwrap().to_string(),
            "0.30000000000000004441"
        );
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = timestamp_from_value(&json!(1_499_827_319_559_i64)).unwrap();
        assert_eq!(timestamp_to_millis(ts), 1_499_827_319_559);
        assert!(timestamp_from_value(&json!("1499827319559")).is_err());
    }

    #[test]
    fn test_missing_field_is_decode_error() {
        let object = json!({"symbol": "BTCUSDT"});
        let err = decimal_field(&object, "ticker", "price").unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(ref m) if m.contains("price")));
        assert!(string_field(&object, "ticker", "symbol").is_ok());
        assert!(u64_field(&object, "ticker", "symbol").is_err());
    }

    #[test]
    fn test_omit_if_zero() {
        let mut params = QueryParams::new();
        params
            .push("symbol", "BTCUSDT")
            .push_nonzero("limit", Some(0_u32))
            .push_nonzero("fromId", Some(5_u64));
        assert_eq!(
            params.encode(),
            vec![
                ("symbol".to_string(), "BTCUSDT".to_string()),
                ("fromId".to_string(), "5".to_string()),
            ]
        );
        assert!(params.get("limit").is_none());
    }

    #[test]
    fn test_omit_if_absent_keeps_zero() {
        let mut params = QueryParams::new();
        params
            .push_optional("price", Some(Decimal::ZERO))
            .push_optional::<u64>("orderId", None);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("price"), Some(&ParamValue::Decimal(Decimal::ZERO)));
    }

    #[test]
    fn test_param_encoding() {
        assert_eq!(ParamValue::from(dec!(0.00000100)).encode(), "0.00000100");
        assert_eq!(ParamValue::from(dec!(1)).encode(), "1");
        let ts = timestamp_from_millis(1_499_827_319_559).unwrap();
        assert_eq!(ParamValue::from(ts).encode(), "1499827319559");
    }
}
