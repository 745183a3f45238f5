//! Decoders for the non-uniform response shapes: positional rows,
//! heterogeneous filter lists and arrays re-keyed into maps.

use crate::core::errors::ExchangeError;
use crate::core::kernel::codec;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Cursor over the elements of a positional row.
pub struct RowCursor<'a> {
    shape: &'static str,
    items: &'a [Value],
    position: usize,
}

impl<'a> RowCursor<'a> {
    fn next_value(&mut self, name: &str) -> Result<&'a Value, ExchangeError> {
        let value = self.items.get(self.position).ok_or_else(|| {
            ExchangeError::decode(
                self.shape,
                format!("no element at position {} for '{}'", self.position, name),
            )
        })?;
        self.position += 1;
        Ok(value)
    }

    fn error(&self, name: &str, message: String) -> ExchangeError {
        ExchangeError::decode(
            self.shape,
            format!("'{}' at position {}: {}", name, self.position - 1, message),
        )
    }

    pub fn decimal(&mut self, name: &str) -> Result<Decimal, ExchangeError> {
        let value = self.next_value(name)?;
        codec::decimal_from_value(value).map_err(|e| self.error(name, e))
    }

    pub fn timestamp(&mut self, name: &str) -> Result<DateTime<Utc>, ExchangeError> {
        let value = self.next_value(name)?;
        codec::timestamp_from_value(value).map_err(|e| self.error(name, e))
    }

    pub fn uint(&mut self, name: &str) -> Result<u64, ExchangeError> {
        let value = self.next_value(name)?;
        value
            .as_u64()
            .ok_or_else(|| self.error(name, "expected unsigned integer".to_string()))
    }

    /// Trailing optional text element. Missing or `null` yields `None`; any
    /// other non-string value is a decode error.
    pub fn optional_text(&mut self, name: &str) -> Result<Option<String>, ExchangeError> {
        let Some(value) = self.items.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;
        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text.clone())),
            other => Err(self.error(name, format!("expected string, got {}", other))),
        }
    }
}

/// A value encoded as a JSON array with a fixed field order.
pub trait PositionalRow: Sized {
    /// Name used in decode errors
    const SHAPE: &'static str;
    /// Number of leading elements the row must have
    const ARITY: usize;

    fn read(cursor: &mut RowCursor<'_>) -> Result<Self, ExchangeError>;
}

/// Decode one positional row. Elements beyond what `T` reads are ignored.
pub fn decode_row<T: PositionalRow>(value: &Value) -> Result<T, ExchangeError> {
    let items = codec::as_array(value, T::SHAPE)?;
    if items.len() < T::ARITY {
        return Err(ExchangeError::decode(
            T::SHAPE,
            format!(
                "row has {} elements, expected at least {}",
                items.len(),
                T::ARITY
            ),
        ));
    }

    let mut cursor = RowCursor {
        shape: T::SHAPE,
        items,
        position: 0,
    };
    T::read(&mut cursor)
}

/// Decode an array of positional rows. Any bad row fails the whole list.
pub fn decode_rows<T: PositionalRow>(value: &Value) -> Result<Vec<T>, ExchangeError> {
    codec::as_array(value, T::SHAPE)?
        .iter()
        .map(decode_row::<T>)
        .collect()
}

/// Lower bound, upper bound and increment of a symbol filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// `minQty`, `maxQty`, `stepSize`
    Quantity,
    /// `minPrice`, `maxPrice`, `tickSize`
    Price,
}

impl FilterKind {
    pub const ALL: [Self; 2] = [Self::Quantity, Self::Price];

    pub const fn fields(self) -> [&'static str; 3] {
        match self {
            Self::Quantity => ["minQty", "maxQty", "stepSize"],
            Self::Price => ["minPrice", "maxPrice", "tickSize"],
        }
    }

    /// Try this kind's trio against a raw filter object.
    fn probe(self, element: &Value) -> Option<FilterShape> {
        let [min, max, step] = self.fields();
        let range = FilterRange {
            min: codec::probe_decimal(element, min)?,
            max: codec::probe_decimal(element, max)?,
            step: codec::probe_decimal(element, step)?,
        };
        Some(match self {
            Self::Quantity => FilterShape::Quantity(range),
            Self::Price => FilterShape::Price(range),
        })
    }
}

/// A sub-shape recognised inside one element of a symbol's filter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    Quantity(FilterRange),
    Price(FilterRange),
}

/// Match every known sub-shape against one filter element.
///
/// The element must carry a `filterType` string. Anything else about it is
/// tolerated; an element may match zero, one or both kinds.
pub fn match_filter(element: &Value) -> Result<Vec<FilterShape>, ExchangeError> {
    let filter_type = codec::string_field(element, "filter", "filterType")?;
    let shapes: Vec<FilterShape> = FilterKind::ALL
        .iter()
        .filter_map(|kind| kind.probe(element))
        .collect();
    trace!(filter_type = %filter_type, matched = shapes.len(), "filter element");
    Ok(shapes)
}

/// Accumulator of the filter fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterScan {
    pub quantity: Option<FilterRange>,
    pub price: Option<FilterRange>,
    /// Elements looked at before the fold stopped
    pub examined: usize,
}

impl FilterScan {
    /// Merge one element's matches. A later match of a kind replaces an
    /// earlier one.
    pub fn absorb(mut self, shapes: &[FilterShape]) -> Self {
        for shape in shapes {
            match *shape {
                FilterShape::Quantity(range) => self.quantity = Some(range),
                FilterShape::Price(range) => self.price = Some(range),
            }
        }
        self.examined += 1;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.quantity.is_some() && self.price.is_some()
    }

    /// Quantity trio, zero when no element matched
    pub fn quantity_or_zero(&self) -> FilterRange {
        self.quantity.unwrap_or_default()
    }

    /// Price trio, zero when no element matched
    pub fn price_or_zero(&self) -> FilterRange {
        self.price.unwrap_or_default()
    }
}

/// Fold a symbol's filter list into the quantity and price trios.
///
/// Stops at the end of the list or as soon as both kinds have been found,
/// whichever comes first. Elements after that point are not examined.
pub fn scan_filters(filters: &[Value]) -> Result<FilterScan, ExchangeError> {
    filters
        .iter()
        .try_fold(FilterScan::default(), |scan, element| {
            if scan.is_complete() {
                return Ok(scan);
            }
            Ok(scan.absorb(&match_filter(element)?))
        })
}

/// An array element dropped while building a keyed collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: String,
}

/// Map assembled from an array of keyed elements
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCollection<V> {
    pub entries: HashMap<String, V>,
    /// Elements that failed their own decode
    pub skipped: Vec<SkippedEntry>,
}

impl<V> Default for KeyedCollection<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            skipped: Vec::new(),
        }
    }
}

impl<V> KeyedCollection<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Re-key an array into a map.
///
/// `decode` returns `Ok(Some((key, value)))` to keep an element, `Ok(None)`
/// to leave it out on purpose, and `Err` when the element is malformed.
/// Malformed elements are recorded in `skipped` and never fail the
/// collection. Duplicate keys: the later element wins.
pub fn decode_keyed<V, F>(
    value: &Value,
    shape: &'static str,
    decode: F,
) -> Result<KeyedCollection<V>, ExchangeError>
where
    F: Fn(&Value) -> Result<Option<(String, V)>, ExchangeError>,
{
    let items = codec::as_array(value, shape)?;
    let mut collection = KeyedCollection {
        entries: HashMap::with_capacity(items.len()),
        skipped: Vec::new(),
    };

    for (index, item) in items.iter().enumerate() {
        match decode(item) {
            Ok(Some((key, entry))) => {
                collection.entries.insert(key, entry);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(shape, index, error = %e, "skipping malformed element");
                collection.skipped.push(SkippedEntry {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(collection)
}

/// Free, locked and computed total of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub free: Decimal,
    pub locked: Decimal,
    pub total: Decimal,
}

fn balance_entry(item: &Value) -> Result<Option<(String, Balance)>, ExchangeError> {
    let asset = codec::string_field(item, "balance", "asset")?;
    let free = codec::decimal_field(item, "balance", "free")?;
    let locked = codec::decimal_field(item, "balance", "locked")?;

    if free.is_zero() && locked.is_zero() {
        return Ok(None);
    }

    let total = free.checked_add(locked).ok_or_else(|| {
        ExchangeError::decode(
            "balance",
            format!("{}: free {} + locked {} overflows", asset, free, locked),
        )
    })?;

    Ok(Some((
        asset,
        Balance {
            free,
            locked,
            total,
        },
    )))
}

/// Assets with a nonzero free or locked amount, keyed by asset name.
/// The total is always computed here, never read from the wire.
pub fn aggregate_balances(value: &Value) -> Result<KeyedCollection<Balance>, ExchangeError> {
    decode_keyed(value, "balances", balance_entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[derive(Debug)]
    struct Pair {
        price: Decimal,
        quantity: Decimal,
    }

    impl PositionalRow for Pair {
        const SHAPE: &'static str = "pair";
        const ARITY: usize = 2;

        fn read(cursor: &mut RowCursor<'_>) -> Result<Self, ExchangeError> {
            Ok(Self {
                price: cursor.decimal("price")?,
                quantity: cursor.decimal("quantity")?,
            })
        }
    }

    #[test]
    fn test_row_exact_short_and_trailing() {
        let row: Pair = decode_row(&json!(["4.00000000", "431.00000000"])).unwrap();
        assert_eq!(row.price, dec!(4));
        assert_eq!(row.quantity, dec!(431));

        let err = decode_row::<Pair>(&json!(["4.00000000"])).unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(_)));

        let row: Pair = decode_row(&json!(["4.0", "1.5", [], "extra"])).unwrap();
        assert_eq!(row.quantity, dec!(1.5));
    }

    #[test]
    fn test_row_wrong_type_names_field() {
        let err = decode_row::<Pair>(&json!(["4.0", true])).unwrap_err();
        assert!(err.to_string().contains("quantity"));
        assert!(decode_row::<Pair>(&json!({"price": "1"})).is_err());
    }

    #[derive(Debug)]
    struct Tagged {
        price: Decimal,
        tag: Option<String>,
    }

    impl PositionalRow for Tagged {
        const SHAPE: &'static str = "tagged";
        const ARITY: usize = 1;

        fn read(cursor: &mut RowCursor<'_>) -> Result<Self, ExchangeError> {
            Ok(Self {
                price: cursor.decimal("price")?,
                tag: cursor.optional_text("tag")?,
            })
        }
    }

    #[test]
    fn test_optional_text_rejects_non_string() {
        let row: Tagged = decode_row(&json!(["1.5", "x"])).unwrap();
        assert_eq!(row.price, dec!(1.5));
        assert_eq!(row.tag.as_deref(), Some("x"));
        assert_eq!(decode_row::<Tagged>(&json!(["1.5"])).unwrap().tag, None);
        assert_eq!(decode_row::<Tagged>(&json!(["1.5", null])).unwrap().tag, None);

        let err = decode_row::<Tagged>(&json!(["1.5", 7])).unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(_)));
        assert!(err.to_string().contains("tag"));
    }

    #[test]
    fn test_filter_element_may_match_nothing() {
        let shapes = match_filter(&json!({"filterType": "MAX_NUM_ORDERS", "maxNumOrders": 200}))
            .unwrap();
        assert!(shapes.is_empty());
        assert!(match_filter(&json!({"minQty": "1"})).is_err());
    }

    #[test]
    fn test_filter_trio_requires_all_three_fields() {
        let shapes =
            match_filter(&json!({"filterType": "LOT_SIZE", "minQty": "0.1", "maxQty": "10"}))
                .unwrap();
        assert!(shapes.is_empty());

        let shapes = match_filter(&json!({
            "filterType": "LOT_SIZE", "minQty": "0.1", "maxQty": "10", "stepSize": "bogus"
        }))
        .unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_scan_stops_once_both_found() {
        let filters = vec![
            json!({"filterType": "PRICE_FILTER", "minPrice": "0.01", "maxPrice": "1000", "tickSize": "0.01"}),
            json!({"filterType": "LOT_SIZE", "minQty": "0.001", "maxQty": "100", "stepSize": "0.001"}),
            json!({"filterType": "MARKET_LOT_SIZE", "minQty": "0", "maxQty": "50", "stepSize": "0"}),
            json!({"no_type": true}),
        ];
        let scan = scan_filters(&filters).unwrap();
        assert_eq!(scan.examined, 2);
        assert_eq!(scan.quantity_or_zero().max, dec!(100));
        assert_eq!(scan.price_or_zero().step, dec!(0.01));
    }

    #[test]
    fn test_scan_later_match_overwrites_until_complete() {
        let filters = vec![
            json!({"filterType": "LOT_SIZE", "minQty": "1", "maxQty": "2", "stepSize": "1"}),
            json!({"filterType": "MARKET_LOT_SIZE", "minQty": "3", "maxQty": "4", "stepSize": "1"}),
        ];
        let scan = scan_filters(&filters).unwrap();
        assert_eq!(scan.examined, 2);
        assert_eq!(scan.quantity.unwrap().min, dec!(3));
        assert!(scan.price.is_none());
        assert_eq!(scan.price_or_zero(), FilterRange::default());
    }

    #[test]
    fn test_scan_empty_list() {
        let scan = scan_filters(&[]).unwrap();
        assert_eq!(scan.examined, 0);
        assert_eq!(scan.quantity_or_zero(), FilterRange::default());
    }

    #[test]
    fn test_keyed_last_wins_and_skips() {
        let items = json!([
            {"symbol": "ETHBTC", "price": "0.1"},
            {"symbol": "LTCBTC", "price": "not a number"},
            {"symbol": "ETHBTC", "price": "0.2"},
        ]);
        let collection = decode_keyed(&items, "price", |item| {
            Ok(Some((
                codec::string_field(item, "price", "symbol")?,
                codec::decimal_field(item, "price", "price")?,
            )))
        })
        .unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("ETHBTC"), Some(&dec!(0.2)));
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].index, 1);
    }

    #[test]
    fn test_keyed_requires_array() {
        let err = decode_keyed(&json!({"a": 1}), "price", |_| Ok(Some(("a".to_string(), 1))))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(_)));
    }

    #[test]
    fn test_balances_filter_zero_and_compute_total() {
        let balances = aggregate_balances(&json!([
            {"asset": "BTC", "free": "0.00000000", "locked": "0.00000000"},
            {"asset": "ETH", "free": "1.5", "locked": "0"},
            {"asset": "BNB", "free": "2", "locked": "0.25"},
        ]))
        .unwrap();

        assert!(balances.get("BTC").is_none());
        assert_eq!(balances.get("ETH").unwrap().total, dec!(1.5));
        assert_eq!(balances.get("BNB").unwrap().total, dec!(2.25));
        assert!(balances.skipped.is_empty());
    }

    #[test]
    fn test_balance_total_overflow_is_skipped() {
        let balances = aggregate_balances(&json!([
            {"asset": "BTC", "free": "79228162514264337593543950335", "locked": "1"},
            {"asset": "ETH", "free": "1.5", "locked": "0"},
        ]))
        .unwrap();

        assert!(balances.get("BTC").is_none());
        assert_eq!(balances.get("ETH").unwrap().total, dec!(1.5));
        assert_eq!(balances.skipped.len(), 1);
        assert_eq!(balances.skipped[0].index, 0);
        assert!(balances.skipped[0].reason.contains("overflows"));
    }
}
