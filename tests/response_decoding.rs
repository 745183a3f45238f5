use binance_api::core::kernel::shapes::{aggregate_balances, scan_filters, FilterRange};
use binance_api::endpoints::{
    AllPricesRequest, CandlesticksRequest, DepthRequest, ExchangeInfoRequest, Ticker24hRequest,
};
use binance_api::{ExchangeError, Request};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// Parse a body the way the client does, keeping numbers exact
fn body(text: &str) -> Value {
    serde_json::from_str(text).expect("test body is valid JSON")
}

#[cfg(test)]
mod decoding_tests {
    use super::*;

    #[test]
    fn test_quantity_filter_found_among_unrelated() {
        let filters = vec![
            json!({"filterType": "ICEBERG_PARTS", "limit": 10}),
            json!({"filterType": "LOT_SIZE", "minQty": "0.001", "maxQty": "100", "stepSize": "0.001"}),
            json!({"filterType": "MAX_NUM_ALGO_ORDERS", "maxNumAlgoOrders": 5}),
        ];
        let scan = scan_filters(&filters).unwrap();
        assert_eq!(
            scan.quantity_or_zero(),
            FilterRange {
                min: dec!(0.001),
                max: dec!(100),
                step: dec!(0.001),
            }
        );
        assert_eq!(scan.price_or_zero(), FilterRange::default());
        assert_eq!(scan.examined, 3);
    }

    #[test]
    fn test_no_quantity_filter_defaults_to_zero() {
        let filters =
            vec![json!({"filterType": "PRICE_FILTER", "minPrice": "1", "maxPrice": "2", "tickSize": "1"})];
        let scan = scan_filters(&filters).unwrap();
        assert_eq!(scan.quantity_or_zero().min, dec!(0));
        assert_eq!(scan.quantity_or_zero().step, dec!(0));
    }

    #[test]
    fn test_filter_without_type_aborts_symbol() {
        let err = ExchangeInfoRequest::decode_response(json!({
            "symbols": [{
                "symbol": "ETHBTC", "status": "TRADING", "baseAsset": "ETH",
                "baseAssetPrecision": 8, "quoteAsset": "BTC", "quotePrecision": 8,
                "orderTypes": [], "icebergAllowed": false,
                "filters": [{"minQty": "1", "maxQty": "2", "stepSize": "1"}]
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(ref m) if m.contains("filterType")));
    }

    #[test]
    fn test_duplicate_symbol_last_wins() {
        let prices = AllPricesRequest::decode_response(json!([
            {"symbol": "LTCBTC", "price": "4.00000200"},
            {"symbol": "ETHBTC", "price": "0.07946600"},
            {"symbol": "LTCBTC", "price": "4.5"}
        ]))
        .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices.get("LTCBTC"), Some(&dec!(4.5)));
        assert!(prices.skipped.is_empty());
    }

    #[test]
    fn test_bad_element_is_skipped_not_fatal() {
        let prices = AllPricesRequest::decode_response(json!([
            {"symbol": "LTCBTC"},
            {"symbol": "ETHBTC", "price": "0.07946600"}
        ]))
        .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.skipped.len(), 1);
        assert!(prices.skipped[0].reason.contains("price"));
    }

    #[test]
    fn test_balance_presence() {
        let balances = aggregate_balances(&json!([
            {"asset": "BTC", "free": "0", "locked": "0"},
            {"asset": "ETH", "free": "1.5", "locked": "0"}
        ]))
        .unwrap();
        assert!(balances.get("BTC").is_none());
        let eth = balances.get("ETH").unwrap();
        assert_eq!(eth.total, dec!(1.5));
    }

    #[test]
    fn test_numbers_decode_exactly() {
        let book = DepthRequest::decode_response(body(
            r#"{"lastUpdateId": 5, "bids": [[0.1, 0.30000000000000004441]], "asks": []}"#,
        ))
        .unwrap();
        assert_eq!(book.bids[0].price, dec!(0.1));
        assert_eq!(book.bids[0].quantity.to_string(), "0.30000000000000004441");
    }

    #[test]
    fn test_candlestick_row_lengths() {
        let full = json!([[1, "1", "1", "1", "1", "1", 2, "1", 1, "1", "1"]]);
        assert_eq!(CandlesticksRequest::decode_response(full).unwrap().len(), 1);

        let short = json!([[1, "1", "1", "1", "1", "1", 2, "1", 1, "1"]]);
        assert!(matches!(
            CandlesticksRequest::decode_response(short),
            Err(ExchangeError::DecodeError(_))
        ));

        let long = json!([[1, "1", "1", "1", "1", "1", 2, "1", 1, "1", "1", "0", "extra"]]);
        assert_eq!(CandlesticksRequest::decode_response(long).unwrap().len(), 1);
    }

    #[test]
    fn test_ticker_missing_field_names_it() {
        let err = Ticker24hRequest::decode_response(json!({"symbol": "BNBBTC"})).unwrap_err();
        assert!(matches!(err, ExchangeError::DecodeError(ref m) if m.contains("priceChange")));
    }

    #[test]
    fn test_ticker_decodes() {
        let ticker = Ticker24hRequest::decode_response(json!({
            "symbol": "BNBBTC",
            "priceChange": "-94.99999800",
            "priceChangePercent": "-95.960",
            "weightedAvgPrice": "0.29628482",
            "prevClosePrice": "0.10002000",
            "lastPrice": "4.00000200",
            "lastQty": "200.00000000",
            "bidPrice": "4.00000000",
            "askPrice": "4.00000200",
            "openPrice": "99.00000000",
            "highPrice": "100.00000000",
            "lowPrice": "0.10000000",
            "volume": "8913.30000000",
            "quoteVolume": "15.30000000",
            "openTime": 1499783499040_i64,
            "closeTime": 1499869899040_i64,
            "firstId": -1,
            "lastId": -1,
            "count": 0
        }))
        .unwrap();
        assert_eq!(ticker.price_change, dec!(-94.999998));
        assert_eq!(ticker.first_id, -1);
        assert_eq!(ticker.volume, Some(dec!(8913.3)));
    }
}
