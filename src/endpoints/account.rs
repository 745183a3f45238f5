use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::Method;
use crate::core::kernel::codec::{self, QueryParams};
use crate::core::kernel::shapes::{aggregate_balances, Balance, KeyedCollection};
use crate::core::traits::{Request, Security, SignedParams, SignedRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commissions, permissions and non-empty balances of the account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountInformationRequest {
    signed: SignedParams,
}

impl AccountInformationRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfo {
    pub maker_commission: u32,
    pub taker_commission: u32,
    pub buyer_commission: u32,
    pub seller_commission: u32,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    /// Only assets with a nonzero free or locked amount
    pub balances: KeyedCollection<Balance>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    #[serde(rename = "makerCommission")]
    maker_commission: u32,
    #[serde(rename = "takerCommission")]
    taker_commission: u32,
    #[serde(rename = "buyerCommission")]
    buyer_commission: u32,
    #[serde(rename = "sellerCommission")]
    seller_commission: u32,
    #[serde(rename = "canTrade")]
    can_trade: bool,
    #[serde(rename = "canWithdraw")]
    can_withdraw: bool,
    #[serde(rename = "canDeposit")]
    can_deposit: bool,
    balances: Value,
}

impl Request for AccountInformationRequest {
    const ENDPOINT: &'static str = "/api/v3/account";
    const METHOD: Method = Method::Get;
    type Response = AccountInfo;

    fn write_params(&self, _params: &mut QueryParams) {}

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<AccountInfo, ExchangeError> {
        let raw: RawAccount = codec::from_json(value, "account")?;
        Ok(AccountInfo {
            maker_commission: raw.maker_commission,
            taker_commission: raw.taker_commission,
            buyer_commission: raw.buyer_commission,
            seller_commission: raw.seller_commission,
            can_trade: raw.can_trade,
            can_withdraw: raw.can_withdraw,
            can_deposit: raw.can_deposit,
            balances: aggregate_balances(&raw.balances)?,
        })
    }
}

impl SignedRequest for AccountInformationRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

/// Fills of the account on one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTradeListRequest {
    symbol: String,
    /// Default 500, max 1000
    limit: Option<u32>,
    /// Trade id to fetch from; most recent trades otherwise
    from_id: Option<u64>,
    signed: SignedParams,
}

impl AccountTradeListRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            limit: None,
            from_id: None,
            signed: SignedParams::default(),
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn from_id(mut self, from_id: u64) -> Self {
        self.from_id = Some(from_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTrade {
    pub id: u64,
    #[serde(with = "codec::decimal")]
    pub price: Decimal,
    #[serde(rename = "qty", with = "codec::decimal")]
    pub quantity: Decimal,
    #[serde(with = "codec::decimal")]
    pub commission: Decimal,
    #[serde(rename = "commissionAsset")]
    pub commission_asset: String,
    #[serde(with = "codec::timestamp_ms")]
    pub time: DateTime<Utc>,
    #[serde(rename = "isBuyer")]
    pub is_buyer: bool,
    #[serde(rename = "isMaker")]
    pub is_maker: bool,
    #[serde(rename = "isBestMatch")]
    pub is_best_match: bool,
}

impl Request for AccountTradeListRequest {
    const ENDPOINT: &'static str = "/api/v3/myTrades";
    const METHOD: Method = Method::Get;
    type Response = Vec<AccountTrade>;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("limit", self.limit)
            .push_nonzero("fromId", self.from_id);
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<Vec<AccountTrade>, ExchangeError> {
        codec::from_json(value, "account trade")
    }
}

impl SignedRequest for AccountTradeListRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}
