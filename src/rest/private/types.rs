//! Types for private REST API endpoints.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::RequestParams;
use crate::types::serde_helpers::string_or_i64;
use crate::types::{OrderId, OrderStatus, Side};

/// `orderId` value that selects every order of a symbol.
pub const ALL_ORDERS: i64 = -1;

/// Price type sent with every order. The exchange only supports limit pricing (1).
pub const LIMIT_PRICE_TYPE: u8 = 1;

// ========== Balance ==========

/// Balance response (`getuserinfo`).
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Account funds.
    pub funds: Funds,
}

/// Account funds broken down by category, each keyed by lowercase currency.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Funds {
    /// Net and total asset value.
    #[serde(default)]
    pub asset: AssetValue,
    /// Borrowed amounts.
    #[serde(default)]
    pub borrow: BTreeMap<String, Decimal>,
    /// Amounts available for trading.
    #[serde(default)]
    pub free: BTreeMap<String, Decimal>,
    /// Amounts locked in open orders.
    #[serde(default)]
    pub freezed: BTreeMap<String, Decimal>,
    /// Union fund amounts.
    #[serde(default)]
    pub union_fund: BTreeMap<String, Decimal>,
}

/// Aggregate asset value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetValue {
    /// Net asset value.
    #[serde(default)]
    pub net: Decimal,
    /// Total asset value.
    #[serde(default)]
    pub total: Decimal,
}

impl Balance {
    /// Free balance of one currency (lowercase key, e.g. `"btc"`).
    pub fn free(&self, currency: &str) -> Option<Decimal> {
        self.funds.free.get(currency).copied()
    }
}

// ========== Orders ==========

/// Optional fields of an advanced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedOrder {
    /// Take-profit price.
    pub take_profit: Decimal,
    /// Stop-loss price.
    pub stop_loss: Decimal,
    /// Trigger price.
    pub trigger_price: Decimal,
}

/// Request to create an order (`createorder`).
#[derive(Debug, Clone)]
pub struct SubmitOrderRequest {
    /// Trading pair.
    pub symbol: String,
    /// Order side.
    pub side: Side,
    /// Limit price.
    pub price: Decimal,
    /// Order quantity.
    pub quantity: Decimal,
    /// Advanced order fields; present iff the order is an advanced order.
    pub advanced: Option<AdvancedOrder>,
}

impl SubmitOrderRequest {
    /// Create a standard (non-advanced) limit order request.
    pub fn new(symbol: impl Into<String>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            price,
            quantity,
            advanced: None,
        }
    }

    /// Turn this into an advanced order.
    pub fn advanced(mut self, advanced: AdvancedOrder) -> Self {
        self.advanced = Some(advanced);
        self
    }

    /// Whether the order carries advanced fields.
    pub fn is_advance_order(&self) -> bool {
        self.advanced.is_some()
    }

    /// Wire parameters, without `apiKey`.
    pub fn to_params(&self) -> RequestParams {
        let mut params = RequestParams::new();
        params
            .insert("symbol", &self.symbol)
            .insert("orderType", self.side)
            .insert("price", self.price.normalize())
            .insert("quantity", self.quantity.normalize())
            .insert("priceTypeId", LIMIT_PRICE_TYPE)
            .insert("isAdvanceOrder", u8::from(self.is_advance_order()));
        if let Some(advanced) = &self.advanced {
            params
                .insert("takeProfit", advanced.take_profit.normalize())
                .insert("stopLoss", advanced.stop_loss.normalize())
                .insert("triggerPrice", advanced.trigger_price.normalize());
        }
        params
    }
}

/// Response from order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitOrderResponse {
    /// Identifier assigned by the exchange.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Request for orders filtered by status (`getorderbystatus`).
#[derive(Debug, Clone, Serialize)]
pub struct OrdersByStatusRequest {
    /// Trading pair.
    pub symbol: String,
    /// Status code to filter by.
    #[serde(rename = "statusId")]
    pub status_id: i64,
    /// Time window the exchange searches.
    pub interval: i64,
}

impl OrdersByStatusRequest {
    /// Create a new request.
    pub fn new(symbol: impl Into<String>, status: OrderStatus, interval: i64) -> Self {
        Self {
            symbol: symbol.into(),
            status_id: status.code(),
            interval,
        }
    }
}

/// An order record returned by the order query endpoints.
///
/// `getorderinfo` uses camelCase field names while `getorderbystatus` uses
/// `Amount`, `Avg_price` and `Create_date`; both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    /// Order identifier.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    /// Order quantity.
    #[serde(alias = "Amount", default)]
    pub amount: Decimal,
    /// Average fill price.
    #[serde(rename = "avgPrice", alias = "Avg_price", default)]
    pub avg_price: Decimal,
    /// Creation time in milliseconds since the epoch.
    #[serde(
        rename = "createDate",
        alias = "Create_date",
        deserialize_with = "string_or_i64::deserialize",
        default
    )]
    pub create_date: i64,
    /// Limit price.
    #[serde(default)]
    pub price: Decimal,
    /// Numeric status code, see [`OrderStatus`].
    #[serde(deserialize_with = "string_or_i64::deserialize")]
    pub status: i64,
    /// Order side.
    #[serde(rename = "type", default)]
    pub side: Option<Side>,
}

impl OrderInfo {
    /// Decoded status, `None` for codes outside the known table.
    pub fn order_status(&self) -> Option<OrderStatus> {
        OrderStatus::from_code(self.status)
    }
}

/// Confirmation record returned by `cancelorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelledOrder {
    /// The cancelled order.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}
