//! Common domain types for the C2CX API.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::C2cxError;

/// Quote currency of every supported trading pair.
pub const QUOTE_CURRENCY: &str = "CNY";

/// Trading pairs supported by the client, in the order the workflow visits them.
pub const AVAILABLE_PAIRS: [&str; 3] = ["CNY_BTC", "CNY_ETC", "CNY_ETH"];

/// Get the static list of supported trading pairs.
pub fn available_pairs() -> &'static [&'static str] {
    &AVAILABLE_PAIRS
}

/// Symbol of the pair that trades `currency` against the quote currency.
///
/// ```rust
/// use c2cx_api_client::types::pair_for_currency;
///
/// assert_eq!(pair_for_currency("btc"), "CNY_BTC");
/// ```
pub fn pair_for_currency(currency: &str) -> String {
    format!("{}_{}", QUOTE_CURRENCY, currency.to_ascii_uppercase())
}

/// Buy or sell side of an order.
///
/// Sent to the exchange exactly as `Buy` or `Sell`. Parsing is
/// case-insensitive and rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// The wire form of the side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = C2cxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Side::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Side::Sell)
        } else {
            Err(C2cxError::InvalidSide(s.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Status of an order, as reported by the exchange's numeric `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// 1
    Pending,
    /// 2
    Active,
    /// 3
    PartiallyFilled,
    /// 4
    Completed,
    /// 5
    Canceled,
    /// 6
    Error,
    /// 7
    Suspended,
    /// 8
    TriggerPending,
    /// 9
    StopLossPending,
    /// 10
    Processing,
    /// 11
    Expired,
    /// 12
    Cancelling,
}

impl OrderStatus {
    /// Every status, in code order.
    pub const ALL: [OrderStatus; 12] = [
        OrderStatus::Pending,
        OrderStatus::Active,
        OrderStatus::PartiallyFilled,
        OrderStatus::Completed,
        OrderStatus::Canceled,
        OrderStatus::Error,
        OrderStatus::Suspended,
        OrderStatus::TriggerPending,
        OrderStatus::StopLossPending,
        OrderStatus::Processing,
        OrderStatus::Expired,
        OrderStatus::Cancelling,
    ];

    /// Look up a status by its numeric code. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// The numeric code used by the exchange.
    pub fn code(&self) -> i64 {
        *self as i64 + 1
    }

    /// Display string for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Active => "Active",
            OrderStatus::PartiallyFilled => "Partially Filled",
            OrderStatus::Completed => "Completed",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Error => "Error",
            OrderStatus::Suspended => "Suspended",
            OrderStatus::TriggerPending => "Trigger Pending",
            OrderStatus::StopLossPending => "Stop Loss Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Expired => "Expired",
            OrderStatus::Cancelling => "Cancelling",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

/// Display string for a numeric status code, `None` for unknown codes.
pub fn order_status_string(status_id: i64) -> Option<&'static str> {
    OrderStatus::from_code(status_id).map(|s| s.as_str())
}

/// Exchange-assigned order identifier.
///
/// The exchange sends it both as a string and as a number; it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an order ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::types::serde_helpers::string_or_number::deserialize(deserializer).map(OrderId)
    }
}
