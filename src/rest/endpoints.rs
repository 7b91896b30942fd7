//! C2CX REST API endpoint constants.

/// Base URL for the C2CX REST API.
pub const C2CX_BASE_URL: &str = "https://api.c2cx.com/Rest";

/// Client identifier sent with every request.
pub const C2CX_USER_AGENT: &str = "C2CX/v1";

/// Public endpoints (GET, no signature).
pub mod public {
    /// Get ticker information.
    pub const TICKER: &str = "ticker";
    /// Get order book.
    pub const ORDER_BOOK: &str = "GetOrderbook";
}

/// Private endpoints (signed POST).
pub mod private {
    /// Get account balances.
    pub const USER_INFO: &str = "getuserinfo";
    /// Create an order.
    pub const CREATE_ORDER: &str = "createorder";
    /// Query orders by ID.
    pub const ORDER_INFO: &str = "getorderinfo";
    /// Query orders by status.
    pub const ORDERS_BY_STATUS: &str = "getorderbystatus";
    /// Cancel an order.
    pub const CANCEL_ORDER: &str = "cancelorder";
}
