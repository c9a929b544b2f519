//! Wire-level value types shared by the engine and the client strategy.
//!
//! Field names and event names are preserved exactly as specified so that a
//! transport layer built on top of this crate (out of scope here) can
//! serialize these types directly without a translation layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side crosses against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Engine-side lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Ack,
    PartiallyFilled,
    Filled,
    Cancelled,
}

/// Whether a trade completed the order or left it resting with quantity open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillType {
    #[serde(rename = "Complete Fill")]
    Complete,
    #[serde(rename = "Partial Fill")]
    Partial,
}

/// A single executed trade, produced once per participating order per match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub quantity: u64,
    pub limit_price: Decimal,
    pub symbol: String,
    pub exch_order_id: u64,
    pub trade_id: u64,
    pub fill_type: FillType,
    pub side: Side,
}

/// Public snapshot of an order's engine-side state, embedded in every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParams {
    pub limit_price: Decimal,
    pub quantity: u64,
    pub side: Side,
    pub symbol: String,
    pub exch_order_id: u64,
    pub status: OrderStatus,
    #[serde(default)]
    pub filled_quantity: u64,
}

/// `create`/`revise`/`cancel` requests sent from client to engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub client_msg_id: Uuid,
    pub client_id: String,
    pub quantity: u64,
    pub limit_price: Decimal,
    pub side: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviseOrderRequest {
    pub client_msg_id: Uuid,
    pub client_id: String,
    pub order_id: u64,
    #[serde(default)]
    pub revised_quantity: Option<u64>,
    #[serde(default)]
    pub revised_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub client_msg_id: Uuid,
    pub client_id: String,
    pub order_id: u64,
}

/// Envelope for `create_resp`/`revise_resp`/`cancel_resp` events. No `name`
/// field of its own: the enclosing `EngineResponse`'s `#[serde(tag = "name")]`
/// already supplies the `"OrderResponse"` discriminator on the wire, so a
/// second field here would either duplicate or (worse, under a field-level
/// rename) diverge from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub client_msg_id: Uuid,
    pub client_id: String,
    pub order_params: Option<OrderParams>,
    pub status: bool,
    pub status_msg: String,
}

/// Envelope for `fill_resp` events. Has no `client_msg_id`: fills are
/// unsolicited from the perspective of the request that produced them (a
/// single create/revise can fan out into several fills). Likewise has no
/// `name` field of its own — `EngineResponse`'s tag supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOrderResponse {
    pub client_id: String,
    pub order_params: OrderParams,
    pub trade: Trade,
    pub status: bool,
    pub status_msg: String,
}

/// Either shape an engine operation can hand back; the dynamic `"name"`
/// discriminator from the wire format becomes a closed sum type here rather
/// than a string tag inspected at each call site (spec design note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum EngineResponse {
    OrderResponse(OrderResponse),
    FillOrderResponse(FillOrderResponse),
}

impl EngineResponse {
    pub fn client_id(&self) -> &str {
        match self {
            EngineResponse::OrderResponse(r) => &r.client_id,
            EngineResponse::FillOrderResponse(r) => &r.client_id,
        }
    }

    pub fn status(&self) -> bool {
        match self {
            EngineResponse::OrderResponse(r) => r.status,
            EngineResponse::FillOrderResponse(r) => r.status,
        }
    }

    pub fn order_params(&self) -> Option<&OrderParams> {
        match self {
            EngineResponse::OrderResponse(r) => r.order_params.as_ref(),
            EngineResponse::FillOrderResponse(r) => Some(&r.order_params),
        }
    }
}

/// One row of a market depth snapshot; empty string semantics from the
/// original wire format collapse to `None` here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthRow {
    pub bid: Option<Decimal>,
    pub bid_volume: Option<u64>,
    pub ask: Option<Decimal>,
    pub ask_volume: Option<u64>,
}

