//! The engine-side order entity: `fill`, `revise`, and `cancel` mutate a
//! single order and produce the response records the book hands back to
//! callers. Time priority lives here (`timestamp`), but the comparator that
//! orders two orders against each other belongs to the book, not to `Order`
//! itself — see `engine::book`.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::message::{FillType, OrderParams, OrderResponse, OrderStatus, Side, Trade};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
    #[error("fill quantity {requested} exceeds open quantity {open}")]
    OverFill { requested: u64, open: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviseError {
    #[error("Can not update quantity to {requested}, already filled {filled}")]
    QtyBelowFilled { requested: u64, filled: u64 },
    #[error("Order is of Filled state and can not be revised")]
    PriceOnFilled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CancelError {
    #[error("Order is of Filled state and can not be cancelled")]
    CancelOnFilled,
}

/// An order resting in (or having passed through) the book.
///
/// `timestamp` is a logical sequence number, not a wall-clock time: it only
/// needs to be monotonically increasing and comparable, which a counter
/// gives us without a clock dependency in tests.
#[derive(Debug, Clone)]
pub struct Order {
    pub exch_order_id: u64,
    pub client_id: String,
    pub client_msg_id: Uuid,
    pub side: Side,
    pub symbol: String,
    pub limit_price: Decimal,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub status: OrderStatus,
    pub timestamp: u64,
    pub trades: Vec<Trade>,
}

impl Order {
    pub fn new(
        exch_order_id: u64,
        client_id: String,
        client_msg_id: Uuid,
        side: Side,
        symbol: String,
        limit_price: Decimal,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Order {
            exch_order_id,
            client_id,
            client_msg_id,
            side,
            symbol,
            limit_price,
            quantity,
            filled_quantity: 0,
            status: OrderStatus::Ack,
            timestamp,
            trades: Vec::new(),
        }
    }

    pub fn open_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    pub fn to_params(&self) -> OrderParams {
        OrderParams {
            limit_price: self.limit_price,
            quantity: self.quantity,
            side: self.side,
            symbol: self.symbol.clone(),
            exch_order_id: self.exch_order_id,
            status: self.status,
            filled_quantity: self.filled_quantity,
        }
    }

    /// Records a trade against this order. `price` is supplied by the caller
    /// (the matching loop) rather than read from `self.limit_price`, because
    /// the simulator convention is to stamp both sides of a match with the
    /// aggressor's price, not each order's own resting price.
    pub fn fill(&mut self, qty: u64, price: Decimal, trade_id: u64) -> Result<Trade, FillError> {
        let open = self.open_quantity();
        if qty > open {
            return Err(FillError::OverFill {
                requested: qty,
                open,
            });
        }
        self.filled_quantity += qty;
        let fill_type = if self.open_quantity() == 0 {
            self.status = OrderStatus::Filled;
            FillType::Complete
        } else {
            self.status = OrderStatus::PartiallyFilled;
            FillType::Partial
        };
        let trade = Trade {
            quantity: qty,
            limit_price: price,
            symbol: self.symbol.clone(),
            exch_order_id: self.exch_order_id,
            trade_id,
            fill_type,
            side: self.side,
        };
        self.trades.push(trade.clone());
        Ok(trade)
    }

    /// `timestamp_source` supplies a fresh sequence number for the refreshed
    /// order; the book increments its own counter and passes it in, since
    /// `Order` has no access to a shared clock/counter.
    pub fn revise(
        &mut self,
        revised_quantity: Option<u64>,
        revised_price: Option<Decimal>,
        new_timestamp: u64,
    ) -> Result<OrderResponse, ReviseError> {
        if let Some(qty) = revised_quantity {
            if qty < self.filled_quantity {
                return Err(ReviseError::QtyBelowFilled {
                    requested: qty,
                    filled: self.filled_quantity,
                });
            }
            self.quantity = qty;
            if self.open_quantity() == 0 {
                self.status = OrderStatus::Filled;
            }
        }

        if revised_price.is_some() && self.status == OrderStatus::Filled {
            return Err(ReviseError::PriceOnFilled);
        }
        if let Some(price) = revised_price {
            self.limit_price = price;
        }
        self.timestamp = new_timestamp;

        Ok(self.ack_response(Uuid::nil(), true, "Order revised successfully".to_string()))
    }

    pub fn cancel(&mut self) -> Result<OrderResponse, CancelError> {
        if self.status == OrderStatus::Filled {
            return Err(CancelError::CancelOnFilled);
        }
        self.status = OrderStatus::Cancelled;
        Ok(self.ack_response(
            Uuid::nil(),
            true,
            "Order cancellation is successful".to_string(),
        ))
    }

    /// Builds a response envelope wrapping this order's current params.
    /// `client_msg_id` is supplied by the caller because it belongs to the
    /// request, not to the order (a revise/cancel carries its own message
    /// id distinct from the one that created the order).
    pub fn ack_response(&self, client_msg_id: Uuid, status: bool, status_msg: String) -> OrderResponse {
        OrderResponse {
            client_msg_id,
            client_id: self.client_id.clone(),
            order_params: Some(self.to_params()),
            status,
            status_msg,
        }
    }
}

