//! Serializes engine access behind a single mutex, per the concurrency
//! model: "one in-flight request at a time is sufficient and simplest."
//! There is no lock-free structure underneath — requests may arrive from
//! distinct transport workers, but each one runs to completion (including
//! all of its cross-matches) before the next is admitted.

use std::sync::Mutex;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::book::{DefaultOrderBook, OrderBook};
use crate::engine::depth;
use crate::message::{DepthRow, EngineResponse, Side};

pub struct ConcurrentOrderBook {
    inner: Mutex<DefaultOrderBook>,
}

impl ConcurrentOrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        ConcurrentOrderBook {
            inner: Mutex::new(DefaultOrderBook::new(symbol)),
        }
    }

    pub fn create_order_request(
        &self,
        client_msg_id: Uuid,
        client_id: String,
        side: Side,
        quantity: u64,
        limit_price: Decimal,
    ) -> Vec<EngineResponse> {
        let mut book = self.inner.lock().expect("order book mutex poisoned");
        book.create_order_request(client_msg_id, client_id, side, quantity, limit_price)
    }

    pub fn revise_order_request(
        &self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
        revised_quantity: Option<u64>,
        revised_price: Option<Decimal>,
    ) -> Vec<EngineResponse> {
        let mut book = self.inner.lock().expect("order book mutex poisoned");
        book.revise_order_request(
            client_msg_id,
            client_id,
            order_id,
            revised_quantity,
            revised_price,
        )
    }

    pub fn cancel_order_request(
        &self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
    ) -> Vec<EngineResponse> {
        let mut book = self.inner.lock().expect("order book mutex poisoned");
        book.cancel_order_request(client_msg_id, client_id, order_id)
    }

    /// Takes the same request lock as the mutating operations, so a depth
    /// read always observes a consistent snapshot rather than racing a
    /// concurrent create/revise/cancel.
    pub fn market_depth(&self) -> Vec<DepthRow> {
        let book = self.inner.lock().expect("order book mutex poisoned");
        depth::market_depth(&*book)
    }
}
