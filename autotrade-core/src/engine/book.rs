//! The limit order book: two price-time-sorted sides plus a completed-order
//! archive, and the three request operations that mutate them.
//!
//! The comparator that decides priority within a side lives here, not on
//! `Order` — an order's relative position depends on which side's container
//! it lives in, and each side only ever holds orders of its own `Side`, so a
//! single free function is enough (spec design note: "the price-time-priority
//! comparator belongs to the book, not the order").

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::engine::error::{MatchingError, RequestError};
use crate::message::{EngineResponse, FillOrderResponse, OrderResponse, Side};
use crate::order::Order;

/// Orders on the same side compare by price priority first (best price
/// first), then by ascending timestamp. Buy-side price priority is
/// descending (higher bids are better); sell-side is ascending (lower asks
/// are better). Both sides break ties the same way: earlier timestamp wins.
fn priority_cmp(side: Side, a: &Order, b: &Order) -> Ordering {
    let price_order = match side {
        Side::Buy => b.limit_price.cmp(&a.limit_price),
        Side::Sell => a.limit_price.cmp(&b.limit_price),
    };
    price_order.then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Whether an incoming order at `incoming_price` crosses a resting order at
/// `resting_price` sitting on the opposite side.
fn crosses(incoming_side: Side, incoming_price: Decimal, resting_price: Decimal) -> bool {
    match incoming_side {
        Side::Buy => resting_price <= incoming_price,
        Side::Sell => resting_price >= incoming_price,
    }
}

/// One row of an aggregated price level, used to build depth snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub open_quantity: u64,
}

/// A single symbol's book: two sorted live sides and an archive of orders
/// that reached a terminal state.
pub trait OrderBook {
    fn create_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        side: Side,
        quantity: u64,
        limit_price: Decimal,
    ) -> Vec<EngineResponse>;

    fn revise_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
        revised_quantity: Option<u64>,
        revised_price: Option<Decimal>,
    ) -> Vec<EngineResponse>;

    fn cancel_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
    ) -> Vec<EngineResponse>;

    fn bid_levels(&self) -> Vec<PriceLevel>;
    fn ask_levels(&self) -> Vec<PriceLevel>;
}

pub struct DefaultOrderBook {
    symbol: String,
    bids: Vec<Order>,
    asks: Vec<Order>,
    completed_orders: HashMap<u64, Order>,
    next_order_id: u64,
    next_trade_id: u64,
    next_timestamp: u64,
}

impl DefaultOrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        DefaultOrderBook {
            symbol: symbol.into(),
            bids: Vec::new(),
            asks: Vec::new(),
            completed_orders: HashMap::new(),
            next_order_id: 1,
            next_trade_id: 1,
            next_timestamp: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        let t = self.next_timestamp;
        self.next_timestamp += 1;
        t
    }

    fn alloc_order_id(&mut self) -> u64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id
    }

    fn alloc_trade_id(&mut self) -> u64 {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        id
    }

    fn live_side(&self, side: Side) -> &Vec<Order> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn live_side_mut(&mut self, side: Side) -> &mut Vec<Order> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Finds a live order by id regardless of side, returning its side and
    /// index for callers that need to remove or reinsert it.
    fn find_live(&self, order_id: u64) -> Option<(Side, usize)> {
        self.bids
            .iter()
            .position(|o| o.exch_order_id == order_id)
            .map(|i| (Side::Buy, i))
            .or_else(|| {
                self.asks
                    .iter()
                    .position(|o| o.exch_order_id == order_id)
                    .map(|i| (Side::Sell, i))
            })
    }

    fn insert_sorted(&mut self, order: Order) {
        let side = order.side;
        let book = self.live_side_mut(side);
        let pos = book
            .binary_search_by(|existing| priority_cmp(side, existing, &order))
            .unwrap_or_else(|p| p);
        book.insert(pos, order);
    }

    fn archive(&mut self, order: Order) {
        self.completed_orders.insert(order.exch_order_id, order);
    }

    /// `status_msg` is always "Order filled successfully" regardless of
    /// whether the order ended up partially or completely filled — ground
    /// truth: `Order.fill` in the Python original returns this exact text
    /// unconditionally.
    fn fill_response(&self, order: &Order, trade: crate::message::Trade) -> EngineResponse {
        EngineResponse::FillOrderResponse(FillOrderResponse {
            client_id: order.client_id.clone(),
            order_params: order.to_params(),
            trade,
            status: true,
            status_msg: "Order filled successfully".to_string(),
        })
    }

    /// Runs `incoming` against the opposite live side until it stops
    /// crossing, it fully fills, or the book is exhausted. Fully filled
    /// resting orders are removed from the live side and archived. Returns
    /// the fill responses produced, in aggressor-then-counter-order per
    /// match, matching engine order across matches.
    fn run_matching(&mut self, incoming: &mut Order) -> Vec<EngineResponse> {
        let mut responses = Vec::new();
        let opposite = incoming.side.opposite();

        loop {
            if incoming.open_quantity() == 0 {
                break;
            }
            let best_idx = 0;
            let best_price = match self.live_side(opposite).get(best_idx) {
                Some(resting) => resting.limit_price,
                None => break,
            };
            if !crosses(incoming.side, incoming.limit_price, best_price) {
                break;
            }

            let fill_qty = {
                let resting = &self.live_side(opposite)[best_idx];
                incoming.open_quantity().min(resting.open_quantity())
            };
            let trade_id = self.alloc_trade_id();
            let trade_price = incoming.limit_price;

            let incoming_trade = match incoming.fill(fill_qty, trade_price, trade_id) {
                Ok(trade) => trade,
                Err(err) => {
                    let err = MatchingError::from(err);
                    warn!(error = %err, "matching produced an over-fill on the aggressor, dropping response");
                    break;
                }
            };
            responses.push(self.fill_response(incoming, incoming_trade));

            let resting = &mut self.live_side_mut(opposite)[best_idx];
            let resting_trade = match resting.fill(fill_qty, trade_price, trade_id) {
                Ok(trade) => trade,
                Err(err) => {
                    let err = MatchingError::from(err);
                    warn!(error = %err, "matching produced an over-fill on the resting order, dropping response");
                    break;
                }
            };
            responses.push(self.fill_response(resting, resting_trade));

            if resting.is_terminal() {
                let filled = self.live_side_mut(opposite).remove(best_idx);
                self.archive(filled);
            }
        }

        responses
    }

    fn levels_for(side_orders: &[Order]) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = Vec::new();
        for order in side_orders {
            match levels.last_mut() {
                Some(level) if level.price == order.limit_price => {
                    level.open_quantity += order.open_quantity();
                }
                _ => levels.push(PriceLevel {
                    price: order.limit_price,
                    open_quantity: order.open_quantity(),
                }),
            }
        }
        levels
    }
}

impl OrderBook for DefaultOrderBook {
    fn create_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        side: Side,
        quantity: u64,
        limit_price: Decimal,
    ) -> Vec<EngineResponse> {
        let order_id = self.alloc_order_id();
        let timestamp = self.tick();
        let mut order = Order::new(
            order_id,
            client_id,
            client_msg_id,
            side,
            self.symbol.clone(),
            limit_price,
            quantity,
            timestamp,
        );

        let mut responses = vec![EngineResponse::OrderResponse(order.ack_response(
            client_msg_id,
            true,
            "Successful order creation".to_string(),
        ))];

        responses.extend(self.run_matching(&mut order));

        if order.is_terminal() {
            self.archive(order);
        } else {
            self.insert_sorted(order);
        }

        responses
    }

    fn revise_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
        revised_quantity: Option<u64>,
        revised_price: Option<Decimal>,
    ) -> Vec<EngineResponse> {
        if self.completed_orders.contains_key(&order_id) {
            return vec![not_found_response(
                client_msg_id,
                client_id,
                RequestError::CompletedOrderImmutable(order_id).to_string(),
            )];
        }

        let Some((side, idx)) = self.find_live(order_id) else {
            return vec![not_found_response(
                client_msg_id,
                client_id,
                RequestError::UnknownOrder(order_id).to_string(),
            )];
        };

        let mut order = self.live_side_mut(side).remove(idx);
        let new_timestamp = self.tick();
        let revise_result = order.revise(revised_quantity, revised_price, new_timestamp);

        let mut responses = Vec::new();
        match revise_result {
            Ok(mut ack) => {
                ack.client_msg_id = client_msg_id;
                ack.client_id = client_id;
                responses.push(EngineResponse::OrderResponse(ack));
            }
            Err(err) => {
                let status_msg = RequestError::from(err).to_string();
                let mut ack = order.ack_response(client_msg_id, false, status_msg);
                ack.client_id = client_id;
                self.insert_sorted(order);
                return vec![EngineResponse::OrderResponse(ack)];
            }
        }

        responses.extend(self.run_matching(&mut order));

        if order.is_terminal() {
            self.archive(order);
        } else {
            self.insert_sorted(order);
        }

        responses
    }

    fn cancel_order_request(
        &mut self,
        client_msg_id: Uuid,
        client_id: String,
        order_id: u64,
    ) -> Vec<EngineResponse> {
        if self.completed_orders.contains_key(&order_id) {
            return vec![not_found_response(
                client_msg_id,
                client_id,
                RequestError::CompletedOrderImmutable(order_id).to_string(),
            )];
        }

        let Some((side, idx)) = self.find_live(order_id) else {
            return vec![not_found_response(
                client_msg_id,
                client_id,
                RequestError::UnknownOrder(order_id).to_string(),
            )];
        };

        let mut order = self.live_side_mut(side).remove(idx);
        match order.cancel() {
            Ok(mut ack) => {
                ack.client_msg_id = client_msg_id;
                ack.client_id = client_id;
                self.archive(order);
                vec![EngineResponse::OrderResponse(ack)]
            }
            Err(err) => {
                let status_msg = RequestError::from(err).to_string();
                let mut ack = order.ack_response(client_msg_id, false, status_msg);
                ack.client_id = client_id;
                self.insert_sorted(order);
                vec![EngineResponse::OrderResponse(ack)]
            }
        }
    }

    fn bid_levels(&self) -> Vec<PriceLevel> {
        Self::levels_for(&self.bids)
    }

    fn ask_levels(&self) -> Vec<PriceLevel> {
        Self::levels_for(&self.asks)
    }
}

fn not_found_response(client_msg_id: Uuid, client_id: String, status_msg: String) -> EngineResponse {
    EngineResponse::OrderResponse(OrderResponse {
        client_msg_id,
        client_id,
        order_params: None,
        status: false,
        status_msg,
    })
}

