//! A minimal in-process stand-in for the event-oriented message bus
//! connecting the two subsystems. This is not a transport: no bytes cross a
//! socket and nothing is serialized at this boundary. It exists so the
//! engine and the client strategy can be driven together end-to-end —
//! `ConcurrentOrderBook` on one side, `IcebergStrategy`/`StrategyManager` on
//! the other — without inventing a wire protocol, which is explicitly out of
//! scope.
//!
//! Routing discipline mirrors the engine's own: a response is only ever
//! handed to the channel registered under the `client_id` it names.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::ConcurrentOrderBook;
use crate::iceberg::ExchangeGateway;
use crate::message::{CancelOrderRequest, CreateOrderRequest, EngineResponse, ReviseOrderRequest, Side};

/// Routes engine responses to the channel registered for their `client_id`.
/// `create_order_request`/friends on `ConcurrentOrderBook` already serialize
/// through its own mutex, so the bus itself only needs to protect the
/// routing table, not order matching.
pub struct MessageBus {
    book: Arc<ConcurrentOrderBook>,
    routes: Mutex<HashMap<String, Sender<EngineResponse>>>,
}

impl MessageBus {
    pub fn new(book: Arc<ConcurrentOrderBook>) -> Self {
        MessageBus {
            book,
            routes: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a client and returns the receiving end of its private
    /// response channel ("room"), matching the per-`client_id` routing
    /// discipline responses are delivered under.
    pub fn register(&self, client_id: impl Into<String>) -> Receiver<EngineResponse> {
        let (tx, rx) = mpsc::channel();
        self.routes
            .lock()
            .expect("routing table mutex poisoned")
            .insert(client_id.into(), tx);
        rx
    }

    pub fn submit_create(&self, request: CreateOrderRequest) {
        let responses = self.book.create_order_request(
            request.client_msg_id,
            request.client_id.clone(),
            request.side,
            request.quantity,
            request.limit_price,
        );
        self.deliver(&request.client_id, responses);
    }

    pub fn submit_revise(&self, request: ReviseOrderRequest) {
        let responses = self.book.revise_order_request(
            request.client_msg_id,
            request.client_id.clone(),
            request.order_id,
            request.revised_quantity,
            request.revised_price,
        );
        self.deliver(&request.client_id, responses);
    }

    pub fn submit_cancel(&self, request: CancelOrderRequest) {
        let responses = self.book.cancel_order_request(
            request.client_msg_id,
            request.client_id.clone(),
            request.order_id,
        );
        self.deliver(&request.client_id, responses);
    }

    fn deliver(&self, client_id: &str, responses: Vec<EngineResponse>) {
        let routes = self.routes.lock().expect("routing table mutex poisoned");
        let Some(tx) = routes.get(client_id) else {
            tracing::warn!(client_id, "No registered route for client, dropping responses");
            return;
        };
        for response in responses {
            // mpsc::Sender::send only fails if the receiver was dropped; a
            // client that stopped listening simply misses its responses.
            let _ = tx.send(response);
        }
    }
}

/// Binds a single `client_id` to a bus, giving `IcebergStrategy` the
/// fire-and-forget send surface it needs. Each `send_*` call stamps a fresh
/// `client_msg_id`, submits the request, and returns without waiting for a
/// response — the response arrives later on the client's registered
/// channel.
pub struct BusGateway {
    bus: Arc<MessageBus>,
    client_id: String,
}

impl BusGateway {
    pub fn new(bus: Arc<MessageBus>, client_id: impl Into<String>) -> Self {
        BusGateway {
            bus,
            client_id: client_id.into(),
        }
    }
}

impl ExchangeGateway for BusGateway {
    fn send_create_order_request(&self, quantity: u64, limit_price: Decimal, side: Side) -> Uuid {
        let client_msg_id = Uuid::new_v4();
        self.bus.submit_create(CreateOrderRequest {
            client_msg_id,
            client_id: self.client_id.clone(),
            quantity,
            limit_price,
            side,
        });
        client_msg_id
    }

    fn send_revise_order_request(
        &self,
        order_id: u64,
        revised_quantity: u64,
        revised_price: Decimal,
    ) -> Uuid {
        let client_msg_id = Uuid::new_v4();
        self.bus.submit_revise(ReviseOrderRequest {
            client_msg_id,
            client_id: self.client_id.clone(),
            order_id,
            revised_quantity: Some(revised_quantity),
            revised_price: Some(revised_price),
        });
        client_msg_id
    }

    fn send_cancel_order_request(&self, order_id: u64) -> Uuid {
        let client_msg_id = Uuid::new_v4();
        self.bus.submit_cancel(CancelOrderRequest {
            client_msg_id,
            client_id: self.client_id.clone(),
            order_id,
        });
        client_msg_id
    }
}
