//! The client-side sending surface an `IcebergStrategy` talks to. Mirrors
//! `ExchangeClient`'s three `send_*` methods minus the socket.io transport:
//! each call stamps a fresh `client_msg_id`, enqueues the request, and
//! returns immediately — the strategy never blocks waiting for the engine's
//! response, and in particular must not block while called back from inside
//! `on_slice_fill`'s rollover `submit()`.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::message::Side;

pub trait ExchangeGateway: Send + Sync {
    fn send_create_order_request(&self, quantity: u64, limit_price: Decimal, side: Side) -> Uuid;

    fn send_revise_order_request(
        &self,
        order_id: u64,
        revised_quantity: u64,
        revised_price: Decimal,
    ) -> Uuid;

    fn send_cancel_order_request(&self, order_id: u64) -> Uuid;
}
