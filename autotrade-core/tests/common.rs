use std::sync::Mutex;

use autotrade_core::prelude::*;
use rust_decimal::Decimal;

/// Records every send the strategy makes instead of talking to a real bus,
/// so tests can assert on exactly what was sent without a running engine.
#[derive(Default)]
pub struct RecordingGateway {
    pub creates: Mutex<Vec<(u64, Decimal, Side)>>,
    pub revises: Mutex<Vec<(u64, u64, Decimal)>>,
    pub cancels: Mutex<Vec<u64>>,
}

impl ExchangeGateway for RecordingGateway {
    fn send_create_order_request(&self, quantity: u64, limit_price: Decimal, side: Side) -> Uuid {
        self.creates.lock().unwrap().push((quantity, limit_price, side));
        Uuid::new_v4()
    }

    fn send_revise_order_request(
        &self,
        order_id: u64,
        revised_quantity: u64,
        revised_price: Decimal,
    ) -> Uuid {
        self.revises
            .lock()
            .unwrap()
            .push((order_id, revised_quantity, revised_price));
        Uuid::new_v4()
    }

    fn send_cancel_order_request(&self, order_id: u64) -> Uuid {
        self.cancels.lock().unwrap().push(order_id);
        Uuid::new_v4()
    }
}
