//! The iceberg order strategy: releases a large parent order to the
//! exchange as a sequence of same-size slices, only one of which is ever
//! live at a time.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::iceberg::gateway::ExchangeGateway;
use crate::iceberg::state::ParentState;
use crate::message::Side;

pub struct IcebergStrategy {
    gateway: Arc<dyn ExchangeGateway>,
    pub side: Side,
    pub limit_price: Decimal,
    pub total_quantity: u64,
    pub filled_quantity: u64,
    pub slice_size: u64,
    pub slice_filled_quantity: u64,
    pub slice_message_id: Option<Uuid>,
    pub slice_order_id: Option<u64>,
    pub last_slice_state: ParentState,
    pub parent_state: ParentState,
}

impl IcebergStrategy {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        side: Side,
        total_quantity: u64,
        slice_size: u64,
        limit_price: Decimal,
    ) -> Self {
        IcebergStrategy {
            gateway,
            side,
            limit_price,
            total_quantity,
            filled_quantity: 0,
            slice_size,
            slice_filled_quantity: 0,
            slice_message_id: None,
            slice_order_id: None,
            last_slice_state: ParentState::Pending,
            parent_state: ParentState::Pending,
        }
    }

    /// Sends out a fresh slice at the strategy's current `slice_size`. Called
    /// both for the initial slice and, transitively from `on_slice_fill`, for
    /// rollover — in the latter case the gateway send must not re-acquire any
    /// lock the caller is already holding, which is why `gateway` is a
    /// fire-and-forget trait object rather than something that talks back
    /// into the manager.
    pub fn submit(&mut self) {
        self.slice_filled_quantity = 0;
        self.slice_order_id = None;
        self.slice_message_id = Some(self.gateway.send_create_order_request(
            self.slice_size,
            self.limit_price,
            self.side,
        ));
        self.last_slice_state = ParentState::Sent;
        if self.parent_state != ParentState::PartiallyFilled {
            self.parent_state = ParentState::Sent;
        }
    }

    fn evaluate_and_slice(&mut self) {
        self.last_slice_state = if self.slice_filled_quantity == self.slice_size {
            ParentState::Filled
        } else if self.slice_filled_quantity > 0 {
            ParentState::PartiallyFilled
        } else {
            ParentState::Working
        };

        self.parent_state = if self.filled_quantity == self.total_quantity {
            ParentState::Filled
        } else if self.filled_quantity > 0 {
            ParentState::PartiallyFilled
        } else {
            ParentState::Working
        };

        if self.last_slice_state == ParentState::Filled && self.filled_quantity < self.total_quantity {
            self.submit();
        }
    }

    pub fn on_slice_created(&mut self, order_id: u64, status: bool) {
        if !status {
            warn!(order_id, "Order slice creation rejected");
            self.last_slice_state = ParentState::Rejected;
            self.parent_state = ParentState::Rejected;
            return;
        }
        self.slice_order_id = Some(order_id);
        self.last_slice_state = ParentState::Working;
        self.parent_state = ParentState::Working;
    }

    pub fn on_slice_fill(&mut self, filled_quantity: u64, status: bool) -> u64 {
        if !status {
            warn!(order_id = ?self.slice_order_id, "Received unsuccessful fill");
            return 0;
        }
        let delta = filled_quantity - self.slice_filled_quantity;
        self.slice_filled_quantity = filled_quantity;
        self.filled_quantity += delta;
        self.evaluate_and_slice();
        delta
    }

    pub fn revise(&mut self, revised_quantity: u64, revised_price: Decimal) {
        info!(
            revised_quantity,
            %revised_price,
            "Received revise request"
        );
        if !self.parent_state.is_active() || self.slice_order_id.is_none() {
            tracing::error!(
                "Order is of {:?} state and can not be revised",
                self.parent_state
            );
            return;
        }

        if revised_quantity <= self.filled_quantity {
            tracing::error!(
                "Can not update quantity to {}, already filled {}",
                revised_quantity,
                self.filled_quantity
            );
            return;
        }

        let revised_open_quantity = revised_quantity - self.filled_quantity;
        let slice_open_quantity = self.slice_size - self.slice_filled_quantity;
        let slice_order_id = self.slice_order_id.expect("checked above");

        // Unreachable given the guard above (revised_quantity > filled_quantity
        // always holds here), but kept as a deliberate no-op branch rather
        // than asserted away.
        if revised_open_quantity == 0 {
            info!("Cancelling outstanding slice as the revised quantity is already filled");
            self.gateway.send_cancel_order_request(slice_order_id);
            self.last_slice_state = ParentState::CancelSent;
            self.parent_state = ParentState::CancelSent;
            return;
        }

        // Preserved as observed in the reference implementation: this
        // revises the slice down to `slice_open_quantity` (the outstanding
        // slice's own remainder), not to `revised_open_quantity`.
        if slice_open_quantity > revised_open_quantity {
            info!(slice_open_quantity, "Revising down outstanding slice size");
            self.gateway
                .send_revise_order_request(slice_order_id, slice_open_quantity, revised_price);
            self.last_slice_state = ParentState::ReviseSent;
            self.parent_state = ParentState::ReviseSent;
            return;
        }

        if self.limit_price != revised_price {
            info!("Sending revise price request");
            self.gateway
                .send_revise_order_request(slice_order_id, self.slice_size, revised_price);
            self.last_slice_state = ParentState::ReviseSent;
            self.parent_state = ParentState::ReviseSent;
            return;
        }

        self.total_quantity = revised_quantity;
        self.limit_price = revised_price;
        info!("Updated hidden quantity and price without contacting the exchange");
    }

    pub fn on_revise_ack(&mut self, revised_quantity: u64, revised_price: Decimal, status: bool) {
        if self.last_slice_state != ParentState::ReviseSent {
            info!("Slice already moved on, no awaiting revise.");
            return;
        }

        if !status {
            self.last_slice_state = ParentState::Working;
            self.parent_state = ParentState::Working;
            return;
        }

        self.slice_size = revised_quantity;
        self.limit_price = revised_price;
        self.evaluate_and_slice();
    }

    pub fn cancel(&mut self) {
        if !self.last_slice_state.is_active() || self.slice_order_id.is_none() {
            warn!("Your order is in Transient State and cannot be modified");
            return;
        }

        let slice_order_id = self.slice_order_id.expect("checked above");
        self.gateway.send_cancel_order_request(slice_order_id);
        self.last_slice_state = ParentState::CancelSent;
        self.parent_state = ParentState::CancelSent;
    }

    pub fn on_cancel_ack(&mut self, status: bool) {
        if self.last_slice_state != ParentState::CancelSent {
            info!("Slice already moved on, no awaiting cancel.");
            return;
        }

        if !status {
            self.last_slice_state = ParentState::Working;
            self.parent_state = ParentState::Working;
            return;
        }

        self.last_slice_state = ParentState::Cancelled;
        self.parent_state = ParentState::Cancelled;
    }
}
