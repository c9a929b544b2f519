//! Owns the registry of iceberg parents and dispatches exchange responses to
//! the right one. A single mutex guards the whole registry and is held
//! across each handler body — dispatch lookup, delegation into the
//! strategy, and the read-back of `parent_state` all happen under one lock
//! acquisition, so a caller never observes a half-updated parent record.
//!
//! `IcebergStrategy::submit`, invoked transitively from `on_slice_fill`
//! during rollover, talks to the gateway directly rather than back through
//! this manager — so it never tries to re-enter the mutex this module
//! already holds while the handler runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, warn};
use uuid::Uuid;

use crate::iceberg::{ExchangeGateway, IcebergStrategy, ParentState};
use crate::message::{EngineResponse, Side};

struct ParentRecord {
    parent_id: Uuid,
    side: Side,
    quantity: u64,
    filled_quantity: u64,
    limit_price: Decimal,
    state: ParentState,
    updated_at: DateTime<Utc>,
    strategy: IcebergStrategy,
}

/// A read-only view of a parent record, returned from status queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentSnapshot {
    pub parent_id: Uuid,
    pub side: Side,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub limit_price: Decimal,
    pub state: ParentState,
    pub updated_at: DateTime<Utc>,
}

impl From<&ParentRecord> for ParentSnapshot {
    fn from(r: &ParentRecord) -> Self {
        ParentSnapshot {
            parent_id: r.parent_id,
            side: r.side,
            quantity: r.quantity,
            filled_quantity: r.filled_quantity,
            limit_price: r.limit_price,
            state: r.state,
            updated_at: r.updated_at,
        }
    }
}

pub struct StrategyManager {
    gateway: Arc<dyn ExchangeGateway>,
    registry: Mutex<HashMap<Uuid, ParentRecord>>,
}

impl StrategyManager {
    pub fn new(gateway: Arc<dyn ExchangeGateway>) -> Self {
        StrategyManager {
            gateway,
            registry: Mutex::new(HashMap::new()),
        }
    }

    pub fn create_iceberg(
        &self,
        side: Side,
        quantity: u64,
        limit_price: Decimal,
        slice_size: u64,
    ) -> Uuid {
        let parent_id = Uuid::new_v4();
        let mut strategy = IcebergStrategy::new(
            self.gateway.clone(),
            side,
            quantity,
            slice_size,
            limit_price,
        );
        strategy.submit();

        let record = ParentRecord {
            parent_id,
            side,
            quantity,
            filled_quantity: 0,
            limit_price,
            state: strategy.parent_state,
            updated_at: Utc::now(),
            strategy,
        };

        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        registry.insert(parent_id, record);
        parent_id
    }

    /// Finds the parent owning the slice identified by `order_id` (preferred)
    /// or, before the engine has assigned an `exch_order_id`, by the
    /// `client_msg_id` the slice was sent with.
    fn find_parent(&self, registry: &HashMap<Uuid, ParentRecord>, order_id: Option<u64>, client_msg_id: Option<Uuid>) -> Option<Uuid> {
        registry
            .values()
            .find(|r| {
                order_id.is_some() && r.strategy.slice_order_id == order_id
                    || client_msg_id.is_some() && r.strategy.slice_message_id == client_msg_id
            })
            .map(|r| r.parent_id)
    }

    pub fn on_create_resp(&self, response: &EngineResponse) {
        let EngineResponse::OrderResponse(resp) = response else {
            // A FillOrderResponse can arrive on the create channel as an
            // ordering artifact of the transport; route it like any fill.
            self.on_fill_resp(response);
            return;
        };
        let Some(params) = &resp.order_params else {
            warn!("Received create response with no order params, nothing to dispatch");
            return;
        };
        let order_id = params.exch_order_id;

        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(parent_id) = self.find_parent(&registry, Some(order_id), Some(resp.client_msg_id)) else {
            error!(order_id, "Could not find parent for create response");
            return;
        };

        let record = registry.get_mut(&parent_id).expect("looked up above");
        record.strategy.on_slice_created(order_id, resp.status);
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    pub fn on_fill_resp(&self, response: &EngineResponse) {
        let EngineResponse::FillOrderResponse(resp) = response else {
            warn!("on_fill_resp received a non-fill response");
            return;
        };
        let order_id = resp.order_params.exch_order_id;

        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(parent_id) = self.find_parent(&registry, Some(order_id), None) else {
            error!(order_id, "Could not find parent for fill response");
            return;
        };

        let record = registry.get_mut(&parent_id).expect("looked up above");
        let delta = record
            .strategy
            .on_slice_fill(resp.order_params.filled_quantity, resp.status);
        record.filled_quantity += delta;
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    pub fn revise(&self, parent_id: Uuid, revised_quantity: u64, revised_price: Decimal) {
        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(record) = registry.get_mut(&parent_id) else {
            error!(%parent_id, "Could not find order to revise it");
            return;
        };
        record.strategy.revise(revised_quantity, revised_price);
        record.quantity = revised_quantity;
        record.limit_price = revised_price;
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    pub fn on_revise_resp(&self, response: &EngineResponse) {
        let EngineResponse::OrderResponse(resp) = response else {
            self.on_fill_resp(response);
            return;
        };
        if !resp.status {
            warn!(status_msg = %resp.status_msg, "Received an error on revise response");
            return;
        }
        let Some(params) = &resp.order_params else {
            warn!("Received revise response with no order params, nothing to dispatch");
            return;
        };
        let order_id = params.exch_order_id;

        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(parent_id) = self.find_parent(&registry, Some(order_id), Some(resp.client_msg_id)) else {
            error!(order_id, "Could not find parent for revise response");
            return;
        };

        let record = registry.get_mut(&parent_id).expect("looked up above");
        record
            .strategy
            .on_revise_ack(params.quantity, params.limit_price, resp.status);
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    pub fn cancel(&self, parent_id: Uuid) {
        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(record) = registry.get_mut(&parent_id) else {
            error!(%parent_id, "Could not find parent to cancel it");
            return;
        };
        record.strategy.cancel();
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    pub fn on_cancel_resp(&self, response: &EngineResponse) {
        let EngineResponse::OrderResponse(resp) = response else {
            warn!("on_cancel_resp received an unexpected fill response");
            return;
        };
        let Some(params) = &resp.order_params else {
            warn!("Received cancel response with no order params, nothing to dispatch");
            return;
        };
        let order_id = params.exch_order_id;

        let mut registry = self.registry.lock().expect("registry mutex poisoned");
        let Some(parent_id) = self.find_parent(&registry, Some(order_id), Some(resp.client_msg_id)) else {
            error!(order_id, "Could not find parent for cancel response");
            return;
        };

        let record = registry.get_mut(&parent_id).expect("looked up above");
        record.strategy.on_cancel_ack(resp.status);
        record.state = record.strategy.parent_state;
        record.updated_at = Utc::now();
    }

    /// Returns `(completed, pending)`, each sorted by `updated_at` descending.
    pub fn status(&self) -> (Vec<ParentSnapshot>, Vec<ParentSnapshot>) {
        let registry = self.registry.lock().expect("registry mutex poisoned");
        let mut completed: Vec<ParentSnapshot> = Vec::new();
        let mut pending: Vec<ParentSnapshot> = Vec::new();
        for record in registry.values() {
            if record.state.is_terminal() {
                completed.push(record.into());
            } else {
                pending.push(record.into());
            }
        }
        completed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        pending.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        (completed, pending)
    }

    pub fn parent_snapshot(&self, parent_id: Uuid) -> Option<ParentSnapshot> {
        let registry = self.registry.lock().expect("registry mutex poisoned");
        registry.get(&parent_id).map(|r| r.into())
    }
}
