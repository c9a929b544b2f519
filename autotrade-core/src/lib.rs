//! A two-sided trading sandbox: a limit order book matching engine and a
//! client-side iceberg strategy manager, connected by an in-process message
//! bus. See `engine` for the book, `iceberg` and `manager` for the client
//! side, and `bus` for the glue between them.

pub mod bus;
pub mod config;
pub mod engine;
pub mod iceberg;
pub mod manager;
pub mod message;
pub mod order;

pub mod prelude {
    pub use crate::bus::{BusGateway, MessageBus};
    pub use crate::config::{EngineConfig, DEFAULT_SLICE_SIZE, DEFAULT_SYMBOL};
    pub use crate::engine::{ConcurrentOrderBook, DefaultOrderBook, OrderBook};
    pub use crate::iceberg::{ExchangeGateway, IcebergStrategy, ParentState};
    pub use crate::manager::{ParentSnapshot, StrategyManager};
    pub use crate::message::*;
    pub use crate::order::{CancelError, FillError, Order, ReviseError};
    pub use uuid::Uuid;
}
