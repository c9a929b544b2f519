pub mod gateway;
pub mod state;
pub mod strategy;

pub use gateway::ExchangeGateway;
pub use state::ParentState;
pub use strategy::IcebergStrategy;
