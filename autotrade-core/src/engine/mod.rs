pub mod book;
pub mod concurrent;
pub mod depth;
pub mod error;

pub use book::{DefaultOrderBook, OrderBook, PriceLevel};
pub use concurrent::ConcurrentOrderBook;
pub use error::{MatchingError, RequestError};
