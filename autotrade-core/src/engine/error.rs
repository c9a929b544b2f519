use thiserror::Error;

use crate::order::{CancelError, FillError, ReviseError};

/// Errors surfaced by `OrderBook` request handlers. These never propagate as
/// exceptions to a caller — every variant here is converted to
/// `status=false` + `status_msg` on an `OrderResponse` before it leaves the
/// book (see `engine::book`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Order id: {0} does not exist in the order book")]
    UnknownOrder(u64),

    #[error("Completed Order id: {0} cannot be updated")]
    CompletedOrderImmutable(u64),

    #[error(transparent)]
    Revise(#[from] ReviseError),

    #[error(transparent)]
    Cancel(#[from] CancelError),
}

/// Raised only inside the matching loop, never returned from a public
/// operation: the book guards against over-fill before calling `Order::fill`,
/// so this indicates an internal invariant break rather than bad input. The
/// book catches it and degrades to a warning (spec: "logged, response
/// dropped").
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchingError {
    #[error(transparent)]
    OverFill(#[from] FillError),
}
