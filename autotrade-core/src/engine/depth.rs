//! Builds the paired depth snapshot the spec calls for: bid rows and ask
//! rows collapsed by price level, then zipped row-by-row for presentation.
//! A side with fewer levels than the other contributes empty rows rather
//! than truncating the longer side (ground truth: `_build_market_depth` in
//! the Python original zips the two lists with an empty-string placeholder
//! for the exhausted side; `None` is the idiomatic analogue here).

use crate::engine::book::{OrderBook, PriceLevel};
use crate::message::DepthRow;

pub fn market_depth(book: &dyn OrderBook) -> Vec<DepthRow> {
    let bids = book.bid_levels();
    let asks = book.ask_levels();
    let rows = bids.len().max(asks.len());

    (0..rows)
        .map(|i| {
            let bid = bids.get(i);
            let ask = asks.get(i);
            DepthRow {
                bid: bid.map(|l: &PriceLevel| l.price),
                bid_volume: bid.map(|l| l.open_quantity),
                ask: ask.map(|l: &PriceLevel| l.price),
                ask_volume: ask.map(|l| l.open_quantity),
            }
        })
        .collect()
}
