//! Single-symbol defaults. Non-goals rule out multi-symbol books and a
//! config-file layer, so this stays a couple of constants plus a plain
//! struct rather than growing a loader.

/// The only symbol an `OrderBook` needs to know about in this simulator.
pub const DEFAULT_SYMBOL: &str = "AUTOTRAD Equity";

/// Default slice size an iceberg uses when the caller doesn't specify one.
pub const DEFAULT_SLICE_SIZE: u64 = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            symbol: DEFAULT_SYMBOL.to_string(),
        }
    }
}
