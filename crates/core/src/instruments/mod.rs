//! Tracked instruments.
//!
//! Instruments are created by an administrative load step; the collector
//! only ever reads them.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// A tracked market instrument (equity symbol).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Stable identifier; equals the symbol for equities.
    pub id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub is_active: bool,
}

/// Symbols collected when the instruments table has not been seeded yet.
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "VNM", "VCB", "FPT", "HPG", "GAS", "VIC", "VHM", "MSN", "ACB", "BID", "CTG", "MBB", "STB",
    "TCB", "VPB",
];

/// Repository trait for reading the instrument universe.
pub trait InstrumentRepositoryTrait: Send + Sync {
    /// All active instruments, ordered by symbol.
    fn get_active(&self) -> Result<Vec<Instrument>>;
}

/// Build the built-in default universe.
pub fn default_instruments() -> Vec<Instrument> {
    DEFAULT_SYMBOLS
        .iter()
        .map(|symbol| Instrument {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            name: None,
            is_active: true,
        })
        .collect()
}
