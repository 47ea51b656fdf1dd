use csvrec::{Record, TextCodec};

// ═══════════════════════════════════════════════════════════════
//  Ticker
// ═══════════════════════════════════════════════════════════════

/// Instrument symbol, stored upper-case (e.g. `EURUSD`, `XAUUSD`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ticker(String);

#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("empty symbol")]
    Empty,

    #[error("symbol {0:?} must be ASCII alphanumeric, at most 12 characters")]
    Invalid(String),
}

impl Ticker {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TextCodec for Ticker {
    type Error = TickerError;

    fn encode_text(&self) -> Result<String, Self::Error> {
        Ok(self.0.clone())
    }

    fn decode_text(text: &str) -> Result<Self, Self::Error> {
        let symbol = text.trim();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        if symbol.len() > 12 || !symbol.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(TickerError::Invalid(symbol.to_string()));
        }
        Ok(Ticker(symbol.to_ascii_uppercase()))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Quote
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Quote {
    pub symbol: Ticker,
    pub bid: f64,
    pub ask: f64,
    #[csv(rename = "ts")]
    pub ts_ms: i64,
}

impl Quote {
    /// Crossed book: ask below bid.
    pub fn is_crossed(&self) -> bool {
        self.ask < self.bid
    }
}
