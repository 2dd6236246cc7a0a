//! Symbol records, the deduplicating store, and response decoders
//!
//! The crawl core never looks at the response schema. A [`Decoder`] turns one
//! JSON body into records plus the result count the API reported, and the
//! [`SymbolStore`] keeps the latest record seen for each ticker.

mod decoder;
mod record;
mod store;

pub use decoder::{DecodeError, Decoded, Decoder, SymbolKind, YahooDecoder};
pub use record::SymbolRecord;
pub use store::SymbolStore;
