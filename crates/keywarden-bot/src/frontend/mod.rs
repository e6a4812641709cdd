//! Platform front end: NDJSON codec and the stdio event loop.

pub mod codec;
pub mod stdio;

pub use codec::{InboundEnvelope, Outbound, parse_line};
pub use stdio::run;
