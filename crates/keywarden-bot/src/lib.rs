//! Keywarden Bot
//!
//! Chat-operated admin panel for a software-licensing backend. The bot
//! receives inbound interaction events (slash commands, buttons, modals,
//! select menus) over an NDJSON seam, routes them through the action
//! dispatcher, mutates the entity store, and emits render effects that a
//! thin platform shim applies to the originating message.

pub mod audit;
pub mod commands;
pub mod dispatch;
pub mod frontend;
pub mod lifecycle;
pub mod status;
pub mod storage;
pub mod view;
