//! Entity store: database connection, models, and typed queries.

pub mod db;
pub mod models;
pub mod queries;

pub use db::Database;
pub use keywarden_core::db::DatabaseError;
pub use models::{App, BannedHwid, License};
