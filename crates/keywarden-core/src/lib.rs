//! Keywarden Core Library
//!
//! Shared functionality for Keywarden components:
//! - Callback-identifier codec for interactive components
//! - Pagination math for list browsers
//! - Duration tokens for license creation
//! - Panel configuration and common error types

pub mod callback;
pub mod config;
pub mod db;
pub mod duration;
pub mod error;
pub mod pagination;
pub mod tracing_init;

pub use callback::{Action, AppAction, CallbackId, DecodeError, Domain, LicenseAction};
pub use config::PanelConfig;
pub use duration::DurationToken;
pub use error::{Error, Result};
pub use pagination::Page;
