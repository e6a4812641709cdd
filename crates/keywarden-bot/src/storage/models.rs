//! Database models for the Keywarden entity store.

use serde::{Deserialize, Serialize};

/// App record: a licensable product namespace.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct App {
    /// Store-assigned identity (stable across renames).
    pub id: String,
    /// Unique human-chosen key; mutable via rename.
    pub app_id: String,
    pub name: Option<String>,
    pub active: bool,
    pub created_at: i64,
}

/// License record: one issuable credential scoped to an app.
///
/// Only the key digest is persisted; the plaintext exists transiently at
/// creation. Display status (Banned/Expired/Active/Inactive) is derived
/// at render time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct License {
    pub id: String,
    pub key_digest: String,
    pub app_id: String,
    pub active: bool,
    /// `None` means non-expiring; distinct from expired.
    pub expires_at: Option<i64>,
    /// Bound on first use by the external activation flow.
    pub hwid: Option<String>,
    pub last_ip: Option<String>,
    pub last_login_at: Option<i64>,
    pub created_at: i64,
}

/// Denylist row: a globally barred hardware id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BannedHwid {
    pub hwid: String,
    pub reason: String,
    pub created_at: i64,
}
