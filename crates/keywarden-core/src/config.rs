//! Panel configuration.
//!
//! Resolution order: built-in defaults, then environment variables, then
//! CLI arguments (the binary feeds parsed flags in last). All values are
//! optional except the operator role allow-set, which must be non-empty
//! for any privileged command to succeed.

use serde::{Deserialize, Serialize};

/// Complete panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelConfig {
    /// Role ids whose holders may invoke privileged commands.
    #[serde(default)]
    pub allowed_role_ids: Vec<String>,
    /// Webhook URL for the audit sink; absent means console fallback only.
    #[serde(default)]
    pub audit_webhook_url: Option<String>,
    /// Channel id for the periodic status report; absent is a silent no-op.
    #[serde(default)]
    pub status_channel_id: Option<String>,
    /// Health endpoint probed by the status report (GET `<url>/health`).
    #[serde(default)]
    pub health_endpoint: Option<String>,
}

impl PanelConfig {
    /// Parse a comma-separated role-id list (the `KEYWARDEN_ROLE_IDS`
    /// format); whitespace around ids is trimmed, empty entries dropped.
    pub fn parse_role_ids(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether a principal holding `roles` clears the allow-set.
    pub fn is_authorized(&self, roles: &[String]) -> bool {
        roles.iter().any(|r| self.allowed_role_ids.contains(r))
    }
}
