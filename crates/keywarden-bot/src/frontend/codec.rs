//! NDJSON wire codec for the platform seam.
//!
//! Inbound lines come from the platform shim; the reader is tolerant:
//! a line that is not valid JSON, or lacks the fields a kind requires,
//! is dropped with a debug log and never aborts the stream. Outbound
//! lines are plain serde serializations of [`Outbound`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::dispatch::{Effect, Interaction, Invoker};
use crate::view::Document;

/// One inbound interaction with its platform correlation id.
#[derive(Debug, Clone)]
pub struct InboundEnvelope {
    pub interaction_id: String,
    pub interaction: Interaction,
}

/// One outbound line to the platform shim.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    /// Effects to apply to the interaction with the given id.
    Response {
        interaction_id: String,
        effects: Vec<Effect>,
    },
    /// Unprompted message to a channel (status reports).
    ChannelMessage { channel_id: String, document: Document },
}

/// Parse one inbound NDJSON line. `None` means "drop this line".
pub fn parse_line(line: &str) -> Option<InboundEnvelope> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("dropping non-JSON line: {e}");
            return None;
        }
    };

    let interaction_id = value.get("id")?.as_str()?.to_string();
    let kind = value.get("kind")?.as_str()?;

    let interaction = match kind {
        "command" => Interaction::Command {
            name: str_field(&value, "name")?,
            options: map_field(&value, "options"),
            invoker: invoker_of(&value),
        },
        "autocomplete" => Interaction::Autocomplete {
            name: str_field(&value, "name")?,
            focused: str_field(&value, "focused").unwrap_or_default(),
        },
        "button" => Interaction::Button {
            custom_id: str_field(&value, "custom_id")?,
            invoker: invoker_of(&value),
        },
        "select" => Interaction::Select {
            custom_id: str_field(&value, "custom_id")?,
            values: value
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(scalar_to_string).collect())
                .unwrap_or_default(),
            invoker: invoker_of(&value),
        },
        "modal" => Interaction::Form {
            custom_id: str_field(&value, "custom_id")?,
            fields: map_field(&value, "fields"),
            invoker: invoker_of(&value),
        },
        other => {
            tracing::debug!(kind = other, "dropping line of unknown kind");
            return None;
        }
    };

    Some(InboundEnvelope { interaction_id, interaction })
}

fn str_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Scalars only; nested values in an option map are shim bugs we tolerate
/// by stringifying numbers and booleans and dropping the rest.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn map_field(value: &Value, name: &str) -> BTreeMap<String, String> {
    value
        .get(name)
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

fn invoker_of(value: &Value) -> Invoker {
    let Some(obj) = value.get("invoker") else {
        return Invoker::default();
    };

    Invoker {
        user_id: str_field(obj, "user_id").unwrap_or_default(),
        username: str_field(obj, "username").unwrap_or_else(|| "unknown".to_string()),
        role_ids: obj
            .get("role_ids")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(scalar_to_string).collect())
            .unwrap_or_default(),
    }
}
