//! View renderer.
//!
//! Pure functions from entity snapshots to platform-agnostic render
//! structures. The platform shim maps `Document` to a rich embed and
//! `ActionRow`/`Form` to native components; nothing here talks to the
//! network or the store.

pub mod app;
pub mod license;
pub mod lists;

use chrono::{TimeZone, Utc};
use serde::Serialize;

/// Outcome class of a rendered panel, mapped to an accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Neutral,
}

impl Severity {
    pub const fn color(self) -> u32 {
        match self {
            Self::Success => 0x00FF00,
            Self::Error => 0xFF0000,
            Self::Warning => 0xFFFF00,
            Self::Neutral => 0xFFFFFF,
        }
    }
}

/// One labelled value on a panel.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rendered panel: title, ordered fields, accent color, footer.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub color: u32,
    pub footer: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
            color: severity.color(),
            footer: None,
        }
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    #[must_use]
    pub fn wide_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    #[must_use]
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }
}

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style,
            disabled: false,
        }
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Select {
    pub custom_id: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// One interactive element inside an action row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Button(Button),
    Select(Select),
}

/// Horizontal group of components under a panel.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    pub components: Vec<Component>,
}

impl ActionRow {
    pub fn buttons(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            components: buttons.into_iter().map(Component::Button).collect(),
        }
    }

    pub fn select(select: Select) -> Self {
        Self {
            components: vec![Component::Select(select)],
        }
    }
}

/// One text input inside a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub custom_id: String,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
}

/// A modal form; its custom id carries the same callback encoding as
/// buttons, so the submit routes back through the dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub custom_id: String,
    pub title: String,
    pub fields: Vec<FormField>,
}

/// Render an optional expiry; `None` is non-expiring.
pub fn format_expiry(expires_at: Option<i64>) -> String {
    expires_at.map_or_else(|| "Lifetime".to_string(), format_timestamp)
}

/// Unix seconds as a UTC date-time string.
pub fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map_or_else(|| format!("epoch {ts}"), |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
}
