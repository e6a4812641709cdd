//! App panels and forms.

use keywarden_core::{AppAction, CallbackId};

use crate::storage::App;

use super::{ActionRow, Button, ButtonStyle, Document, Form, FormField, Severity, format_timestamp};

pub fn creation_reply(app: &App) -> Document {
    Document::new("App Created", Severity::Success)
        .field("AppID", app.app_id.clone())
        .field("Name", app.name.clone().unwrap_or_else(|| "-".to_string()))
        .footer(format!("App {}", app.id))
}

/// Management panel for one app with its license counts.
pub fn panel(app: &App, active_licenses: i64, inactive_licenses: i64) -> (Document, Vec<ActionRow>) {
    let severity = if app.active { Severity::Success } else { Severity::Warning };

    let doc = Document::new("App Panel", severity)
        .field("AppID", app.app_id.clone())
        .field("Name", app.name.clone().unwrap_or_else(|| "-".to_string()))
        .field("Status", if app.active { "Active" } else { "Inactive" })
        .field("Active Licenses", active_licenses.to_string())
        .field("Inactive Licenses", inactive_licenses.to_string())
        .field("Created", format_timestamp(app.created_at))
        .footer(format!("App {}", app.id));

    let rows = vec![ActionRow::buttons([
        Button::new(
            CallbackId::app(AppAction::Toggle, &app.id).encode(),
            if app.active { "Deactivate" } else { "Activate" },
            ButtonStyle::Primary,
        ),
        Button::new(
            CallbackId::app(AppAction::Rename, &app.id).encode(),
            "Rename",
            ButtonStyle::Secondary,
        ),
        Button::new(
            CallbackId::app(AppAction::DeactivateAll, &app.id).encode(),
            "Deactivate All Keys",
            ButtonStyle::Danger,
        ),
    ])];

    (doc, rows)
}

/// Form asking for the new unique app id. `id` is the store-assigned
/// row id, stable across renames.
pub fn rename_form(id: &str) -> Form {
    Form {
        custom_id: CallbackId::app(AppAction::Rename, id).encode(),
        title: "Rename App".to_string(),
        fields: vec![FormField {
            custom_id: "app_id".to_string(),
            label: "New AppID".to_string(),
            placeholder: "my-product".to_string(),
            required: true,
        }],
    }
}
