//! License panels and forms.

use keywarden_core::{CallbackId, LicenseAction};
use keywarden_crypto::mask_digest;

use crate::lifecycle::LicenseStatus;
use crate::storage::{App, License};

use super::{
    ActionRow, Button, ButtonStyle, Document, Form, FormField, Select, SelectOption, Severity,
    format_expiry, format_timestamp,
};

/// One-time creation reply. The only place the plaintext ever renders.
pub fn creation_reply(license: &License, plaintext: &str) -> Document {
    Document::new("License Created", Severity::Success)
        .description(format!(
            "Copy the key now. It cannot be displayed again.\n`{plaintext}`"
        ))
        .field("App", license.app_id.clone())
        .field("Expires", format_expiry(license.expires_at))
        .footer(format!("License {}", license.id))
}

/// Management panel for one license: snapshot fields plus action rows.
pub fn panel(license: &License, status: LicenseStatus) -> (Document, Vec<ActionRow>) {
    let severity = match status {
        LicenseStatus::Active => Severity::Success,
        LicenseStatus::Inactive => Severity::Warning,
        LicenseStatus::Expired | LicenseStatus::Banned => Severity::Error,
    };

    let doc = Document::new("License Panel", severity)
        .field("Key", mask_digest(&license.key_digest))
        .field("App", license.app_id.clone())
        .field("Status", status.label())
        .field("Expires", format_expiry(license.expires_at))
        .field(
            "Hardware ID",
            license.hwid.clone().unwrap_or_else(|| "Not bound".to_string()),
        )
        .field(
            "HWID Banned",
            if status == LicenseStatus::Banned { "Yes" } else { "No" },
        )
        .field(
            "Last IP",
            license.last_ip.clone().unwrap_or_else(|| "Never seen".to_string()),
        )
        .field(
            "Last Login",
            license
                .last_login_at
                .map_or_else(|| "Never".to_string(), format_timestamp),
        )
        .footer(format!("License {}", license.id));

    let id = license.id.as_str();
    let banned = status == LicenseStatus::Banned;

    let rows = vec![
        ActionRow::buttons([
            Button::new(
                CallbackId::license(LicenseAction::Toggle, id).encode(),
                if license.active { "Deactivate" } else { "Activate" },
                ButtonStyle::Primary,
            ),
            Button::new(
                CallbackId::license(LicenseAction::ResetHwid, id).encode(),
                "Reset HWID",
                ButtonStyle::Secondary,
            ),
            Button::new(
                CallbackId::license(LicenseAction::Extend, id).encode(),
                "Extend",
                ButtonStyle::Secondary,
            ),
        ]),
        ActionRow::buttons([
            Button::new(
                CallbackId::license(LicenseAction::SetExpiration, id).encode(),
                "Set Expiration",
                ButtonStyle::Secondary,
            ),
            Button::new(
                CallbackId::license(LicenseAction::ChangeApp, id).encode(),
                "Change App",
                ButtonStyle::Secondary,
            ),
        ]),
        ActionRow::buttons([
            Button::new(
                CallbackId::license(LicenseAction::Ban, id).encode(),
                "Ban HWID",
                ButtonStyle::Danger,
            )
            .disabled(banned),
            Button::new(
                CallbackId::license(LicenseAction::Unban, id).encode(),
                "Unban HWID",
                ButtonStyle::Success,
            )
            .disabled(!banned),
            Button::new(
                CallbackId::license(LicenseAction::Delete, id).encode(),
                "Delete",
                ButtonStyle::Danger,
            ),
        ]),
    ];

    (doc, rows)
}

/// Form asking for the number of days to extend by.
pub fn extend_form(license_id: &str) -> Form {
    Form {
        custom_id: CallbackId::license(LicenseAction::Extend, license_id).encode(),
        title: "Extend License".to_string(),
        fields: vec![FormField {
            custom_id: "days".to_string(),
            label: "Days to add".to_string(),
            placeholder: "30".to_string(),
            required: true,
        }],
    }
}

/// Form asking for an absolute expiry date.
pub fn set_expiration_form(license_id: &str) -> Form {
    Form {
        custom_id: CallbackId::license(LicenseAction::SetExpiration, license_id).encode(),
        title: "Set Expiration".to_string(),
        fields: vec![FormField {
            custom_id: "date".to_string(),
            label: "New expiry (YYYY-MM-DD)".to_string(),
            placeholder: "2026-12-31".to_string(),
            required: true,
        }],
    }
}

/// Select menu of active apps for reassignment.
pub fn change_app_select(license_id: &str, apps: &[App]) -> ActionRow {
    ActionRow::select(Select {
        custom_id: CallbackId::license(LicenseAction::ChangeApp, license_id).encode(),
        placeholder: "Move license to app...".to_string(),
        options: apps
            .iter()
            .map(|app| SelectOption {
                label: app.app_id.clone(),
                value: app.app_id.clone(),
                description: app.name.clone(),
            })
            .collect(),
    })
}

/// Ephemeral notice for a completed or failed action.
pub fn notice(title: &str, body: &str, severity: Severity) -> Document {
    Document::new(title, severity).description(body)
}
