//! Component handlers for the license domain.

use std::collections::BTreeMap;

use keywarden_core::{Error, LicenseAction, Result};

use crate::lifecycle;
use crate::storage::Database;
use crate::view::license as license_view;
use crate::view::{ActionRow, Document, Severity};

use super::interaction::{Effect, Invoker};

/// Re-fetch and render the full management panel.
pub async fn render_panel(db: &Database, id: &str) -> Result<(Document, Vec<ActionRow>)> {
    let license = db.get_license(id).await?;
    let status = lifecycle::status_of(db, &license).await?;
    Ok(license_view::panel(&license, status))
}

pub async fn handle_button(
    db: &Database,
    action: LicenseAction,
    id: &str,
    invoker: &Invoker,
) -> Result<Vec<Effect>> {
    match action {
        LicenseAction::Toggle => {
            lifecycle::toggle_license(db, id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        LicenseAction::ResetHwid => {
            lifecycle::reset_hwid(db, id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![
                Effect::update(doc, rows),
                Effect::FollowUp {
                    document: license_view::notice(
                        "HWID Reset",
                        "The hardware id was unbound; the next activation rebinds.",
                        Severity::Success,
                    ),
                    ephemeral: true,
                },
            ])
        }
        // transitions needing more input open a form; the submit mutates
        LicenseAction::Extend => {
            db.get_license(id).await?;
            Ok(vec![Effect::OpenForm {
                form: license_view::extend_form(id),
            }])
        }
        LicenseAction::SetExpiration => {
            db.get_license(id).await?;
            Ok(vec![Effect::OpenForm {
                form: license_view::set_expiration_form(id),
            }])
        }
        LicenseAction::ChangeApp => {
            let license = db.get_license(id).await?;
            let apps = db.list_active_apps(25).await?;
            if apps.is_empty() {
                return Ok(vec![Effect::ephemeral_reply(license_view::notice(
                    "No Destination",
                    "There is no active app to move this license to.",
                    Severity::Warning,
                ))]);
            }

            let doc = Document::new("Move License", Severity::Neutral)
                .description("Pick the destination app.")
                .field("Key", keywarden_crypto::mask_digest(&license.key_digest))
                .field("Current App", license.app_id);
            Ok(vec![Effect::update(
                doc,
                vec![license_view::change_app_select(id, &apps)],
            )])
        }
        LicenseAction::Ban => {
            let reason = format!("banned from license panel by {}", invoker.username);
            let hwid = lifecycle::ban_hwid(db, id, &reason).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![
                Effect::update(doc, rows),
                Effect::FollowUp {
                    document: license_view::notice(
                        "HWID Banned",
                        &format!("`{hwid}` is now denylisted for every license."),
                        Severity::Error,
                    ),
                    ephemeral: true,
                },
            ])
        }
        LicenseAction::Unban => {
            lifecycle::unban_hwid(db, id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        LicenseAction::Delete => {
            lifecycle::delete_license(db, id).await?;
            Ok(vec![Effect::update(
                license_view::notice("License Deleted", "The license was permanently removed.", Severity::Error),
                vec![],
            )])
        }
    }
}

pub async fn handle_select(
    db: &Database,
    action: LicenseAction,
    id: &str,
    values: &[String],
) -> Result<Vec<Effect>> {
    match action {
        LicenseAction::ChangeApp => {
            let destination = values
                .first()
                .ok_or_else(|| Error::InvalidInput("no destination app selected".to_string()))?;
            lifecycle::reassign_app(db, id, destination).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        _ => Ok(vec![]),
    }
}

pub async fn handle_form(
    db: &Database,
    action: LicenseAction,
    id: &str,
    fields: &BTreeMap<String, String>,
) -> Result<Vec<Effect>> {
    match action {
        LicenseAction::Extend => {
            let raw = fields
                .get("days")
                .ok_or_else(|| Error::InvalidInput("missing form field: days".to_string()))?;
            let days: i64 = raw.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("expected a whole number of days, got {raw:?}"))
            })?;

            lifecycle::extend_license(db, id, days).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        LicenseAction::SetExpiration => {
            let date = fields
                .get("date")
                .ok_or_else(|| Error::InvalidInput("missing form field: date".to_string()))?;

            lifecycle::set_expiration(db, id, date).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        _ => Ok(vec![]),
    }
}
