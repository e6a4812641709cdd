//! Component handlers for the app domain.

use std::collections::BTreeMap;

use keywarden_core::{AppAction, Error, Result};

use crate::lifecycle;
use crate::storage::Database;
use crate::view::app as app_view;
use crate::view::license::notice;
use crate::view::{ActionRow, Document, Severity};

use super::interaction::Effect;

/// Re-fetch and render the app panel with fresh license counts.
pub async fn render_panel(db: &Database, id: &str) -> Result<(Document, Vec<ActionRow>)> {
    let app = db.get_app(id).await?;
    let active = db.count_licenses_for_app(&app.app_id, true).await?;
    let inactive = db.count_licenses_for_app(&app.app_id, false).await?;
    Ok(app_view::panel(&app, active, inactive))
}

pub async fn handle_button(db: &Database, action: AppAction, id: &str) -> Result<Vec<Effect>> {
    match action {
        AppAction::Toggle => {
            lifecycle::toggle_app(db, id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        AppAction::Rename => {
            db.get_app(id).await?;
            Ok(vec![Effect::OpenForm {
                form: app_view::rename_form(id),
            }])
        }
        AppAction::DeactivateAll => {
            let (app, affected) = lifecycle::deactivate_all_licenses(db, id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![
                Effect::update(doc, rows),
                Effect::FollowUp {
                    document: notice(
                        "Bulk Deactivation",
                        &format!("Deactivated {affected} license(s) under `{}`.", app.app_id),
                        Severity::Warning,
                    ),
                    ephemeral: true,
                },
            ])
        }
    }
}

pub async fn handle_form(
    db: &Database,
    action: AppAction,
    id: &str,
    fields: &BTreeMap<String, String>,
) -> Result<Vec<Effect>> {
    match action {
        AppAction::Rename => {
            let new_app_id = fields
                .get("app_id")
                .ok_or_else(|| Error::InvalidInput("missing form field: app_id".to_string()))?;

            lifecycle::rename_app(db, id, new_app_id).await?;
            let (doc, rows) = render_panel(db, id).await?;
            Ok(vec![Effect::update(doc, rows)])
        }
        _ => Ok(vec![]),
    }
}
