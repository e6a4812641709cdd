//! Slash-command handlers.
//!
//! Every handler runs after the dispatcher has deferred the interaction,
//! so success renders as an `EditReply`. Errors bubble to the dispatcher
//! boundary, which turns expected classes into specific notices.

use std::collections::BTreeMap;

use keywarden_core::db::unix_timestamp;
use keywarden_core::{DurationToken, Error, Page, Result};

use crate::dispatch::interaction::{Choice, Effect};
use crate::lifecycle::{self, derive_status};
use crate::storage::Database;
use crate::view::lists::{KEYS_PAGE_SIZE, LIST_PAGE_SIZE};
use crate::view::{app as app_view, license as license_view, lists};

pub const CREATE_APP: &str = "create-app";
pub const CREATE_LICENSE: &str = "create-license";
pub const MANAGE_APP: &str = "manage-app";
pub const MANAGE_LICENSE: &str = "manage-license";
pub const LIST_ALL: &str = "list-all";
pub const LIST_KEYS: &str = "list-keys";

fn require<'a>(options: &'a BTreeMap<String, String>, name: &str) -> Result<&'a str> {
    options
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("missing required option: {name}")))
}

/// `create-app app_id [name]`
pub async fn create_app(db: &Database, options: &BTreeMap<String, String>) -> Result<Vec<Effect>> {
    let app_id = require(options, "app_id")?.trim();
    let name = options.get("name").map(String::as_str).filter(|n| !n.is_empty());

    let app = db.create_app(app_id, name).await?;
    Ok(vec![Effect::edit_reply(app_view::creation_reply(&app), vec![])])
}

/// `create-license app_id duration`
pub async fn create_license(
    db: &Database,
    options: &BTreeMap<String, String>,
) -> Result<Vec<Effect>> {
    let app_id = require(options, "app_id")?.trim();
    let token = require(options, "duration")?;
    let duration = DurationToken::parse(token)
        .ok_or_else(|| Error::InvalidInput(format!("unknown duration: {token}")))?;

    let expires_at = duration.expires_from(unix_timestamp());
    let (license, plaintext) = lifecycle::issue_license(db, app_id, expires_at).await?;

    Ok(vec![Effect::edit_reply(
        license_view::creation_reply(&license, &plaintext),
        vec![],
    )])
}

/// `manage-app app_id` (with autocomplete over app ids)
pub async fn manage_app(db: &Database, options: &BTreeMap<String, String>) -> Result<Vec<Effect>> {
    let app_id = require(options, "app_id")?.trim();
    let app = db.get_app_by_app_id(app_id).await?;

    let active = db.count_licenses_for_app(&app.app_id, true).await?;
    let inactive = db.count_licenses_for_app(&app.app_id, false).await?;

    let (doc, rows) = app_view::panel(&app, active, inactive);
    Ok(vec![Effect::edit_reply(doc, rows)])
}

/// `manage-license key` — the plaintext is digested immediately and the
/// digest alone drives the lookup; the raw key never reaches a log line.
pub async fn manage_license(
    db: &Database,
    options: &BTreeMap<String, String>,
) -> Result<Vec<Effect>> {
    let plaintext = require(options, "key")?;
    let digest = keywarden_crypto::digest_key(plaintext.trim());

    let license = db.get_license_by_digest(&digest).await?;
    let status = lifecycle::status_of(db, &license).await?;

    let (doc, rows) = license_view::panel(&license, status);
    Ok(vec![Effect::edit_reply(doc, rows)])
}

/// `list-all` — section-selection home of the two-section browser.
pub async fn list_all(db: &Database) -> Result<Vec<Effect>> {
    let apps = db.count_apps().await?;
    let licenses = db.count_licenses().await?;

    let (doc, rows) = lists::home(apps, licenses);
    Ok(vec![Effect::edit_reply(doc, rows)])
}

/// `list-keys` — first page of the key browser.
pub async fn list_keys(db: &Database) -> Result<Vec<Effect>> {
    let (doc, rows) = render_keys_page(db, 1).await?;
    Ok(vec![Effect::edit_reply(doc, rows)])
}

/// Render one page of the key browser. Shared with the page-navigation
/// component handler.
pub async fn render_keys_page(
    db: &Database,
    requested: i64,
) -> Result<(crate::view::Document, Vec<crate::view::ActionRow>)> {
    let total = db.count_licenses().await?;
    let page = Page::clamped(requested, KEYS_PAGE_SIZE, total);

    let licenses = db.list_licenses(page.offset(), page.page_size).await?;
    let now = unix_timestamp();
    let rows: Vec<_> = licenses
        .into_iter()
        .map(|l| {
            // denylist membership is skipped here; the browser shows the
            // flag-and-expiry status only
            let status = derive_status(&l, false, now);
            (l, status)
        })
        .collect();

    Ok(lists::keys_page(&rows, &page))
}

/// Render one page of a list-browser section.
pub async fn render_list_page(
    db: &Database,
    section: &str,
    requested: i64,
) -> Result<(crate::view::Document, Vec<crate::view::ActionRow>)> {
    match section {
        lists::SECTION_APPS => {
            let total = db.count_apps().await?;
            let page = Page::clamped(requested, LIST_PAGE_SIZE, total);
            let apps = db.list_apps(page.offset(), page.page_size).await?;
            Ok(lists::apps_page(&apps, &page))
        }
        lists::SECTION_LICENSES => {
            let total = db.count_licenses().await?;
            let page = Page::clamped(requested, LIST_PAGE_SIZE, total);
            let licenses = db.list_licenses(page.offset(), page.page_size).await?;
            Ok(lists::licenses_page(&licenses, &page))
        }
        other => Err(Error::InvalidInput(format!("unknown list section: {other}"))),
    }
}

/// Autocomplete over app ids for `manage-app` and `create-license`.
pub async fn autocomplete_apps(db: &Database, focused: &str) -> Result<Vec<Choice>> {
    let apps = db.search_apps(focused.trim(), 25).await?;
    Ok(apps
        .into_iter()
        .map(|app| Choice {
            name: match &app.name {
                Some(name) => format!("{} ({name})", app.app_id),
                None => app.app_id.clone(),
            },
            value: app.app_id,
        })
        .collect())
}
