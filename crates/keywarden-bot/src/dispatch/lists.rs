//! Component handlers for the list and key browsers.

use keywarden_core::{Error, Result};

use crate::commands::{render_keys_page, render_list_page};
use crate::storage::Database;
use crate::view::lists;

use super::interaction::Effect;

/// `list_home:*` — back to the section-selection view.
pub async fn handle_home(db: &Database) -> Result<Vec<Effect>> {
    let apps = db.count_apps().await?;
    let licenses = db.count_licenses().await?;
    let (doc, rows) = lists::home(apps, licenses);
    Ok(vec![Effect::update(doc, rows)])
}

/// `list_page:<section>:<page>` — one page of a browser section.
pub async fn handle_page(db: &Database, entity_id: &str) -> Result<Vec<Effect>> {
    let (section, page) = entity_id
        .split_once(':')
        .ok_or_else(|| Error::InvalidInput(format!("malformed page target: {entity_id}")))?;
    let requested: i64 = page
        .parse()
        .map_err(|_| Error::InvalidInput(format!("malformed page number: {page}")))?;

    let (doc, rows) = render_list_page(db, section, requested).await?;
    Ok(vec![Effect::update(doc, rows)])
}

/// `listkeys_page:<page>` — one page of the key browser.
pub async fn handle_keys_page(db: &Database, entity_id: &str) -> Result<Vec<Effect>> {
    let requested: i64 = entity_id
        .parse()
        .map_err(|_| Error::InvalidInput(format!("malformed page number: {entity_id}")))?;

    let (doc, rows) = render_keys_page(db, requested).await?;
    Ok(vec![Effect::update(doc, rows)])
}
