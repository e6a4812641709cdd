//! List browsers: the two-section app/license browser and the key browser.

use std::fmt::Write as _;

use keywarden_core::{CallbackId, Page};
use keywarden_crypto::mask_digest;

use crate::lifecycle::LicenseStatus;
use crate::storage::{App, License};

use super::{ActionRow, Button, ButtonStyle, Document, Severity, format_expiry};

/// Rows per page in the two-section browser.
pub const LIST_PAGE_SIZE: i64 = 10;
/// Rows per page in the key browser.
pub const KEYS_PAGE_SIZE: i64 = 5;

/// Section tokens carried inside `list_page:<section>:<page>`.
pub const SECTION_APPS: &str = "app";
pub const SECTION_LICENSES: &str = "license";

/// Section-selection home view of the list browser.
pub fn home(total_apps: i64, total_licenses: i64) -> (Document, Vec<ActionRow>) {
    let doc = Document::new("Registry Browser", Severity::Neutral)
        .description("Pick a section to browse.")
        .field("Apps", total_apps.to_string())
        .field("Licenses", total_licenses.to_string());

    let rows = vec![ActionRow::buttons([
        Button::new(
            CallbackId::list_page(SECTION_APPS, 1).encode(),
            "Apps",
            ButtonStyle::Primary,
        ),
        Button::new(
            CallbackId::list_page(SECTION_LICENSES, 1).encode(),
            "Licenses",
            ButtonStyle::Primary,
        ),
    ])];

    (doc, rows)
}

/// One page of the app section.
pub fn apps_page(apps: &[App], page: &Page) -> (Document, Vec<ActionRow>) {
    let body = if apps.is_empty() {
        "No apps registered yet.".to_string()
    } else {
        let mut block = String::from("```asciidoc\n");
        for app in apps {
            let _ = writeln!(
                block,
                "[{}] :: {} :: {}",
                app.app_id,
                if app.active { "Active" } else { "Inactive" },
                app.name.as_deref().unwrap_or("-"),
            );
        }
        block.push_str("```");
        block
    };

    let doc = Document::new("Apps", Severity::Neutral)
        .description(body)
        .footer(format!("Page {} of {}", page.page, page.total_pages));

    (doc, vec![nav_row(SECTION_APPS, page)])
}

/// One page of the license section.
pub fn licenses_page(licenses: &[License], page: &Page) -> (Document, Vec<ActionRow>) {
    let body = if licenses.is_empty() {
        "No licenses issued yet.".to_string()
    } else {
        let mut block = String::from("```asciidoc\n");
        for license in licenses {
            let _ = writeln!(
                block,
                "[{}] :: {} :: expires {}",
                mask_digest(&license.key_digest),
                license.app_id,
                format_expiry(license.expires_at),
            );
        }
        block.push_str("```");
        block
    };

    let doc = Document::new("Licenses", Severity::Neutral)
        .description(body)
        .footer(format!("Page {} of {}", page.page, page.total_pages));

    (doc, vec![nav_row(SECTION_LICENSES, page)])
}

/// One page of the key browser, with a derived status per row.
pub fn keys_page(rows: &[(License, LicenseStatus)], page: &Page) -> (Document, Vec<ActionRow>) {
    let mut doc = Document::new("License Keys", Severity::Neutral)
        .footer(format!("Page {} of {}", page.page, page.total_pages));

    if rows.is_empty() {
        doc = doc.description("No licenses issued yet.");
    } else {
        for (license, status) in rows {
            doc = doc.wide_field(
                mask_digest(&license.key_digest),
                format!(
                    "{} :: {} :: expires {}",
                    license.app_id,
                    status.label(),
                    format_expiry(license.expires_at),
                ),
            );
        }
    }

    let nav = ActionRow::buttons([
        Button::new(
            CallbackId::keys_page(page.page - 1).encode(),
            "Previous",
            ButtonStyle::Secondary,
        )
        .disabled(!page.has_prev()),
        Button::new(
            CallbackId::keys_page(page.page + 1).encode(),
            "Next",
            ButtonStyle::Secondary,
        )
        .disabled(!page.has_next()),
    ]);

    (doc, vec![nav])
}

/// Prev / Home / Next for the two-section browser. Home is always live.
fn nav_row(section: &str, page: &Page) -> ActionRow {
    ActionRow::buttons([
        Button::new(
            CallbackId::list_page(section, page.page - 1).encode(),
            "Previous",
            ButtonStyle::Secondary,
        )
        .disabled(!page.has_prev()),
        Button::new(CallbackId::list_home().encode(), "Home", ButtonStyle::Primary),
        Button::new(
            CallbackId::list_page(section, page.page + 1).encode(),
            "Next",
            ButtonStyle::Secondary,
        )
        .disabled(!page.has_next()),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::Component;

    fn buttons(row: &ActionRow) -> Vec<&Button> {
        row.components
            .iter()
            .map(|c| match c {
                Component::Button(b) => b,
                Component::Select(_) => panic!("expected button"),
            })
            .collect()
    }

    #[test]
    fn empty_sections_render_a_message() {
        let page = Page::clamped(1, LIST_PAGE_SIZE, 0);
        let (doc, rows) = apps_page(&[], &page);
        assert_eq!(doc.description.as_deref(), Some("No apps registered yet."));

        // both nav directions disabled on the single empty page
        let nav = buttons(&rows[0]);
        assert!(nav[0].disabled);
        assert!(!nav[1].disabled); // home stays live
        assert!(nav[2].disabled);
    }

    #[test]
    fn nav_ids_carry_section_and_page() {
        let page = Page::clamped(2, LIST_PAGE_SIZE, 35);
        let (_, rows) = apps_page(&[], &page);
        let nav = buttons(&rows[0]);
        assert_eq!(nav[0].custom_id, "list_page:app:1");
        assert_eq!(nav[1].custom_id, "list_home:main");
        assert_eq!(nav[2].custom_id, "list_page:app:3");
        assert!(!nav[0].disabled);
        assert!(!nav[2].disabled);
    }

    #[test]
    fn key_browser_disables_edges() {
        let page = Page::clamped(1, KEYS_PAGE_SIZE, 12);
        let (_, rows) = keys_page(&[], &page);
        let nav = buttons(&rows[0]);
        assert!(nav[0].disabled);
        assert_eq!(nav[1].custom_id, "listkeys_page:2");
        assert!(!nav[1].disabled);

        let last = Page::clamped(3, KEYS_PAGE_SIZE, 12);
        let (_, rows) = keys_page(&[], &last);
        let nav = buttons(&rows[0]);
        assert!(!nav[0].disabled);
        assert!(nav[1].disabled);
    }
}
