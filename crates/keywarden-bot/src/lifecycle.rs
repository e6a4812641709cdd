//! License and app state transitions.
//!
//! Every transition re-fetches from the store, mutates, and returns the
//! fresh row; callers render from the returned snapshot. Display status
//! is derived here at render time and never stored.

use chrono::NaiveDate;

use keywarden_core::db::unix_timestamp;
use keywarden_core::{Error, Result};

use crate::storage::{App, Database, DatabaseError, License};

const DAY_SECS: i64 = 24 * 60 * 60;

/// Derived display status, precedence Banned > Expired > flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseStatus {
    Banned,
    Expired,
    Active,
    Inactive,
}

impl LicenseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Banned => "Banned",
            Self::Expired => "Expired",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// Derive the display status of a license at instant `now`.
pub const fn derive_status(license: &License, hwid_banned: bool, now: i64) -> LicenseStatus {
    if hwid_banned {
        return LicenseStatus::Banned;
    }
    if let Some(expires_at) = license.expires_at {
        if expires_at <= now {
            return LicenseStatus::Expired;
        }
    }
    if license.active {
        LicenseStatus::Active
    } else {
        LicenseStatus::Inactive
    }
}

/// Derive status including the denylist lookup.
pub async fn status_of(db: &Database, license: &License) -> Result<LicenseStatus> {
    let banned = match &license.hwid {
        Some(hwid) => db.is_hwid_banned(hwid).await?,
        None => false,
    };
    Ok(derive_status(license, banned, unix_timestamp()))
}

// =============================================================================
// License transitions
// =============================================================================

/// Issue a new license under an existing app. Returns the stored row and
/// the plaintext key, which is shown once and never persisted.
pub async fn issue_license(
    db: &Database,
    app_id: &str,
    expires_at: Option<i64>,
) -> Result<(License, String)> {
    // The app must exist; an inactive app can still receive keys.
    db.get_app_by_app_id(app_id).await?;

    let plaintext = keywarden_crypto::generate_key();
    let digest = keywarden_crypto::digest_key(&plaintext);

    let license = db.create_license(&digest, app_id, expires_at).await?;
    tracing::info!(license_id = %license.id, app_id, "license issued");

    Ok((license, plaintext))
}

/// Flip the active flag and return the fresh row.
pub async fn toggle_license(db: &Database, id: &str) -> Result<License> {
    let license = db.get_license(id).await?;
    db.set_license_active(id, !license.active).await?;
    Ok(db.get_license(id).await?)
}

/// Push the expiry `days` forward from max(now, current expiry). A
/// non-expiring license becomes finite: base is now.
pub async fn extend_license(db: &Database, id: &str, days: i64) -> Result<License> {
    if days <= 0 {
        return Err(Error::InvalidInput(format!(
            "extension must be a positive number of days, got {days}"
        )));
    }

    let license = db.get_license(id).await?;
    let now = unix_timestamp();
    let base = license.expires_at.filter(|&e| e > now).unwrap_or(now);

    // form input is only range-checked, so the sum must be checked too
    let expires_at = days
        .checked_mul(DAY_SECS)
        .and_then(|delta| base.checked_add(delta))
        .ok_or_else(|| Error::InvalidInput(format!("extension too large: {days} days")))?;

    db.set_license_expiry(id, Some(expires_at)).await?;
    Ok(db.get_license(id).await?)
}

/// Overwrite the expiry with an absolute calendar date (end of day UTC).
/// Past dates are accepted; the license simply renders as expired.
pub async fn set_expiration(db: &Database, id: &str, date: &str) -> Result<License> {
    let timestamp = parse_expiration_date(date)?;
    db.get_license(id).await?;
    db.set_license_expiry(id, Some(timestamp)).await?;
    Ok(db.get_license(id).await?)
}

/// Parse an operator-supplied `YYYY-MM-DD` into an end-of-day timestamp.
pub fn parse_expiration_date(date: &str) -> Result<i64> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("expected a YYYY-MM-DD date, got {date:?}")))?;
    let end_of_day = parsed
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| Error::InvalidInput(format!("date out of range: {date:?}")))?;
    Ok(end_of_day.and_utc().timestamp())
}

/// Unbind the hardware id so the next activation rebinds.
pub async fn reset_hwid(db: &Database, id: &str) -> Result<License> {
    db.get_license(id).await?;
    db.clear_license_hwid(id).await?;
    Ok(db.get_license(id).await?)
}

/// Move the license under another app.
pub async fn reassign_app(db: &Database, id: &str, new_app_id: &str) -> Result<License> {
    db.get_license(id).await?;
    db.set_license_app(id, new_app_id).await?;
    Ok(db.get_license(id).await?)
}

/// Put the license's bound hardware id on the global denylist.
/// Fails without touching the table when no hwid is bound or when a
/// denylist row already exists.
pub async fn ban_hwid(db: &Database, id: &str, reason: &str) -> Result<String> {
    let license = db.get_license(id).await?;
    let hwid = license.hwid.ok_or_else(|| {
        Error::InvalidInput("license has no bound hardware id to ban".to_string())
    })?;

    match db.ban_hwid(&hwid, reason).await {
        Ok(()) => {
            tracing::info!(license_id = id, hwid = %hwid, "hardware id banned");
            Ok(hwid)
        }
        Err(DatabaseError::Conflict(_)) => Err(Error::AlreadyBanned(hwid)),
        Err(other) => Err(other.into()),
    }
}

/// Remove the license's bound hardware id from the denylist.
pub async fn unban_hwid(db: &Database, id: &str) -> Result<String> {
    let license = db.get_license(id).await?;
    let hwid = license.hwid.ok_or_else(|| {
        Error::InvalidInput("license has no bound hardware id to unban".to_string())
    })?;

    if db.unban_hwid(&hwid).await? {
        tracing::info!(license_id = id, hwid = %hwid, "hardware id unbanned");
        Ok(hwid)
    } else {
        Err(Error::NotBanned(hwid))
    }
}

/// Permanently remove the license row.
pub async fn delete_license(db: &Database, id: &str) -> Result<License> {
    let license = db.get_license(id).await?;
    db.delete_license(id).await?;
    tracing::info!(license_id = id, "license deleted");
    Ok(license)
}

// =============================================================================
// App transitions
// =============================================================================

pub async fn toggle_app(db: &Database, id: &str) -> Result<App> {
    let app = db.get_app(id).await?;
    db.set_app_active(id, !app.active).await?;
    Ok(db.get_app(id).await?)
}

/// Change the unique app key. A collision fails atomically; the old key
/// stays in place.
pub async fn rename_app(db: &Database, id: &str, new_app_id: &str) -> Result<App> {
    let new_app_id = new_app_id.trim();
    if new_app_id.is_empty() {
        return Err(Error::InvalidInput("app id must not be empty".to_string()));
    }

    db.get_app(id).await?;
    db.rename_app(id, new_app_id).await?;
    Ok(db.get_app(id).await?)
}

/// Deactivate every license under the app; the app row is untouched.
/// Returns how many licenses were affected.
pub async fn deactivate_all_licenses(db: &Database, id: &str) -> Result<(App, u64)> {
    let app = db.get_app(id).await?;
    let affected = db.deactivate_licenses_for_app(&app.app_id).await?;
    tracing::info!(app_id = %app.app_id, affected, "bulk deactivation");
    Ok((app, affected))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded_db() -> (Database, License) {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        let (license, _) = issue_license(&db, "shop1", None).await.unwrap();
        (db, license)
    }

    #[test]
    fn status_precedence() {
        let license = License {
            id: "l1".into(),
            key_digest: "d".into(),
            app_id: "shop1".into(),
            active: true,
            expires_at: Some(100),
            hwid: Some("HW-1".into()),
            last_ip: None,
            last_login_at: None,
            created_at: 0,
        };

        // banned wins over expired
        assert_eq!(derive_status(&license, true, 200), LicenseStatus::Banned);
        assert_eq!(derive_status(&license, false, 200), LicenseStatus::Expired);
        assert_eq!(derive_status(&license, false, 50), LicenseStatus::Active);

        let inactive = License {
            active: false,
            expires_at: None,
            ..license
        };
        assert_eq!(derive_status(&inactive, false, 50), LicenseStatus::Inactive);
    }

    #[test]
    fn expiration_date_parses_to_end_of_day() {
        let ts = parse_expiration_date("2026-01-02").unwrap();
        // 2026-01-02T23:59:59Z
        assert_eq!(ts, 1_767_398_399);

        assert!(matches!(
            parse_expiration_date("02/01/2026"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            parse_expiration_date("soon"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn issue_requires_existing_app() {
        let db = Database::open_in_memory().await.unwrap();
        let err = issue_license(&db, "ghost", None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn plaintext_is_never_stored() {
        let (db, license) = seeded_db().await;
        let stored = db.get_license(&license.id).await.unwrap();
        assert!(stored.key_digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stored.key_digest.len(), 64);
        assert!(!stored.key_digest.starts_with("KEY-"));
    }

    #[tokio::test]
    async fn toggle_flips_and_returns_fresh_row() {
        let (db, license) = seeded_db().await;
        let toggled = toggle_license(&db, &license.id).await.unwrap();
        assert!(!toggled.active);
        let again = toggle_license(&db, &license.id).await.unwrap();
        assert!(again.active);
    }

    #[tokio::test]
    async fn extend_from_lifetime_becomes_finite() {
        let (db, license) = seeded_db().await;
        assert!(license.expires_at.is_none());

        let before = unix_timestamp();
        let extended = extend_license(&db, &license.id, 7).await.unwrap();
        let expires = extended.expires_at.unwrap();
        assert!(expires >= before + 7 * DAY_SECS);
        assert!(expires <= unix_timestamp() + 7 * DAY_SECS);
    }

    #[tokio::test]
    async fn extend_from_expired_uses_now_as_base() {
        let (db, license) = seeded_db().await;
        db.set_license_expiry(&license.id, Some(1_000)).await.unwrap();

        let before = unix_timestamp();
        let extended = extend_license(&db, &license.id, 1).await.unwrap();
        // base is now, not the long-past expiry
        assert!(extended.expires_at.unwrap() >= before + DAY_SECS);
    }

    #[tokio::test]
    async fn extend_from_future_expiry_stacks() {
        let (db, license) = seeded_db().await;
        let future = unix_timestamp() + 10 * DAY_SECS;
        db.set_license_expiry(&license.id, Some(future)).await.unwrap();

        let extended = extend_license(&db, &license.id, 5).await.unwrap();
        assert_eq!(extended.expires_at, Some(future + 5 * DAY_SECS));
    }

    #[tokio::test]
    async fn extend_rejects_non_positive_days() {
        let (db, license) = seeded_db().await;
        let err = extend_license(&db, &license.id, 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn extend_rejects_overflowing_days() {
        let (db, license) = seeded_db().await;

        for days in [200_000_000_000_000, i64::MAX] {
            let err = extend_license(&db, &license.id, days).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }

        // the stored expiry is untouched
        let stored = db.get_license(&license.id).await.unwrap();
        assert_eq!(stored.expires_at, None);
    }

    #[tokio::test]
    async fn ban_without_hwid_mutates_nothing() {
        let (db, license) = seeded_db().await;
        let err = ban_hwid(&db, &license.id, "fraud").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn double_ban_keeps_one_row() {
        let (db, license) = seeded_db().await;
        db.set_license_hwid(&license.id, "HW-1").await.unwrap();

        let hwid = ban_hwid(&db, &license.id, "fraud").await.unwrap();
        assert_eq!(hwid, "HW-1");

        let err = ban_hwid(&db, &license.id, "fraud").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyBanned(_)));
        assert_eq!(db.count_banned_hwids("HW-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unban_reports_when_not_banned() {
        let (db, license) = seeded_db().await;
        db.set_license_hwid(&license.id, "HW-1").await.unwrap();

        let err = unban_hwid(&db, &license.id).await.unwrap_err();
        assert!(matches!(err, Error::NotBanned(_)));

        ban_hwid(&db, &license.id, "fraud").await.unwrap();
        let hwid = unban_hwid(&db, &license.id).await.unwrap();
        assert_eq!(hwid, "HW-1");
        assert!(!db.is_hwid_banned("HW-1").await.unwrap());
    }

    #[tokio::test]
    async fn rename_collision_keeps_old_key() {
        let db = Database::open_in_memory().await.unwrap();
        let a = db.create_app("shop1", None).await.unwrap();
        db.create_app("shop2", None).await.unwrap();

        let err = rename_app(&db, &a.id, "shop2").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(db.get_app(&a.id).await.unwrap().app_id, "shop1");

        let renamed = rename_app(&db, &a.id, "shop3").await.unwrap();
        assert_eq!(renamed.app_id, "shop3");
    }

    #[tokio::test]
    async fn deactivate_all_leaves_app_untouched() {
        let (db, license) = seeded_db().await;
        issue_license(&db, "shop1", None).await.unwrap();

        let (app, affected) = deactivate_all_licenses(
            &db,
            &db.get_app_by_app_id("shop1").await.unwrap().id,
        )
        .await
        .unwrap();
        assert_eq!(affected, 2);
        assert!(app.active);
        assert!(!db.get_license(&license.id).await.unwrap().active);
    }
}
