//! Typed queries over the entity store.

use keywarden_core::db::{map_constraint_err, unix_timestamp};

use super::db::Database;
use super::models::{App, License};
use keywarden_core::db::DatabaseError;

impl Database {
    // =========================================================================
    // App queries
    // =========================================================================

    /// Create a new app; fails with Conflict when the app id is taken.
    pub async fn create_app(
        &self,
        app_id: &str,
        name: Option<&str>,
    ) -> Result<App, DatabaseError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO apps (id, app_id, name, active, created_at)
            VALUES (?, ?, ?, 1, ?)
            ",
        )
        .bind(&id)
        .bind(app_id)
        .bind(name)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(|e| map_constraint_err(e, &format!("AppID {app_id}")))?;

        self.get_app(&id).await
    }

    /// Get an app by its store-assigned id.
    pub async fn get_app(&self, id: &str) -> Result<App, DatabaseError> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("App {id}")))
    }

    /// Get an app by its unique human-chosen key.
    pub async fn get_app_by_app_id(&self, app_id: &str) -> Result<App, DatabaseError> {
        sqlx::query_as::<_, App>("SELECT * FROM apps WHERE app_id = ?")
            .bind(app_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("AppID {app_id}")))
    }

    /// Overwrite the unique app key. The unique constraint makes a
    /// colliding rename fail atomically, leaving the old key in place.
    pub async fn rename_app(&self, id: &str, new_app_id: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE apps SET app_id = ? WHERE id = ?")
            .bind(new_app_id)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_constraint_err(e, &format!("AppID {new_app_id}")))?;

        Ok(())
    }

    pub async fn set_app_active(&self, id: &str, active: bool) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE apps SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn count_apps(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM apps")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn count_active_apps(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM apps WHERE active = 1")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Ordered page of apps: active first, then alphabetical by app id.
    pub async fn list_apps(&self, offset: i64, limit: i64) -> Result<Vec<App>, DatabaseError> {
        let apps = sqlx::query_as::<_, App>(
            "SELECT * FROM apps ORDER BY active DESC, app_id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(apps)
    }

    /// All active apps, for the reassignment select menu.
    pub async fn list_active_apps(&self, limit: i64) -> Result<Vec<App>, DatabaseError> {
        let apps = sqlx::query_as::<_, App>(
            "SELECT * FROM apps WHERE active = 1 ORDER BY app_id ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(apps)
    }

    /// Case-insensitive substring search over app ids, for autocomplete.
    pub async fn search_apps(&self, query: &str, limit: i64) -> Result<Vec<App>, DatabaseError> {
        let pattern = format!("%{query}%");
        let apps = sqlx::query_as::<_, App>(
            "SELECT * FROM apps WHERE app_id LIKE ? ORDER BY app_id ASC LIMIT ?",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(apps)
    }

    // =========================================================================
    // License queries
    // =========================================================================

    /// Insert a new license; only the key digest is ever stored.
    pub async fn create_license(
        &self,
        key_digest: &str,
        app_id: &str,
        expires_at: Option<i64>,
    ) -> Result<License, DatabaseError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO licenses (id, key_digest, app_id, active, expires_at, created_at)
            VALUES (?, ?, ?, 1, ?, ?)
            ",
        )
        .bind(&id)
        .bind(key_digest)
        .bind(app_id)
        .bind(expires_at)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(|e| map_constraint_err(e, "license key digest"))?;

        self.get_license(&id).await
    }

    /// Get a license by its store-assigned id.
    pub async fn get_license(&self, id: &str) -> Result<License, DatabaseError> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("License {id}")))
    }

    /// Look a license up by the digest of the operator-supplied plaintext.
    pub async fn get_license_by_digest(&self, digest: &str) -> Result<License, DatabaseError> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE key_digest = ?")
            .bind(digest)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound("license for the given key".to_string()))
    }

    pub async fn set_license_active(&self, id: &str, active: bool) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE licenses SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Overwrite the expiry; `None` makes the license non-expiring.
    pub async fn set_license_expiry(
        &self,
        id: &str,
        expires_at: Option<i64>,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE licenses SET expires_at = ? WHERE id = ?")
            .bind(expires_at)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn clear_license_hwid(&self, id: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE licenses SET hwid = NULL WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Used by tests and the external activation flow to bind a device.
    pub async fn set_license_hwid(&self, id: &str, hwid: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE licenses SET hwid = ? WHERE id = ?")
            .bind(hwid)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn set_license_app(&self, id: &str, app_id: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE licenses SET app_id = ? WHERE id = ?")
            .bind(app_id)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Irreversible row removal.
    pub async fn delete_license(&self, id: &str) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM licenses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn count_licenses(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM licenses")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Count licenses under an app, split by active flag.
    pub async fn count_licenses_for_app(
        &self,
        app_id: &str,
        active: bool,
    ) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM licenses WHERE app_id = ? AND active = ?",
        )
        .bind(app_id)
        .bind(active)
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }

    /// Ordered page of licenses, newest first.
    pub async fn list_licenses(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<License>, DatabaseError> {
        let licenses = sqlx::query_as::<_, License>(
            "SELECT * FROM licenses ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(licenses)
    }

    /// Bulk-deactivate every license under an app. The app row itself is
    /// untouched. Returns the number of affected rows.
    pub async fn deactivate_licenses_for_app(&self, app_id: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE licenses SET active = 0 WHERE app_id = ?")
            .bind(app_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Denylist queries
    // =========================================================================

    /// Insert a denylist row; a duplicate ban surfaces as Conflict and
    /// leaves the table unchanged.
    pub async fn ban_hwid(&self, hwid: &str, reason: &str) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        sqlx::query("INSERT INTO banned_hwids (hwid, reason, created_at) VALUES (?, ?, ?)")
            .bind(hwid)
            .bind(reason)
            .bind(now)
            .execute(self.pool())
            .await
            .map_err(|e| map_constraint_err(e, &format!("hwid {hwid}")))?;

        Ok(())
    }

    /// Delete a denylist row; returns whether one existed.
    pub async fn unban_hwid(&self, hwid: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM banned_hwids WHERE hwid = ?")
            .bind(hwid)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_hwid_banned(&self, hwid: &str) -> Result<bool, DatabaseError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM banned_hwids WHERE hwid = ?")
                .bind(hwid)
                .fetch_one(self.pool())
                .await?;
        Ok(count > 0)
    }

    pub async fn count_banned_hwids(&self, hwid: &str) -> Result<i64, DatabaseError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM banned_hwids WHERE hwid = ?")
                .bind(hwid)
                .fetch_one(self.pool())
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_fetch_app() {
        let db = Database::open_in_memory().await.unwrap();
        let app = db.create_app("shop1", Some("Shop One")).await.unwrap();
        assert_eq!(app.app_id, "shop1");
        assert_eq!(app.name.as_deref(), Some("Shop One"));
        assert!(app.active);

        let fetched = db.get_app_by_app_id("shop1").await.unwrap();
        assert_eq!(fetched.id, app.id);
    }

    #[tokio::test]
    async fn duplicate_app_id_is_conflict() {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        let err = db.create_app("shop1", None).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn rename_collision_is_atomic() {
        let db = Database::open_in_memory().await.unwrap();
        let a = db.create_app("shop1", None).await.unwrap();
        db.create_app("shop2", None).await.unwrap();

        let err = db.rename_app(&a.id, "shop2").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        // original key untouched
        let a = db.get_app(&a.id).await.unwrap();
        assert_eq!(a.app_id, "shop1");
    }

    #[tokio::test]
    async fn license_lookup_by_digest() {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        let lic = db.create_license("digest-abc", "shop1", None).await.unwrap();

        let found = db.get_license_by_digest("digest-abc").await.unwrap();
        assert_eq!(found.id, lic.id);
        assert!(found.expires_at.is_none());

        let missing = db.get_license_by_digest("digest-zzz").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_licenses_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        for i in 0..3 {
            db.create_license(&format!("d{i}"), "shop1", None)
                .await
                .unwrap();
        }

        assert_eq!(db.count_licenses().await.unwrap(), 3);
        let page = db.list_licenses(0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        let rest = db.list_licenses(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn deactivate_all_counts_rows() {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        db.create_license("d1", "shop1", None).await.unwrap();
        db.create_license("d2", "shop1", None).await.unwrap();
        db.create_license("d3", "other", None).await.unwrap();

        let n = db.deactivate_licenses_for_app("shop1").await.unwrap();
        assert_eq!(n, 2);

        let untouched = db.get_license_by_digest("d3").await.unwrap();
        assert!(untouched.active);
    }

    #[tokio::test]
    async fn denylist_is_unique_per_hwid() {
        let db = Database::open_in_memory().await.unwrap();
        db.ban_hwid("HW-1", "test").await.unwrap();
        let err = db.ban_hwid("HW-1", "again").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        assert_eq!(db.count_banned_hwids("HW-1").await.unwrap(), 1);
        assert!(db.is_hwid_banned("HW-1").await.unwrap());

        assert!(db.unban_hwid("HW-1").await.unwrap());
        assert!(!db.unban_hwid("HW-1").await.unwrap());
        assert!(!db.is_hwid_banned("HW-1").await.unwrap());
    }

    #[tokio::test]
    async fn search_apps_matches_substring() {
        let db = Database::open_in_memory().await.unwrap();
        db.create_app("shop1", None).await.unwrap();
        db.create_app("shop2", None).await.unwrap();
        db.create_app("game", None).await.unwrap();

        let hits = db.search_apps("shop", 25).await.unwrap();
        assert_eq!(hits.len(), 2);

        let all = db.search_apps("", 25).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
