//! Entity storage implementations for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::core::{
    CategoryStorage, PetitionStorage, SupportTierStorage, SupporterStorage, UserStorage,
};
use crate::error::{BackendError, ResourceError, StorageError, StorageResult};
use crate::types::{
    Category, FundingSummary, NewPetition, NewPledge, NewSupportTier, NewUser, Petition,
    PetitionUpdate, Pledge, StoredSupportTier, SupportTier, SupportTierUpdate, SupporterView,
    User, UserUpdate,
};

use super::SqliteBackend;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Maps a UNIQUE violation to `AlreadyExists`, anything else to an internal
/// error.
fn write_error(entity: &'static str, err: rusqlite::Error) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(e, detail)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StorageError::Resource(ResourceError::AlreadyExists {
                entity,
                detail: detail.clone().unwrap_or_else(|| e.to_string()),
            })
        }
        _ => internal_error(format!("Failed to write {}: {}", entity, err)),
    }
}

fn read_error(entity: &'static str, err: rusqlite::Error) -> StorageError {
    internal_error(format!("Failed to read {}: {}", entity, err))
}

fn exists(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<bool> {
    conn.query_row(sql, params, |_| Ok(()))
        .optional()
        .map(|row| row.is_some())
}

// ============================================================================
// Row decoders
// ============================================================================

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password, image_filename, auth_token";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        image_filename: row.get(5)?,
        auth_token: row.get(6)?,
    })
}

const PETITION_COLUMNS: &str =
    "id, title, description, creation_date, owner_id, category_id, image_filename";

fn petition_from_row(row: &Row<'_>) -> rusqlite::Result<Petition> {
    Ok(Petition {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        creation_date: row.get(3)?,
        owner_id: row.get(4)?,
        category_id: row.get(5)?,
        image_filename: row.get(6)?,
    })
}

const TIER_COLUMNS: &str = "id, petition_id, title, description, cost";

fn tier_from_row(row: &Row<'_>) -> rusqlite::Result<StoredSupportTier> {
    Ok(StoredSupportTier {
        id: row.get(0)?,
        petition_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        cost: row.get(4)?,
    })
}

fn read_user_where(
    conn: &Connection,
    column: &str,
    value: &dyn rusqlite::ToSql,
) -> StorageResult<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM user WHERE {} = ?1", USER_COLUMNS, column),
        [value],
        user_from_row,
    )
    .optional()
    .map_err(|e| read_error("user", e))
}

fn read_petition_row(conn: &Connection, petition_id: i64) -> StorageResult<Option<Petition>> {
    conn.query_row(
        &format!("SELECT {} FROM petition WHERE id = ?1", PETITION_COLUMNS),
        [petition_id],
        petition_from_row,
    )
    .optional()
    .map_err(|e| read_error("petition", e))
}

fn read_tier_row(conn: &Connection, tier_id: i64) -> StorageResult<Option<StoredSupportTier>> {
    conn.query_row(
        &format!("SELECT {} FROM support_tier WHERE id = ?1", TIER_COLUMNS),
        [tier_id],
        tier_from_row,
    )
    .optional()
    .map_err(|e| read_error("support tier", e))
}

fn insert_tier(conn: &Connection, petition_id: i64, tier: &NewSupportTier) -> StorageResult<i64> {
    conn.execute(
        "INSERT INTO support_tier (petition_id, title, description, cost) VALUES (?1, ?2, ?3, ?4)",
        params![petition_id, tier.title, tier.description, tier.cost],
    )
    .map_err(|e| write_error("support tier", e))?;
    Ok(conn.last_insert_rowid())
}

// ============================================================================
// CategoryStorage
// ============================================================================

#[async_trait]
impl CategoryStorage for SqliteBackend {
    async fn category_exists(&self, category_id: i64) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        exists(&conn, "SELECT 1 FROM category WHERE id = ?1", [category_id])
            .map_err(|e| read_error("category", e))
    }

    async fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT id, name FROM category ORDER BY id")
            .map_err(|e| read_error("category", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Category {
                    category_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| read_error("category", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_error("category", e))
    }
}

// ============================================================================
// UserStorage
// ============================================================================

#[async_trait]
impl UserStorage for SqliteBackend {
    async fn create_user(&self, user: NewUser) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO user (email, first_name, last_name, password) VALUES (?1, ?2, ?3, ?4)",
            params![user.email, user.first_name, user.last_name, user.password],
        )
        .map_err(|e| write_error("user", e))?;
        Ok(conn.last_insert_rowid())
    }

    async fn read_user(&self, user_id: i64) -> StorageResult<Option<User>> {
        let conn = self.get_connection()?;
        read_user_where(&conn, "id", &user_id)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let conn = self.get_connection()?;
        read_user_where(&conn, "email", &email)
    }

    async fn find_user_by_token(&self, token: &str) -> StorageResult<Option<User>> {
        let conn = self.get_connection()?;
        read_user_where(&conn, "auth_token", &token)
    }

    async fn email_in_use(&self, email: &str, excluding: Option<i64>) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        exists(
            &conn,
            "SELECT 1 FROM user WHERE email = ?1 AND (?2 IS NULL OR id <> ?2)",
            params![email, excluding],
        )
        .map_err(|e| read_error("user", e))
    }

    async fn update_user(&self, user_id: i64, update: UserUpdate) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let current = read_user_where(&conn, "id", &user_id)?
            .ok_or_else(|| StorageError::not_found("user", user_id))?;

        conn.execute(
            "UPDATE user SET first_name = ?1, last_name = ?2, email = ?3, password = ?4 WHERE id = ?5",
            params![
                update.first_name.unwrap_or(current.first_name),
                update.last_name.unwrap_or(current.last_name),
                update.email.unwrap_or(current.email),
                update.password.unwrap_or(current.password),
                user_id,
            ],
        )
        .map_err(|e| write_error("user", e))?;
        Ok(())
    }

    async fn set_auth_token(&self, user_id: i64, token: Option<&str>) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let changed = conn
            .execute(
                "UPDATE user SET auth_token = ?1 WHERE id = ?2",
                params![token, user_id],
            )
            .map_err(|e| write_error("user", e))?;
        if changed == 0 {
            return Err(StorageError::not_found("user", user_id));
        }
        Ok(())
    }

    async fn set_user_image(&self, user_id: i64, filename: Option<&str>) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let changed = conn
            .execute(
                "UPDATE user SET image_filename = ?1 WHERE id = ?2",
                params![filename, user_id],
            )
            .map_err(|e| write_error("user", e))?;
        if changed == 0 {
            return Err(StorageError::not_found("user", user_id));
        }
        Ok(())
    }
}

// ============================================================================
// PetitionStorage
// ============================================================================

#[async_trait]
impl PetitionStorage for SqliteBackend {
    async fn create_petition(&self, petition: NewPetition) -> StorageResult<i64> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "INSERT INTO petition (title, description, creation_date, owner_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                petition.title,
                petition.description,
                petition.creation_date,
                petition.owner_id,
                petition.category_id,
            ],
        )
        .map_err(|e| write_error("petition", e))?;
        let petition_id = tx.last_insert_rowid();

        for tier in &petition.support_tiers {
            insert_tier(&tx, petition_id, tier)?;
        }

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(
            petition_id,
            tiers = petition.support_tiers.len(),
            "Created petition"
        );
        Ok(petition_id)
    }

    async fn read_petition(&self, petition_id: i64) -> StorageResult<Option<Petition>> {
        let conn = self.get_connection()?;
        read_petition_row(&conn, petition_id)
    }

    async fn petition_title_taken(
        &self,
        title: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        exists(
            &conn,
            "SELECT 1 FROM petition WHERE title = ?1 AND (?2 IS NULL OR id <> ?2)",
            params![title, excluding],
        )
        .map_err(|e| read_error("petition", e))
    }

    async fn update_petition(
        &self,
        petition_id: i64,
        update: PetitionUpdate,
    ) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let current = read_petition_row(&conn, petition_id)?
            .ok_or_else(|| StorageError::not_found("petition", petition_id))?;

        conn.execute(
            "UPDATE petition SET title = ?1, description = ?2, category_id = ?3 WHERE id = ?4",
            params![
                update.title.unwrap_or(current.title),
                update.description.unwrap_or(current.description),
                update.category_id.unwrap_or(current.category_id),
                petition_id,
            ],
        )
        .map_err(|e| write_error("petition", e))?;
        Ok(())
    }

    async fn delete_petition(&self, petition_id: i64) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "DELETE FROM support_tier WHERE petition_id = ?1",
            [petition_id],
        )
        .map_err(|e| write_error("support tier", e))?;
        let deleted = tx
            .execute("DELETE FROM petition WHERE id = ?1", [petition_id])
            .map_err(|e| write_error("petition", e))?;
        if deleted == 0 {
            return Err(StorageError::not_found("petition", petition_id));
        }

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;
        Ok(())
    }

    async fn set_petition_image(
        &self,
        petition_id: i64,
        filename: Option<&str>,
    ) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let changed = conn
            .execute(
                "UPDATE petition SET image_filename = ?1 WHERE id = ?2",
                params![filename, petition_id],
            )
            .map_err(|e| write_error("petition", e))?;
        if changed == 0 {
            return Err(StorageError::not_found("petition", petition_id));
        }
        Ok(())
    }

    async fn funding_summary(&self, petition_id: i64) -> StorageResult<FundingSummary> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT COUNT(s.id), COALESCE(SUM(t.cost), 0)
             FROM supporter s INNER JOIN support_tier t ON s.support_tier_id = t.id
             WHERE s.petition_id = ?1",
            [petition_id],
            |row| {
                Ok(FundingSummary {
                    supporter_count: row.get(0)?,
                    money_raised: row.get(1)?,
                })
            },
        )
        .map_err(|e| read_error("supporter", e))
    }
}

// ============================================================================
// SupportTierStorage
// ============================================================================

#[async_trait]
impl SupportTierStorage for SqliteBackend {
    async fn create_support_tier(
        &self,
        petition_id: i64,
        tier: NewSupportTier,
    ) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        insert_tier(&conn, petition_id, &tier)
    }

    async fn read_support_tier(&self, tier_id: i64) -> StorageResult<Option<StoredSupportTier>> {
        let conn = self.get_connection()?;
        read_tier_row(&conn, tier_id)
    }

    async fn list_support_tiers(&self, petition_id: i64) -> StorageResult<Vec<SupportTier>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM support_tier WHERE petition_id = ?1 ORDER BY id",
                TIER_COLUMNS
            ))
            .map_err(|e| read_error("support tier", e))?;
        let rows = stmt
            .query_map([petition_id], tier_from_row)
            .map_err(|e| read_error("support tier", e))?;
        rows.map(|row| row.map(SupportTier::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_error("support tier", e))
    }

    async fn count_support_tiers(&self, petition_id: i64) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT COUNT(*) FROM support_tier WHERE petition_id = ?1",
            [petition_id],
            |row| row.get(0),
        )
        .map_err(|e| read_error("support tier", e))
    }

    async fn tier_title_taken(
        &self,
        petition_id: i64,
        title: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        exists(
            &conn,
            "SELECT 1 FROM support_tier
             WHERE petition_id = ?1 AND title = ?2 AND (?3 IS NULL OR id <> ?3)",
            params![petition_id, title, excluding],
        )
        .map_err(|e| read_error("support tier", e))
    }

    async fn update_support_tier(
        &self,
        tier_id: i64,
        update: SupportTierUpdate,
    ) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let current = read_tier_row(&conn, tier_id)?
            .ok_or_else(|| StorageError::not_found("support tier", tier_id))?;

        conn.execute(
            "UPDATE support_tier SET title = ?1, description = ?2, cost = ?3 WHERE id = ?4",
            params![
                update.title.unwrap_or(current.title),
                update.description.unwrap_or(current.description),
                update.cost.unwrap_or(current.cost),
                tier_id,
            ],
        )
        .map_err(|e| write_error("support tier", e))?;
        Ok(())
    }

    async fn delete_support_tier(&self, tier_id: i64) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let deleted = conn
            .execute("DELETE FROM support_tier WHERE id = ?1", [tier_id])
            .map_err(|e| write_error("support tier", e))?;
        if deleted == 0 {
            return Err(StorageError::not_found("support tier", tier_id));
        }
        Ok(())
    }

    async fn tier_has_supporters(&self, tier_id: i64) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        exists(
            &conn,
            "SELECT 1 FROM supporter WHERE support_tier_id = ?1",
            [tier_id],
        )
        .map_err(|e| read_error("supporter", e))
    }
}

// ============================================================================
// SupporterStorage
// ============================================================================

#[async_trait]
impl SupporterStorage for SqliteBackend {
    async fn add_pledge(
        &self,
        petition_id: i64,
        user_id: i64,
        pledge: NewPledge,
        timestamp: DateTime<Utc>,
    ) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO supporter (petition_id, support_tier_id, user_id, message, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                petition_id,
                pledge.support_tier_id,
                user_id,
                pledge.message,
                timestamp,
            ],
        )
        .map_err(|e| write_error("supporter", e))?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_pledge(
        &self,
        petition_id: i64,
        tier_id: i64,
        user_id: i64,
    ) -> StorageResult<Option<Pledge>> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT id, petition_id, support_tier_id, user_id, message, timestamp
             FROM supporter
             WHERE petition_id = ?1 AND support_tier_id = ?2 AND user_id = ?3",
            [petition_id, tier_id, user_id],
            |row| {
                Ok(Pledge {
                    id: row.get(0)?,
                    petition_id: row.get(1)?,
                    support_tier_id: row.get(2)?,
                    user_id: row.get(3)?,
                    message: row.get(4)?,
                    timestamp: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(|e| read_error("supporter", e))
    }

    async fn list_supporters(&self, petition_id: i64) -> StorageResult<Vec<SupporterView>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.support_tier_id, s.message, s.user_id,
                        u.first_name, u.last_name, s.timestamp
                 FROM supporter s INNER JOIN user u ON s.user_id = u.id
                 WHERE s.petition_id = ?1
                 ORDER BY s.timestamp DESC, s.id DESC",
            )
            .map_err(|e| read_error("supporter", e))?;
        let rows = stmt
            .query_map([petition_id], |row| {
                Ok(SupporterView {
                    support_id: row.get(0)?,
                    support_tier_id: row.get(1)?,
                    message: row.get(2)?,
                    supporter_id: row.get(3)?,
                    supporter_first_name: row.get(4)?,
                    supporter_last_name: row.get(5)?,
                    timestamp: row.get(6)?,
                })
            })
            .map_err(|e| read_error("supporter", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_error("supporter", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_backend() -> SqliteBackend {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
        }
    }

    fn new_petition(owner_id: i64, title: &str) -> NewPetition {
        NewPetition {
            title: title.to_string(),
            description: "A petition".to_string(),
            creation_date: Utc::now(),
            owner_id,
            category_id: 1,
            support_tiers: vec![NewSupportTier {
                title: "Basic".to_string(),
                description: "Thanks".to_string(),
                cost: 5,
            }],
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let backend = create_backend();
        backend.create_user(new_user("a@example.com")).await.unwrap();

        let err = backend
            .create_user(new_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Resource(ResourceError::AlreadyExists { entity: "user", .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_tier_insert_rolls_back_petition() {
        let backend = create_backend();
        let owner = backend.create_user(new_user("o@example.com")).await.unwrap();

        let mut petition = new_petition(owner, "Duplicate tiers");
        petition.support_tiers.push(petition.support_tiers[0].clone());

        assert!(backend.create_petition(petition).await.is_err());
        assert!(
            !backend
                .petition_title_taken("Duplicate tiers", None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_title_taken_excludes_self() {
        let backend = create_backend();
        let owner = backend.create_user(new_user("o@example.com")).await.unwrap();
        let id = backend
            .create_petition(new_petition(owner, "Clean rivers"))
            .await
            .unwrap();

        assert!(backend.petition_title_taken("Clean rivers", None).await.unwrap());
        assert!(
            !backend
                .petition_title_taken("Clean rivers", Some(id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_token_lookup_and_clear() {
        let backend = create_backend();
        let id = backend.create_user(new_user("t@example.com")).await.unwrap();

        backend.set_auth_token(id, Some("abc")).await.unwrap();
        let found = backend.find_user_by_token("abc").await.unwrap().unwrap();
        assert_eq!(found.id, id);

        backend.set_auth_token(id, None).await.unwrap();
        assert!(backend.find_user_by_token("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_petition_removes_tiers() {
        let backend = create_backend();
        let owner = backend.create_user(new_user("o@example.com")).await.unwrap();
        let id = backend
            .create_petition(new_petition(owner, "Short lived"))
            .await
            .unwrap();

        backend.delete_petition(id).await.unwrap();

        assert!(backend.read_petition(id).await.unwrap().is_none());
        assert_eq!(backend.count_support_tiers(id).await.unwrap(), 0);
        assert!(backend.delete_petition(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_tier_is_not_found() {
        let backend = create_backend();
        let err = backend
            .update_support_tier(42, SupportTierUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
