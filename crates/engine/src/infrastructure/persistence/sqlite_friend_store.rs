//! SQLite-backed account and friend edge storage.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use gauniv_domain::{FriendEdge, UserAccount, UserId, UserName};

use crate::infrastructure::ports::{FriendRepo, RelationRecord, RepoError, UserRepo};

/// Shown when the other party's account row is missing.
const UNKNOWN_USER_NAME: &str = "Unknown";

const EDGE_COLUMNS: &str =
    "f.source_user_id, f.target_user_id, f.created_at, f.is_accepted, f.accepted_at";

/// SQLite implementation of the account and friend edge tables.
///
/// At most one edge per unordered pair is enforced by a unique index over
/// `(min(source, target), max(source, target))`, so a racing duplicate insert
/// fails in the database rather than creating a second edge.
pub struct SqliteFriendStore {
    pool: SqlitePool,
}

impl SqliteFriendStore {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), RepoError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                user_name TEXT NOT NULL UNIQUE COLLATE NOCASE
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS user_friends (
                source_user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                target_user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                is_accepted INTEGER NOT NULL DEFAULT 0,
                accepted_at TEXT,
                PRIMARY KEY (source_user_id, target_user_id),
                CHECK (source_user_id <> target_user_id)
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS user_friends_unordered_pair
            ON user_friends (
                min(source_user_id, target_user_id),
                max(source_user_id, target_user_id)
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("ensure_schema", e))?;
        }
        Ok(())
    }
}

fn parse_user_id(raw: String) -> Result<UserId, RepoError> {
    UserId::new(raw).map_err(RepoError::corrupt)
}

// Fixed width so that text ordering in SQL is chronological
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::corrupt(format!("bad timestamp {raw:?}: {e}")))
}

fn row_to_edge(row: &SqliteRow) -> Result<FriendEdge, RepoError> {
    let get = |column: &str| -> Result<String, RepoError> {
        row.try_get::<String, _>(column).map_err(RepoError::corrupt)
    };
    let accepted: bool = row
        .try_get("is_accepted")
        .map_err(RepoError::corrupt)?;
    let accepted_at: Option<String> = row
        .try_get("accepted_at")
        .map_err(RepoError::corrupt)?;

    Ok(FriendEdge::from_storage(
        parse_user_id(get("source_user_id")?)?,
        parse_user_id(get("target_user_id")?)?,
        accepted,
        parse_timestamp(&get("created_at")?)?,
        accepted_at.as_deref().map(parse_timestamp).transpose()?,
    ))
}

fn row_to_account(row: &SqliteRow) -> Result<UserAccount, RepoError> {
    let id: String = row.try_get("id").map_err(RepoError::corrupt)?;
    let user_name: String = row
        .try_get("user_name")
        .map_err(RepoError::corrupt)?;
    Ok(UserAccount::new(
        parse_user_id(id)?,
        UserName::new(user_name).map_err(RepoError::corrupt)?,
    ))
}

fn map_write_error(operation: &'static str, e: sqlx::Error) -> RepoError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepoError::constraint(db.message());
        }
    }
    RepoError::database(operation, e)
}

#[async_trait]
impl FriendRepo for SqliteFriendStore {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<RelationRecord>, RepoError> {
        let query = format!(
            r#"
            SELECT {EDGE_COLUMNS}, u.user_name AS other_user_name
            FROM user_friends f
            LEFT JOIN users u ON u.id = CASE
                WHEN f.source_user_id = ? THEN f.target_user_id
                ELSE f.source_user_id
            END
            WHERE f.source_user_id = ? OR f.target_user_id = ?
            ORDER BY f.created_at DESC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(user_id.as_str())
            .bind(user_id.as_str())
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_for_user", e))?;

        rows.iter()
            .map(|row| {
                let edge = row_to_edge(row)?;
                let name: Option<String> = row
                    .try_get("other_user_name")
                    .map_err(RepoError::corrupt)?;
                let other_user_name =
                    UserName::new(name.unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()))
                        .map_err(RepoError::corrupt)?;
                Ok(RelationRecord {
                    edge,
                    other_user_name,
                })
            })
            .collect()
    }

    async fn accepted_friend_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT CASE
                WHEN source_user_id = ? THEN target_user_id
                ELSE source_user_id
            END AS friend_id
            FROM user_friends
            WHERE (source_user_id = ? OR target_user_id = ?) AND is_accepted = 1
            "#,
        )
        .bind(user_id.as_str())
        .bind(user_id.as_str())
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("accepted_friend_ids", e))?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("friend_id").map_err(RepoError::corrupt)?;
                parse_user_id(id)
            })
            .collect()
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<FriendEdge>, RepoError> {
        let query = format!(
            r#"
            SELECT {EDGE_COLUMNS} FROM user_friends f
            WHERE (f.source_user_id = ? AND f.target_user_id = ?)
               OR (f.source_user_id = ? AND f.target_user_id = ?)
            "#
        );
        let row = sqlx::query(&query)
            .bind(a.as_str())
            .bind(b.as_str())
            .bind(b.as_str())
            .bind(a.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("find_between", e))?;

        row.as_ref().map(row_to_edge).transpose()
    }

    async fn find_directed(
        &self,
        source: &UserId,
        target: &UserId,
    ) -> Result<Option<FriendEdge>, RepoError> {
        let query = format!(
            "SELECT {EDGE_COLUMNS} FROM user_friends f \
             WHERE f.source_user_id = ? AND f.target_user_id = ?"
        );
        let row = sqlx::query(&query)
            .bind(source.as_str())
            .bind(target.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("find_directed", e))?;

        row.as_ref().map(row_to_edge).transpose()
    }

    async fn insert(&self, edge: &FriendEdge) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO user_friends
                (source_user_id, target_user_id, created_at, is_accepted, accepted_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(edge.source().as_str())
        .bind(edge.target().as_str())
        .bind(format_timestamp(edge.created_at()))
        .bind(edge.is_accepted())
        .bind(edge.accepted_at().map(format_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("insert_friend_edge", e))?;
        Ok(())
    }

    async fn update(&self, edge: &FriendEdge) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE user_friends SET is_accepted = ?, accepted_at = ?
            WHERE source_user_id = ? AND target_user_id = ?
            "#,
        )
        .bind(edge.is_accepted())
        .bind(edge.accepted_at().map(format_timestamp))
        .bind(edge.source().as_str())
        .bind(edge.target().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("update_friend_edge", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(
                "FriendEdge",
                format!("{}->{}", edge.source(), edge.target()),
            ));
        }
        Ok(())
    }

    async fn delete_between(&self, a: &UserId, b: &UserId) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_friends
            WHERE (source_user_id = ? AND target_user_id = ?)
               OR (source_user_id = ? AND target_user_id = ?)
            "#,
        )
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(b.as_str())
        .bind(a.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("delete_friend_edge", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepo for SqliteFriendStore {
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, RepoError> {
        let row = sqlx::query("SELECT id, user_name FROM users WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_user", e))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserAccount>, RepoError> {
        let row = sqlx::query("SELECT id, user_name FROM users WHERE user_name = ?")
            .bind(user_name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("find_user_by_name", e))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn save(&self, account: &UserAccount) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, user_name) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET user_name = excluded.user_name
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.user_name().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("save_user", e))?;
        Ok(())
    }
}
