use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::auth::Role;
use crate::db::operations::SqliteExec;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

fn map_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        role: Role::from_str(row.get::<String, _>("role").as_str()),
        created_at: row.get("created_at"),
    }
}

pub async fn get_user<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "id" = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| map_user(&r)))
}

pub async fn create_user<'e, E: SqliteExec<'e>>(
    executor: E,
    username: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO "users" ("username", "role", "created_at")
        VALUES (?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(role.as_str())
    .bind(now)
    .execute(executor)
    .await?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        role,
        created_at: now,
    })
}
