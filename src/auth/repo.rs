use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, SqlitePool};
use time::OffsetDateTime;

/// Account role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Student,
    Freelancer,
    Employer,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub skills: Json<Vec<String>>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, password_hash, full_name, role, profile_picture, bio, \
                            skills, location, website, phone, is_verified, is_active, \
                            created_at, updated_at";

/// Find an active user by email.
pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? AND is_active = 1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ? AND is_active = 1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Duplicate check spans inactive accounts too; the email column is unique
/// for the lifetime of the row.
pub async fn email_taken(db: &SqlitePool, email: &str) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn create(
    db: &SqlitePool,
    email: &str,
    full_name: &str,
    password_hash: &str,
    role: Role,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, full_name, password_hash, role) \
         VALUES (?, ?, ?, ?) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(role)
    .fetch_one(db)
    .await
}

/// Last-login marker.
pub async fn touch(db: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE users SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
    )
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}
