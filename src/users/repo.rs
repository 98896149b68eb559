use sqlx::{types::Json, SqlitePool};

use crate::users::dto::UpdateProfileRequest;

pub async fn update_profile(
    db: &SqlitePool,
    user_id: i64,
    update: &UpdateProfileRequest,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE users SET \
            full_name = ?, bio = ?, skills = ?, location = ?, website = ?, phone = ?, \
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?",
    )
    .bind(update.full_name.trim())
    .bind(&update.bio)
    .bind(Json(&update.skills))
    .bind(&update.location)
    .bind(&update.website)
    .bind(&update.phone)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(())
}
