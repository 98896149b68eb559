use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::{
    applications::dto::ApplyRequest,
    gigs::repo::{BudgetType, GigStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub gig_id: i64,
    pub applicant_id: i64,
    pub cover_letter: String,
    pub proposed_rate: Option<f64>,
    pub proposed_timeline: String,
    pub portfolio_links: Json<Vec<String>>,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Application plus the owning gig's poster, for authorization checks.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithGigOwner {
    #[sqlx(flatten)]
    pub application: Application,
    pub gig_owner: i64,
}

/// Row shape for the gig owner's applicant listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GigApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub applicant_name: String,
    pub applicant_picture: Option<String>,
    pub applicant_bio: Option<String>,
    pub applicant_skills: Json<Vec<String>>,
    pub applicant_location: Option<String>,
}

/// Row shape for an applicant's own listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MyApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub gig_title: String,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_type: BudgetType,
    pub gig_status: GigStatus,
    pub gig_owner_name: String,
}

pub async fn exists(db: &SqlitePool, gig_id: i64, applicant_id: i64) -> sqlx::Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM applications WHERE gig_id = ? AND applicant_id = ?")
            .bind(gig_id)
            .bind(applicant_id)
            .fetch_optional(db)
            .await?;
    Ok(row.is_some())
}

/// Insert the application and bump the gig's counter as one unit.
pub async fn create(
    db: &SqlitePool,
    applicant_id: i64,
    request: &ApplyRequest,
) -> sqlx::Result<i64> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO applications (\
            gig_id, applicant_id, cover_letter, proposed_rate, \
            proposed_timeline, portfolio_links\
         ) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(request.gig_id)
    .bind(applicant_id)
    .bind(request.cover_letter.trim())
    .bind(request.proposed_rate)
    .bind(request.proposed_timeline.trim())
    .bind(Json(&request.portfolio_links))
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE gigs SET applications_count = applications_count + 1 WHERE id = ?")
        .bind(request.gig_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_with_gig_owner(
    db: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<ApplicationWithGigOwner>> {
    sqlx::query_as::<_, ApplicationWithGigOwner>(
        "SELECT a.*, g.posted_by AS gig_owner \
         FROM applications a \
         JOIN gigs g ON a.gig_id = g.id \
         WHERE a.id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn set_status(db: &SqlitePool, id: i64, status: ApplicationStatus) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE applications SET status = ?, \
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?",
    )
    .bind(status)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Remove the application and decrement the gig's counter as one unit. The
/// decrement clamps at zero.
pub async fn withdraw(db: &SqlitePool, id: i64, gig_id: i64) -> sqlx::Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM applications WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE gigs SET applications_count = MAX(applications_count - 1, 0) WHERE id = ?")
        .bind(gig_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn list_for_gig(db: &SqlitePool, gig_id: i64) -> sqlx::Result<Vec<GigApplicationRow>> {
    sqlx::query_as::<_, GigApplicationRow>(
        "SELECT a.*, \
            u.full_name AS applicant_name, \
            u.profile_picture AS applicant_picture, \
            u.bio AS applicant_bio, \
            u.skills AS applicant_skills, \
            u.location AS applicant_location \
         FROM applications a \
         JOIN users u ON a.applicant_id = u.id \
         WHERE a.gig_id = ? \
         ORDER BY a.applied_at DESC",
    )
    .bind(gig_id)
    .fetch_all(db)
    .await
}

pub async fn list_for_applicant(
    db: &SqlitePool,
    applicant_id: i64,
) -> sqlx::Result<Vec<MyApplicationRow>> {
    sqlx::query_as::<_, MyApplicationRow>(
        "SELECT a.*, \
            g.title AS gig_title, \
            g.budget_min, \
            g.budget_max, \
            g.budget_type, \
            g.status AS gig_status, \
            u.full_name AS gig_owner_name \
         FROM applications a \
         JOIN gigs g ON a.gig_id = g.id \
         JOIN users u ON g.posted_by = u.id \
         WHERE a.applicant_id = ? \
         ORDER BY a.applied_at DESC",
    )
    .bind(applicant_id)
    .fetch_all(db)
    .await
}
