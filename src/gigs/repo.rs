use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, QueryBuilder, Sqlite, SqlitePool};
use time::OffsetDateTime;

use crate::gigs::dto::{GigPayload, ListParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BudgetType {
    Fixed,
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum GigStatus {
    Open,
    InProgress,
    Completed,
    Closed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub posted_by: i64,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_type: BudgetType,
    pub deadline: Option<String>,
    pub duration_estimate: Option<String>,
    pub difficulty_level: Difficulty,
    pub required_skills: Json<Vec<String>>,
    pub remote_allowed: bool,
    pub location: Option<String>,
    pub tags: Json<Vec<String>>,
    pub is_urgent: bool,
    pub status: GigStatus,
    pub views_count: i64,
    pub applications_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Listing row: gig columns plus the joined owner and category labels.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GigListRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub gig: Gig,
    pub posted_by_name: Option<String>,
    pub posted_by_picture: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GigDetailRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub gig: Gig,
    pub posted_by_name: Option<String>,
    pub posted_by_picture: Option<String>,
    pub posted_by_bio: Option<String>,
    pub posted_by_location: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

/// Just enough of a gig to run the application business rules.
#[derive(Debug, Clone, FromRow)]
pub struct GigBrief {
    pub id: i64,
    pub posted_by: i64,
    pub status: GigStatus,
}

const SORTABLE: [&str; 5] = [
    "created_at",
    "budget_min",
    "budget_max",
    "deadline",
    "applications_count",
];

/// Allow-listed sort column; anything else falls back to creation time.
pub fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some(value) => SORTABLE
            .iter()
            .find(|col| **col == value)
            .copied()
            .unwrap_or("created_at"),
        None => "created_at",
    }
}

pub fn sort_order(requested: Option<&str>) -> &'static str {
    match requested {
        Some(value) if value.eq_ignore_ascii_case("asc") => "ASC",
        _ => "DESC",
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, params: &'a ListParams) {
    builder.push(" WHERE g.status = 'open'");
    if let Some(category) = params.category {
        builder.push(" AND g.category_id = ").push_bind(category);
    }
    if let Some(min) = params.min_budget {
        builder.push(" AND g.budget_min >= ").push_bind(min);
    }
    if let Some(max) = params.max_budget {
        builder.push(" AND g.budget_max <= ").push_bind(max);
    }
    if let Some(budget_type) = params.budget_type {
        builder.push(" AND g.budget_type = ").push_bind(budget_type);
    }
    if let Some(difficulty) = params.difficulty_level {
        builder
            .push(" AND g.difficulty_level = ")
            .push_bind(difficulty);
    }
    if let Some(remote) = params.remote_allowed {
        builder.push(" AND g.remote_allowed = ").push_bind(remote);
    }
    if let Some(search) = params.search.as_deref() {
        let pattern = format!("%{search}%");
        builder
            .push(" AND (g.title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR g.description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub async fn count(db: &SqlitePool, params: &ListParams) -> sqlx::Result<i64> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM gigs g");
    push_filters(&mut builder, params);
    builder.build_query_scalar::<i64>().fetch_one(db).await
}

pub async fn list(
    db: &SqlitePool,
    params: &ListParams,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<GigListRow>> {
    let mut builder = QueryBuilder::new(
        "SELECT g.*, \
            u.full_name AS posted_by_name, \
            u.profile_picture AS posted_by_picture, \
            c.name AS category_name, \
            c.color AS category_color \
         FROM gigs g \
         LEFT JOIN users u ON g.posted_by = u.id \
         LEFT JOIN categories c ON g.category_id = c.id",
    );
    push_filters(&mut builder, params);
    builder
        .push(" ORDER BY g.")
        .push(sort_column(params.sort_by.as_deref()))
        .push(" ")
        .push(sort_order(params.sort_order.as_deref()));
    builder
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder.build_query_as::<GigListRow>().fetch_all(db).await
}

pub async fn list_by_owner(db: &SqlitePool, owner_id: i64) -> sqlx::Result<Vec<GigListRow>> {
    sqlx::query_as::<_, GigListRow>(
        "SELECT g.*, \
            u.full_name AS posted_by_name, \
            u.profile_picture AS posted_by_picture, \
            c.name AS category_name, \
            c.color AS category_color \
         FROM gigs g \
         LEFT JOIN users u ON g.posted_by = u.id \
         LEFT JOIN categories c ON g.category_id = c.id \
         WHERE g.posted_by = ? \
         ORDER BY g.created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(db)
    .await
}

/// Single atomic bump; returns false when the gig does not exist.
pub async fn bump_views(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE gigs SET views_count = views_count + 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find_detail(db: &SqlitePool, id: i64) -> sqlx::Result<Option<GigDetailRow>> {
    sqlx::query_as::<_, GigDetailRow>(
        "SELECT g.*, \
            u.full_name AS posted_by_name, \
            u.profile_picture AS posted_by_picture, \
            u.bio AS posted_by_bio, \
            u.location AS posted_by_location, \
            c.name AS category_name, \
            c.color AS category_color \
         FROM gigs g \
         LEFT JOIN users u ON g.posted_by = u.id \
         LEFT JOIN categories c ON g.category_id = c.id \
         WHERE g.id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_brief(db: &SqlitePool, id: i64) -> sqlx::Result<Option<GigBrief>> {
    sqlx::query_as::<_, GigBrief>("SELECT id, posted_by, status FROM gigs WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_owner(db: &SqlitePool, id: i64) -> sqlx::Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT posted_by FROM gigs WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(owner,)| owner))
}

pub async fn create(db: &SqlitePool, owner_id: i64, payload: &GigPayload) -> sqlx::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO gigs (\
            title, description, category_id, posted_by, budget_min, budget_max, \
            budget_type, deadline, duration_estimate, difficulty_level, \
            required_skills, remote_allowed, location, tags, is_urgent\
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(payload.title.trim())
    .bind(payload.description.trim())
    .bind(payload.category_id)
    .bind(owner_id)
    .bind(payload.budget_min)
    .bind(payload.budget_max)
    .bind(payload.budget_type)
    .bind(&payload.deadline)
    .bind(&payload.duration_estimate)
    .bind(payload.difficulty_level)
    .bind(Json(&payload.required_skills))
    .bind(payload.remote_allowed)
    .bind(&payload.location)
    .bind(Json(&payload.tags))
    .bind(payload.is_urgent)
    .execute(db)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(
    db: &SqlitePool,
    id: i64,
    payload: &GigPayload,
    status: GigStatus,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE gigs SET \
            title = ?, description = ?, category_id = ?, budget_min = ?, budget_max = ?, \
            budget_type = ?, deadline = ?, duration_estimate = ?, difficulty_level = ?, \
            required_skills = ?, remote_allowed = ?, location = ?, tags = ?, is_urgent = ?, \
            status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?",
    )
    .bind(payload.title.trim())
    .bind(payload.description.trim())
    .bind(payload.category_id)
    .bind(payload.budget_min)
    .bind(payload.budget_max)
    .bind(payload.budget_type)
    .bind(&payload.deadline)
    .bind(&payload.duration_estimate)
    .bind(payload.difficulty_level)
    .bind(Json(&payload.required_skills))
    .bind(payload.remote_allowed)
    .bind(&payload.location)
    .bind(Json(&payload.tags))
    .bind(payload.is_urgent)
    .bind(status)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Applications referencing the gig go with it through the FK cascade.
pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM gigs WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
