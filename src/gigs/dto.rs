use serde::{Deserialize, Serialize};

use crate::gigs::repo::{BudgetType, Difficulty, GigListRow, GigStatus};

/// Create and update share the same body shape; `status` only matters on
/// update and is ignored on create.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigPayload {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub budget_type: BudgetType,
    pub deadline: Option<String>,
    pub duration_estimate: Option<String>,
    pub difficulty_level: Difficulty,
    pub required_skills: Vec<String>,
    pub remote_allowed: bool,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_urgent: bool,
    pub status: Option<GigStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<i64>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub budget_type: Option<BudgetType>,
    pub difficulty_level: Option<Difficulty>,
    pub remote_allowed: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct GigListResponse {
    pub gigs: Vec<GigListRow>,
    pub pagination: Pagination,
}
