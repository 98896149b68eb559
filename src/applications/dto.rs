use serde::Deserialize;

use crate::applications::repo::ApplicationStatus;

/// Request body for applying to a gig.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub gig_id: i64,
    pub cover_letter: String,
    pub proposed_rate: Option<f64>,
    pub proposed_timeline: String,
    #[serde(default)]
    pub portfolio_links: Vec<String>,
}

/// Request body for the gig owner's accept/reject decision.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}
