use serde::Deserialize;

/// Request body for profile updates; every listed column is overwritten.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}
