use serde::{Deserialize, Serialize};

/// Request body for creating a post. The author is taken from the
/// authenticated principal, not from the body.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// Partial update body; omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
