use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpsertFileResponse {
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    pub path: String,
    pub sha: String,
}
