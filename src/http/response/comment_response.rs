use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub html_url: Option<String>,
}
