use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

impl CommentRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
