use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FileShaResponse {
    pub sha: String,
}
