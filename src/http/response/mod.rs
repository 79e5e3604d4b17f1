mod comment_response;
mod sha_response;
mod upsert_file_response;

pub use comment_response::CommentResponse;
pub use sha_response::FileShaResponse;
pub use upsert_file_response::UpsertFileResponse;

use super::Error;
use serde::de::DeserializeOwned;

pub trait DeserializeResponse: DeserializeOwned {
    fn from_response(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|cause| Error::ParseResponseError { cause })
    }
}

impl DeserializeResponse for CommentResponse {}
impl DeserializeResponse for FileShaResponse {}
impl DeserializeResponse for UpsertFileResponse {}
