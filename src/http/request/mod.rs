mod comment_request;
mod committer_request;
mod upsert_file_request;

pub use comment_request::CommentRequest;
pub use committer_request::CommitterRequest;
pub use upsert_file_request::UpsertFileRequest;

use super::Error;
use serde::Serialize;

pub trait SerializeRequest {
    fn into_request(self) -> Result<String, Error>
    where
        Self: Serialize + Sized,
    {
        serde_json::to_string(&self).map_err(|cause| Error::SerializeRequestError { cause })
    }
}

impl SerializeRequest for CommentRequest {}
impl SerializeRequest for UpsertFileRequest {}
