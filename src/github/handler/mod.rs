pub mod builder;
pub mod contents_handler;
pub mod issue_handler;
pub mod repository_handler;

use super::github_client::GithubClient;
use crate::http::Error;
use repository_handler::RepositoryHandler;

pub trait BuilderExecutor {
    type Output;

    async fn execute(self) -> Result<Self::Output, Error>;
}

/// Github repo handler access implementation
impl GithubClient {
    pub fn repo(
        &self,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> RepositoryHandler<'_> {
        RepositoryHandler::new(self, owner, name)
    }
}
