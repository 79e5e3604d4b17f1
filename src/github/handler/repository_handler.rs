use super::{contents_handler::ContentsHandler, issue_handler::IssueHandler};
use crate::github::github_client::GithubClient;

pub struct RepositoryHandler<'a> {
    client: &'a GithubClient,
    owner: String,
    repo: String,
}

impl<'a> RepositoryHandler<'a> {
    pub fn new(client: &'a GithubClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepositoryHandler {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn contents(&self) -> ContentsHandler<'a> {
        ContentsHandler::new(self.client, &self.owner, &self.repo)
    }

    pub fn issue(&self, number: u64) -> IssueHandler<'a> {
        IssueHandler::new(self.client, &self.owner, &self.repo, number)
    }
}
