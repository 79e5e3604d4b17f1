use super::builder::create_comment_builder::CreateCommentBuilder;
use crate::github::github_client::GithubClient;

pub struct IssueHandler<'a> {
    client: &'a GithubClient,
    owner: String,
    repo: String,
    number: u64,
}

impl<'a> IssueHandler<'a> {
    pub fn new(
        client: &'a GithubClient,
        owner: impl Into<String>,
        repo: impl Into<String>,
        number: u64,
    ) -> Self {
        IssueHandler {
            client,
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    pub fn comment(&self) -> CreateCommentBuilder<'a> {
        CreateCommentBuilder::new(self.client, &self.owner, &self.repo, self.number)
    }
}
