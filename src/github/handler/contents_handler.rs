use super::builder::upsert_file_builder::UpsertFileBuilder;
use crate::github::github_client::GithubClient;

pub struct ContentsHandler<'a> {
    client: &'a GithubClient,
    owner: String,
    repo: String,
}

impl<'a> ContentsHandler<'a> {
    pub fn new(client: &'a GithubClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        ContentsHandler {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn upsert_file(&self) -> UpsertFileBuilder<'a> {
        UpsertFileBuilder::new(self.client, &self.owner, &self.repo)
    }
}
