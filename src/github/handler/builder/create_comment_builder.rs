use crate::{
    github::{github_client::GithubClient, BuilderExecutor},
    http::{response::CommentResponse, Error},
};

pub struct CreateCommentBuilder<'a> {
    client: &'a GithubClient,
    owner: String,
    repo: String,
    number: u64,
    body: String,
}

impl<'a> CreateCommentBuilder<'a> {
    pub fn new(
        client: &'a GithubClient,
        owner: impl Into<String>,
        repo: impl Into<String>,
        number: u64,
    ) -> Self {
        CreateCommentBuilder {
            client,
            owner: owner.into(),
            repo: repo.into(),
            number,
            body: String::new(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl BuilderExecutor for CreateCommentBuilder<'_> {
    type Output = CommentResponse;

    async fn execute(self) -> Result<Self::Output, Error> {
        self.client
            .create_issue_comment(&self.owner, &self.repo, self.number, self.body)
            .await
    }
}
