use crate::{
    git::committer::Committer,
    github::{dto::commit_info_dto::CommitInfoDto, github_client::GithubClient, BuilderExecutor},
    http::{response::UpsertFileResponse, Error},
};

pub struct UpsertFileBuilder<'a> {
    client: &'a GithubClient,
    owner: String,
    repo: String,
    path: String,
    commit_message: String,
    content: Vec<u8>,
    committer: Committer,
    branch: Option<String>,
}

impl<'a> UpsertFileBuilder<'a> {
    pub fn new(client: &'a GithubClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        UpsertFileBuilder {
            client,
            owner: owner.into(),
            repo: repo.into(),
            path: String::new(),
            commit_message: String::new(),
            content: Vec::new(),
            committer: Committer::default(),
            branch: None,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    pub fn branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn committer(mut self, committer: &Committer) -> Self {
        self.committer = committer.to_owned();
        self
    }
}

impl BuilderExecutor for UpsertFileBuilder<'_> {
    type Output = UpsertFileResponse;

    async fn execute(self) -> Result<Self::Output, Error> {
        let commit_info = CommitInfoDto::new(&self.commit_message, &self.committer);

        self.client
            .upsert_file(
                &self.owner,
                &self.repo,
                &self.path,
                &self.content,
                self.branch,
                commit_info,
            )
            .await
    }
}
