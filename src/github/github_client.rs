use super::dto::commit_info_dto::CommitInfoDto;
use crate::http::{
    request::{CommentRequest, SerializeRequest, UpsertFileRequest},
    response::{CommentResponse, DeserializeResponse, FileShaResponse, UpsertFileResponse},
    Error, Headers, HttpClient, ResponseHandler,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use reqwest::StatusCode;
use url::Url;

const UNPROCESSABLE_ENTITY: u16 = 422;

pub struct GithubClient {
    http: HttpClient,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let api_url: String = api_url.into();

        GithubClient {
            http: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    // each segment is percent-encoded, so `#`, `?` and spaces stay in the path
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, Error> {
        let invalid = || Error::InvalidUrl {
            url: self.api_url.to_owned(),
        };

        let mut url = Url::parse(&self.api_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, Error> {
        self.endpoint(["repos", owner, repo, "contents"].into_iter().chain(path.split('/')))
    }

    pub(super) async fn upsert_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        branch: Option<String>,
        commit_info: CommitInfoDto,
    ) -> Result<UpsertFileResponse, Error> {
        log::debug!("Upserting file {}", path);
        let content = BASE64_STANDARD.encode(content);

        let request = UpsertFileRequest::new(
            &commit_info.message,
            content,
            branch.to_owned(),
            None,
            commit_info.committer.to_owned().into(),
        );

        match self.put_contents(owner, repo, path, request.clone()).await {
            Err(err) if err.status() == Some(UNPROCESSABLE_ENTITY) => {
                log::debug!("{} already exists, updating file", path);

                let sha = self
                    .get_file_sha(owner, repo, path, branch.as_deref())
                    .await?;

                self.put_contents(owner, repo, path, request.with_sha(sha.sha))
                    .await
            }
            result => result,
        }
    }

    async fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: UpsertFileRequest,
    ) -> Result<UpsertFileResponse, Error> {
        let body = request.into_request()?;

        let response = self
            .http
            .put(self.contents_url(owner, repo, path)?)
            .github_headers(&self.token)
            .json_body(body)
            .send()
            .await
            .handle()
            .await?;

        UpsertFileResponse::from_response(&response)
    }

    pub(super) async fn get_file_sha(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<FileShaResponse, Error> {
        let mut request = self.http.get(self.contents_url(owner, repo, path)?);

        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }

        let response = request
            .github_headers(&self.token)
            .send()
            .await
            .handle()
            .await?;

        FileShaResponse::from_response(&response)
    }

    pub(super) async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: String,
    ) -> Result<CommentResponse, Error> {
        log::debug!("Commenting on {}/{}#{}", owner, repo, number);
        let number = number.to_string();
        let url = self.endpoint(["repos", owner, repo, "issues", number.as_str(), "comments"])?;

        let body = CommentRequest::new(body).into_request()?;

        let response = self
            .http
            .post(url)
            .github_headers(&self.token)
            .json_body(body)
            .send()
            .await
            .handle_status(StatusCode::CREATED)
            .await?;

        CommentResponse::from_response(&response)
    }
}
