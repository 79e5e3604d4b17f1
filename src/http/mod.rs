pub mod request;
pub mod response;

use reqwest::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client, RequestBuilder, Response, StatusCode,
};
use std::ops::Deref;
use thiserror::Error;

const USER_AGENT_VALUE: &str = "coverage-relay";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        HttpClient {
            client: Client::new(),
        }
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

pub trait Headers {
    fn github_headers(self, token: &str) -> RequestBuilder;

    fn json_body(self, body: String) -> RequestBuilder;
}

impl Headers for RequestBuilder {
    fn github_headers(self, token: &str) -> RequestBuilder {
        self.header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(USER_AGENT, USER_AGENT_VALUE)
    }

    fn json_body(self, body: String) -> RequestBuilder {
        self.header(CONTENT_TYPE, "application/json").body(body)
    }
}

pub trait ResponseHandler {
    async fn handle(self) -> Result<String, Error>;

    async fn handle_status(self, expected: StatusCode) -> Result<String, Error>;
}

impl ResponseHandler for reqwest::Result<Response> {
    async fn handle(self) -> Result<String, Error> {
        read(self, |status| status.is_success()).await
    }

    async fn handle_status(self, expected: StatusCode) -> Result<String, Error> {
        read(self, |status| status == expected).await
    }
}

async fn read(
    response: reqwest::Result<Response>,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<String, Error> {
    let response = response.map_err(|cause| Error::RequestError { cause })?;
    let status = response.status();

    let text = response
        .text()
        .await
        .map_err(|cause| Error::ReadResponseTextError { cause })?;

    if !accept(status) {
        return Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            message: text,
        });
    }

    Ok(text)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid API url {url}")]
    InvalidUrl { url: String },
    #[error("Request failed")]
    RequestError {
        #[source]
        cause: reqwest::Error,
    },
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },
    #[error("Failed to read response text")]
    ReadResponseTextError {
        #[source]
        cause: reqwest::Error,
    },
    #[error("Failed to parse response")]
    ParseResponseError {
        #[source]
        cause: serde_json::Error,
    },
    #[error("Failed to serialize request")]
    SerializeRequestError {
        #[source]
        cause: serde_json::Error,
    },
}

impl Error {
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use mockito::Server;

    #[tokio::test]
    async fn should_send_github_headers() -> Result<()> {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header("authorization", "token test_token")
            .match_header("accept", "application/vnd.github+json")
            .match_header("x-github-api-version", "2022-11-28")
            .match_header("user-agent", "coverage-relay")
            .with_body("test_body")
            .create_async()
            .await;

        let response = HttpClient::new()
            .get(server.url())
            .github_headers("test_token")
            .send()
            .await
            .handle()
            .await?;

        mock.assert_async().await;
        assert_eq!(response, "test_body");

        Ok(())
    }

    #[tokio::test]
    async fn should_reject_unexpected_status() -> Result<()> {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let result = HttpClient::new()
            .post(server.url())
            .json_body("{}".to_owned())
            .send()
            .await
            .handle_status(StatusCode::CREATED)
            .await;

        mock.assert_async().await;
        assert_eq!(result.err().and_then(|err| err.status()), Some(200));

        Ok(())
    }

    #[tokio::test]
    async fn should_keep_error_body() -> Result<()> {
        let mut server = Server::new_async().await;

        server
            .mock("PUT", "/")
            .with_status(422)
            .with_body(r#"{"message":"sha wasn't supplied"}"#)
            .create_async()
            .await;

        let result = HttpClient::new()
            .put(server.url())
            .send()
            .await
            .handle()
            .await;

        match result {
            Err(Error::UnexpectedStatus { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("sha wasn't supplied"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        Ok(())
    }
}
