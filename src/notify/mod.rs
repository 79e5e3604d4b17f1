mod template;

use crate::{
    config::TargetConfig,
    github::{BuilderExecutor, GithubClient},
    http::{self, response::CommentResponse},
    runner::TestOutcome,
};
use serde::Serialize;
use template::{handlebars, COMMENT_TEMPLATE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid comment template")]
    Template {
        #[source]
        cause: handlebars::TemplateError,
    },
    #[error("Failed to render comment")]
    Render {
        #[source]
        cause: handlebars::RenderError,
    },
    #[error("Failed to comment on pull request #{number}")]
    Comment {
        number: u64,
        #[source]
        cause: http::Error,
    },
}

#[derive(Serialize)]
struct CommentContext<'a> {
    url: &'a str,
    passed: bool,
    status: String,
}

pub fn comment_body(report_url: &str, outcome: &TestOutcome) -> Result<String, Error> {
    let hb = handlebars().map_err(|cause| Error::Template { cause })?;

    let context = CommentContext {
        url: report_url,
        passed: outcome.passed(),
        status: outcome.to_string(),
    };

    let body = hb
        .render(COMMENT_TEMPLATE, &context)
        .map_err(|cause| Error::Render { cause })?;

    Ok(body.trim_end().to_owned())
}

pub async fn notify(
    target: &TargetConfig,
    github: &GithubClient,
    number: u64,
    report_url: &str,
    outcome: &TestOutcome,
) -> Result<CommentResponse, Error> {
    let body = comment_body(report_url, outcome)?;

    github
        .repo(&target.owner, &target.repo)
        .issue(number)
        .comment()
        .body(body)
        .execute()
        .await
        .map_err(|cause| Error::Comment { number, cause })
}
