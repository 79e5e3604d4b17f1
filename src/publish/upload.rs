use super::{Error, FileFailure, Publication, ReportFile};
use crate::{
    config::Config,
    git::committer::Committer,
    github::{BuilderExecutor, GithubClient},
    report::ReportLocation,
};
use tokio_stream::StreamExt;

pub(super) async fn publish(
    config: &Config,
    github: &GithubClient,
    files: Vec<ReportFile>,
    location: ReportLocation,
    message: String,
) -> Result<Publication, Error> {
    let results = &config.results;
    let committer = Committer::from(&config.committer);

    let mut stream = tokio_stream::iter(files);

    let mut uploaded = 0;
    let mut failures = vec![];
    while let Some(file) = stream.next().await {
        let path = location.path_of(&file.relative);

        let content = match tokio::fs::read(&file.absolute).await {
            Ok(content) => content,
            Err(err) => {
                log::error!("Cannot read {}: {}", file.absolute.display(), err);
                failures.push(FileFailure {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let result = github
            .repo(&results.owner, &results.repo)
            .contents()
            .upsert_file()
            .path(&path)
            .message(&message)
            .content(content)
            .branch(results.branch.to_owned())
            .committer(&committer)
            .execute()
            .await;

        match result {
            Ok(response) => {
                log::debug!("Uploaded {} ({})", response.content.path, response.content.sha);
                uploaded += 1;
            }
            Err(err) => {
                log::error!("Failed to upload {}: {}", path, err);
                failures.push(FileFailure {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "Uploaded {} files to {}, {} failed",
        uploaded,
        location,
        failures.len()
    );

    Ok(Publication {
        location,
        files: uploaded,
        failures,
    })
}
