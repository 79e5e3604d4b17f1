mod git_push;
mod upload;

use crate::{
    config::{Config, PublishStrategy},
    git,
    github::GithubClient,
    report::ReportLocation,
};
use glob::Pattern;
use handlebars::{no_escape, Handlebars};
use itertools::Itertools;
use serde_json::json;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Report directory {} is missing or empty", .0.display())]
    MissingReport(PathBuf),
    #[error("Invalid report directory {}", .path.display())]
    Pattern {
        path: PathBuf,
        #[source]
        cause: glob::PatternError,
    },
    #[error("Failed to copy report files")]
    Copy {
        #[source]
        cause: io::Error,
    },
    #[error("Failed to render commit message")]
    CommitMessage {
        #[source]
        cause: handlebars::RenderError,
    },
    #[error(transparent)]
    Git(#[from] git::Error),
    #[error("Git task did not complete")]
    Join {
        #[source]
        cause: tokio::task::JoinError,
    },
}

/// Report file with its path relative to the report root, `/` separated.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub absolute: PathBuf,
    pub relative: String,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct Publication {
    pub location: ReportLocation,
    pub files: usize,
    pub failures: Vec<FileFailure>,
}

pub fn location(config: &Config, number: u64) -> ReportLocation {
    ReportLocation::for_pull_request(number, &config.test.report_entry)
}

pub async fn publish(
    config: &Config,
    github: &GithubClient,
    report_dir: &Path,
    results_dir: &Path,
    number: u64,
) -> Result<Publication, Error> {
    let location = location(config, number);
    let files = report_files(report_dir)?;
    let message = commit_message(&config.results.commit_message, number)?;

    log::info!(
        "Publishing {} report files to {}/{}:{}",
        files.len(),
        config.results.owner,
        config.results.repo,
        location.dir()
    );

    match config.results.strategy {
        PublishStrategy::GitPush => {
            git_push::publish(config, results_dir, files, location, message).await
        }
        PublishStrategy::Upload => upload::publish(config, github, files, location, message).await,
    }
}

pub fn report_files(report_dir: &Path) -> Result<Vec<ReportFile>, Error> {
    if !report_dir.is_dir() {
        return Err(Error::MissingReport(report_dir.to_owned()));
    }

    let pattern = format!("{}/**/*", Pattern::escape(&report_dir.to_string_lossy()));

    let entries = glob::glob(&pattern).map_err(|cause| Error::Pattern {
        path: report_dir.to_owned(),
        cause,
    })?;

    let files = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("Skipping unreadable report entry: {}", err);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter_map(|absolute| {
            let relative = absolute
                .strip_prefix(report_dir)
                .ok()?
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .join("/");

            Some(ReportFile { absolute, relative })
        })
        .sorted_by(|a, b| a.relative.cmp(&b.relative))
        .collect_vec();

    if files.is_empty() {
        return Err(Error::MissingReport(report_dir.to_owned()));
    }

    Ok(files)
}

fn commit_message(template: &str, number: u64) -> Result<String, Error> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(no_escape);

    hb.render_template(template, &json!({ "number": number }))
        .map_err(|cause| Error::CommitMessage { cause })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn should_list_report_files_recursively() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("report")?;
        fs::create_dir_all(dir.path().join("css"))?;
        fs::write(dir.path().join("index.html"), "<html></html>")?;
        fs::write(dir.path().join("css/style.css"), "body {}")?;
        fs::write(dir.path().join(".gitignore"), "*")?;

        let files = report_files(dir.path())?;

        let relative: Vec<&str> = files.iter().map(|file| file.relative.as_str()).collect();
        assert_eq!(relative, vec![".gitignore", "css/style.css", "index.html"]);

        dir.close()?;
        Ok(())
    }

    #[test]
    fn should_reject_missing_report() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("report")?;

        let missing = report_files(&dir.path().join("htmlcov"));
        let empty = report_files(dir.path());

        assert!(matches!(missing, Err(Error::MissingReport(_))));
        assert!(matches!(empty, Err(Error::MissingReport(_))));

        dir.close()?;
        Ok(())
    }

    #[test]
    fn should_render_commit_message() -> Result<(), Box<dyn std::error::Error>> {
        let message = commit_message("Add coverage report for PR #{{number}}", 12)?;

        assert_eq!(message, "Add coverage report for PR #12");

        Ok(())
    }

    #[test]
    fn should_place_report_under_pull_request_dir() {
        let location = location(&Config::default(), 5);

        assert_eq!(location.entry_path(), "pr-5/index.html");
    }
}
