use super::{Error, Publication, ReportFile};
use crate::{config::Config, git, git::committer::Committer, report::ReportLocation};
use std::{fs, path::Path};

// coverage.py drops a `*` ignore file into its html output
const IGNORE_FILE_NAME: &str = ".gitignore";

pub(super) async fn publish(
    config: &Config,
    results_dir: &Path,
    files: Vec<ReportFile>,
    location: ReportLocation,
    message: String,
) -> Result<Publication, Error> {
    let url = config.results.clone_url();
    let token = config.secrets.results_token.to_owned();
    let branch = config.results.branch.to_owned();
    let committer = Committer::from(&config.committer);
    let results_dir = results_dir.to_owned();

    tokio::task::spawn_blocking(move || {
        log::info!("Cloning results repository {}", url);
        let repo = git::clone(&url, &token, branch.as_deref(), &results_dir)?;

        let copied = copy_report(&files, &results_dir.join(location.dir()))?;

        match git::commit_all(&repo, &message, &committer)? {
            Some(oid) => {
                let branch = git::push(&repo, &token)?;
                log::info!("Pushed {} to {} as {}", location, branch, oid);
            }
            None => log::info!("Report at {} is unchanged, nothing to push", location),
        }

        Ok(Publication {
            location,
            files: copied,
            failures: Vec::new(),
        })
    })
    .await
    .map_err(|cause| Error::Join { cause })?
}

fn copy_report(files: &[ReportFile], target: &Path) -> Result<usize, Error> {
    if target.exists() {
        fs::remove_dir_all(target).map_err(|cause| Error::Copy { cause })?;
    }

    let mut copied = 0;

    for file in files {
        if file.absolute.file_name().is_some_and(|name| name == IGNORE_FILE_NAME) {
            log::debug!("Skipping {}", file.relative);
            continue;
        }

        let destination = target.join(&file.relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|cause| Error::Copy { cause })?;
        }

        fs::copy(&file.absolute, &destination).map_err(|cause| Error::Copy { cause })?;
        copied += 1;
    }

    Ok(copied)
}
