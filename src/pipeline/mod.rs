use crate::{
    config::{Config, OnFailure},
    git,
    github::GithubClient,
    notify,
    publish::{self, Publication},
    report::PagesSite,
    runner::{self, TestOutcome},
    workspace::{self, Workspace},
};
use std::{
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Workspace(#[from] workspace::Error),
    #[error("Failed to fetch the target repository")]
    Fetch(#[source] git::Error),
    #[error("Failed to run tests")]
    Test(#[from] runner::Error),
    #[error("Tests {0}, report not published")]
    TestsFailed(TestOutcome),
    #[error("Git task did not complete")]
    Join(#[source] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub number: u64,
    pub html_url: Option<String>,
}

#[derive(Debug)]
pub struct RunReport {
    pub number: u64,
    pub test: TestOutcome,
    pub publication: Option<Publication>,
    pub notified: bool,
}

pub struct Pipeline {
    config: Arc<Config>,
    target: GithubClient,
    results: GithubClient,
    site: PagesSite,
    lock: Mutex<()>,
    runs: AtomicU64,
}

impl Pipeline {
    pub fn new(config: Arc<Config>) -> Self {
        let api_url = &config.github.api_url;

        Pipeline {
            target: GithubClient::new(api_url, &config.secrets.github_token),
            results: GithubClient::new(api_url, &config.secrets.results_token),
            site: PagesSite::new(config.results.pages_url()),
            lock: Mutex::new(()),
            runs: AtomicU64::new(0),
            config,
        }
    }

    pub async fn run(&self, event: &PullRequestEvent) -> Result<RunReport, Error> {
        let _guard = self.lock.lock().await;

        let run_id = self.runs.fetch_add(1, Ordering::SeqCst);
        let name = format!("pr-{}-{}", event.number, run_id);

        match &event.html_url {
            Some(url) => log::info!("Starting run {} for {}", name, url),
            None => log::info!("Starting run {}", name),
        }

        let workspace = Workspace::prepare(&self.config.scratch_dir, &name).await?;

        let result = self.run_in(&workspace, event.number).await;

        if self.config.keep_workspace {
            log::debug!("Keeping {}", workspace.root().display());
        } else if let Err(err) = workspace.remove().await {
            log::warn!("{:#}", anyhow::Error::from(err));
        }

        result
    }

    async fn run_in(&self, workspace: &Workspace, number: u64) -> Result<RunReport, Error> {
        let config = &self.config;
        let checkout = workspace.checkout();

        fetch(config, &checkout).await?;

        let test = runner::run(&config.test, &checkout).await?;

        if !should_publish(&test.outcome, config.test.on_failure) {
            return Err(Error::TestsFailed(test.outcome));
        }

        let publication = match publish::publish(
            config,
            &self.results,
            &test.report_dir,
            &workspace.results(),
            number,
        )
        .await
        {
            Ok(publication) => {
                for failure in &publication.failures {
                    log::warn!("{} was not published: {}", failure.path, failure.reason);
                }
                Some(publication)
            }
            Err(err) => {
                log::error!(
                    "Publishing report for PR #{} failed: {:#}",
                    number,
                    anyhow::Error::from(err)
                );
                None
            }
        };

        let location = publication
            .as_ref()
            .map(|publication| publication.location.to_owned())
            .unwrap_or_else(|| publish::location(config, number));
        let report_url = self.site.url_for(&location);

        let notified =
            match notify::notify(&config.target, &self.target, number, &report_url, &test.outcome)
                .await
            {
                Ok(comment) => {
                    match comment.html_url {
                        Some(url) => log::info!("Commented on PR #{}: {}", number, url),
                        None => log::info!("Commented on PR #{}", number),
                    }
                    true
                }
                Err(err) => {
                    log::error!("{:#}", anyhow::Error::from(err));
                    false
                }
            };

        Ok(RunReport {
            number,
            test: test.outcome,
            publication,
            notified,
        })
    }
}

pub fn should_publish(outcome: &TestOutcome, on_failure: OnFailure) -> bool {
    match (outcome, on_failure) {
        (TestOutcome::Passed, _) => true,
        (failed, OnFailure::Continue) => {
            log::warn!("Tests {}, publishing the report anyway", failed);
            true
        }
        (_, OnFailure::Abort) => false,
    }
}

async fn fetch(config: &Config, checkout: &Path) -> Result<(), Error> {
    let url = config.target.clone_url();
    let token = config.secrets.github_token.to_owned();
    let branch = config.target.branch.to_owned();
    let checkout = checkout.to_owned();

    log::info!("Cloning {}", url);
    tokio::task::spawn_blocking(move || {
        git::clone(&url, &token, branch.as_deref(), &checkout).map(|_| ())
    })
    .await
    .map_err(Error::Join)?
    .map_err(Error::Fetch)
}
