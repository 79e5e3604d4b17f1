use crate::pipeline::PullRequestEvent;
use serde::Deserialize;

const TRIGGERING_ACTIONS: [&str; 2] = ["opened", "synchronize"];

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub action: Option<String>,
    pub number: Option<u64>,
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub html_url: Option<String>,
}

impl WebhookPayload {
    pub fn triggering_event(&self) -> Option<PullRequestEvent> {
        let action = self.action.as_deref()?;

        if !TRIGGERING_ACTIONS.contains(&action) {
            log::debug!("Ignoring pull request action {}", action);
            return None;
        }

        let Some(number) = self.number else {
            log::warn!("Pull request {} event without a number", action);
            return None;
        };

        Some(PullRequestEvent {
            number,
            html_url: self
                .pull_request
                .as_ref()
                .and_then(|pull_request| pull_request.html_url.to_owned()),
        })
    }
}
