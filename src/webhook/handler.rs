use super::{event::WebhookPayload, AppState};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

const EVENT_HEADER: &str = "X-GitHub-Event";
const PULL_REQUEST_EVENT: &str = "pull_request";

pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if let Some(kind) = headers.get(EVENT_HEADER).and_then(|kind| kind.to_str().ok()) {
        if kind != PULL_REQUEST_EVENT {
            log::info!("Ignoring {} event", kind);
            return received();
        }
    }

    let payload = match serde_json::from_value::<WebhookPayload>(body) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("Ignoring malformed pull request payload: {}", err);
            return received();
        }
    };

    let Some(event) = payload.triggering_event() else {
        return received();
    };

    let number = event.number;
    let pipeline = Arc::clone(&state.pipeline);

    // owned by the runtime, so a client hanging up does not cancel the run
    let run = tokio::spawn(async move { pipeline.run(&event).await });

    match run.await {
        Ok(Ok(report)) => log::info!(
            "PR #{}: tests {}, report {}, comment {}",
            report.number,
            report.test,
            if report.publication.is_some() { "published" } else { "not published" },
            if report.notified { "posted" } else { "not posted" },
        ),
        Ok(Err(err)) => log::error!("PR #{}: {:#}", number, anyhow::Error::from(err)),
        Err(err) => log::error!("PR #{}: run did not complete: {}", number, err),
    }

    received()
}

pub async fn health() -> &'static str {
    "ok"
}

fn received() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "message": "Received" })))
}
