use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{RequestEncoding, Submission, SubmissionOutcome, SubscriberEmail};
use crate::local_recorder::LocalRecorder;
use crate::startup::AppState;

const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address.";
const UNEXPECTED_MESSAGE: &str = "Unexpected error while submitting email.";

#[derive(Serialize, Debug)]
struct ScriptResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tracing::instrument(
    name = "Handling a waitlist signup",
    skip_all,
    fields(encoding = tracing::field::Empty, outcome = tracing::field::Empty)
)]
pub async fn subscribe(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let encoding = RequestEncoding::from_content_type(content_type);
    tracing::Span::current().record("encoding", tracing::field::debug(&encoding));

    let outcome = match Submission::parse(encoding, &body) {
        Ok(submission) => state.router.route(&submission).await,
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to parse the submission",
            );
            SubmissionOutcome::Unexpected
        }
    };
    tracing::Span::current().record("outcome", outcome.signup_tag());

    if let (SubmissionOutcome::AcceptedLocally(email), Some(recorder)) = (&outcome, &state.recorder)
    {
        record_locally(recorder.clone(), email.clone()).await;
    }

    match encoding {
        RequestEncoding::Form => form_response(&outcome),
        RequestEncoding::Json => script_response(&outcome),
    }
}

/// Best effort: a failure here never changes the response.
async fn record_locally(recorder: Arc<dyn LocalRecorder>, email: SubscriberEmail) {
    match tokio::task::spawn_blocking(move || recorder.record(&email)).await {
        Ok(Ok(true)) => tracing::info!("Recorded signup locally"),
        Ok(Ok(false)) => tracing::debug!("Signup was already recorded locally"),
        Ok(Err(e)) => tracing::warn!(error.cause_chain = ?e, "Failed to record signup locally"),
        Err(e) => tracing::warn!(error.message = %e, "Local recorder task did not finish"),
    }
}

/// Plain HTML form posts go back to the landing page, which renders the tag.
pub fn form_response(outcome: &SubmissionOutcome) -> Response {
    let location = format!("/?signup={}", urlencoding::encode(outcome.signup_tag()));
    Redirect::to(&location).into_response()
}

pub fn script_response(outcome: &SubmissionOutcome) -> Response {
    let (status, error) = match outcome {
        SubmissionOutcome::Filtered
        | SubmissionOutcome::AcceptedLocally(_)
        | SubmissionOutcome::Forwarded => (StatusCode::OK, None),
        SubmissionOutcome::Invalid => (StatusCode::BAD_REQUEST, Some(INVALID_EMAIL_MESSAGE.into())),
        SubmissionOutcome::ForwardFailed(message) => (StatusCode::BAD_GATEWAY, Some(message.clone())),
        SubmissionOutcome::Unexpected => {
            (StatusCode::INTERNAL_SERVER_ERROR, Some(UNEXPECTED_MESSAGE.into()))
        }
    };
    let body = ScriptResponse {
        ok: status.is_success(),
        destination: outcome.destination(),
        error,
    };
    (status, Json(body)).into_response()
}
