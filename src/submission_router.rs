use chrono::Utc;

use crate::domain::{OutboundRecord, Submission, SubmissionOutcome, SubscriberEmail};
use crate::webhook_client::{ForwardError, WebhookClient};

/// Decides what happens to a parsed submission.
///
/// The webhook is injected at construction; `None` means forwarding is not
/// configured and valid signups are acknowledged without being forwarded.
#[derive(Clone)]
pub struct SubmissionRouter {
    webhook: Option<WebhookClient>,
}

impl SubmissionRouter {
    pub fn new(webhook: Option<WebhookClient>) -> Self {
        Self { webhook }
    }

    #[tracing::instrument(
        name = "Routing a waitlist submission",
        skip(self, submission),
        fields(
            subscriber_email = %submission.email(),
            form_encoded = submission.is_form_encoded(),
        )
    )]
    pub async fn route(&self, submission: &Submission) -> SubmissionOutcome {
        if submission.is_spam() {
            tracing::info!("Honeypot field filled in, dropping submission");
            return SubmissionOutcome::Filtered;
        }
        let email = match SubscriberEmail::parse(submission.email().to_string()) {
            Ok(email) => email,
            Err(e) => {
                tracing::info!("{}", e);
                return SubmissionOutcome::Invalid;
            }
        };
        let Some(webhook) = &self.webhook else {
            return SubmissionOutcome::AcceptedLocally(email);
        };
        let record = OutboundRecord::new(email, Utc::now());
        match webhook.forward(&record).await {
            Ok(()) => SubmissionOutcome::Forwarded,
            Err(ForwardError::Rejected(message)) => {
                tracing::warn!(error.message = %message, "Webhook refused the signup");
                SubmissionOutcome::ForwardFailed(message)
            }
            Err(e @ ForwardError::UnexpectedError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to forward the signup",
                );
                SubmissionOutcome::Unexpected
            }
        }
    }
}
