use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::SubscriberEmail;

/// Tag identifying this site in the spreadsheet rows.
pub const SUBMISSION_SOURCE: &str = "figleaffits";

/// The body posted to the webhook for an accepted signup.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRecord {
    email: SubscriberEmail,
    source: &'static str,
    #[serde(serialize_with = "iso_8601_millis")]
    submitted_at: DateTime<Utc>,
}

impl OutboundRecord {
    pub fn new(email: SubscriberEmail, submitted_at: DateTime<Utc>) -> Self {
        Self {
            email,
            source: SUBMISSION_SOURCE,
            submitted_at,
        }
    }
}

fn iso_8601_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
