mod outbound_record;
mod outcome;
mod submission;
mod subscriber_email;

pub use outbound_record::{OutboundRecord, SUBMISSION_SOURCE};
pub use outcome::SubmissionOutcome;
pub use submission::{RequestEncoding, Submission, SubmissionParseError};
pub use subscriber_email::SubscriberEmail;
