use super::SubscriberEmail;

/// The terminal result of handling one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// A trap field was filled in; nothing was forwarded.
    Filtered,
    Invalid,
    /// No webhook is configured, the address is only acknowledged.
    AcceptedLocally(SubscriberEmail),
    Forwarded,
    ForwardFailed(String),
    Unexpected,
}

impl SubmissionOutcome {
    /// Value of the `signup` query parameter the landing page is redirected with.
    pub fn signup_tag(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Invalid => "invalid",
            Self::AcceptedLocally(_) => "success-static",
            Self::Forwarded => "success",
            Self::ForwardFailed(_) | Self::Unexpected => "error",
        }
    }

    /// Where the address ended up, as reported to script-driven callers.
    pub fn destination(&self) -> Option<&'static str> {
        match self {
            Self::Filtered => Some("filtered"),
            Self::AcceptedLocally(_) => Some("static"),
            Self::Forwarded => Some("google_sheets"),
            _ => None,
        }
    }
}
