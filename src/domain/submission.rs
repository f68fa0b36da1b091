use serde_json::Value;

/// How the request body was encoded. Decides the response shape for every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEncoding {
    Json,
    Form,
}

impl RequestEncoding {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.contains("application/json") => Self::Json,
            _ => Self::Form,
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubmissionParseError {
    #[error("Request body is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Request body is JSON but not an object")]
    NotAnObject,
    #[error("Request body is not a valid form")]
    InvalidForm(#[source] serde_urlencoded::de::Error),
}

impl std::fmt::Debug for SubmissionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

/// A single signup attempt, normalized from either body encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    email: String,
    honeypot: String,
    legacy_trap: String,
    encoding: RequestEncoding,
}

impl Submission {
    pub fn parse(encoding: RequestEncoding, body: &[u8]) -> Result<Self, SubmissionParseError> {
        match encoding {
            RequestEncoding::Json => Self::from_json(body),
            RequestEncoding::Form => Self::from_form(body),
        }
    }

    fn from_json(body: &[u8]) -> Result<Self, SubmissionParseError> {
        let value: Value =
            serde_json::from_slice(body).map_err(SubmissionParseError::InvalidJson)?;
        let object = value.as_object().ok_or(SubmissionParseError::NotAnObject)?;
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        Ok(Self {
            email: field("email").to_lowercase(),
            honeypot: field("hp"),
            legacy_trap: field("website"),
            encoding: RequestEncoding::Json,
        })
    }

    fn from_form(body: &[u8]) -> Result<Self, SubmissionParseError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(SubmissionParseError::InvalidForm)?;
        let field = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_default()
        };
        let legacy_trap = ["website", "contact-check"]
            .into_iter()
            .map(field)
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        Ok(Self {
            email: field("email").to_lowercase(),
            honeypot: field("hp"),
            legacy_trap,
            encoding: RequestEncoding::Form,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn encoding(&self) -> RequestEncoding {
        self.encoding
    }

    pub fn is_form_encoded(&self) -> bool {
        self.encoding == RequestEncoding::Form
    }

    /// Either trap field carrying a value means a bot filled in the form.
    pub fn is_spam(&self) -> bool {
        !self.honeypot.is_empty() || !self.legacy_trap.is_empty()
    }
}
