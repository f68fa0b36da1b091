//! Fallback record of signups accepted while no webhook is configured.
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use uuid::Uuid;

use crate::domain::SubscriberEmail;

pub trait LocalRecorder: Send + Sync {
    /// Stores `email` unless it is already known. Returns whether it was new.
    fn record(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error>;
}

/// Lives only as long as the process and never shrinks; for development.
#[derive(Default)]
pub struct InMemoryRecorder {
    emails: Mutex<Vec<String>>,
}

impl InMemoryRecorder {
    pub fn emails(&self) -> Vec<String> {
        self.emails
            .lock()
            .map(|emails| emails.clone())
            .unwrap_or_default()
    }
}

impl LocalRecorder for InMemoryRecorder {
    fn record(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error> {
        let mut emails = self
            .emails
            .lock()
            .map_err(|_| anyhow!("In-memory recorder lock is poisoned"))?;
        Ok(push_unique(&mut emails, email))
    }
}

/// Keeps the list as a JSON array of strings on disk.
pub struct JsonFileRecorder {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<String>, anyhow::Error> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_slice(&bytes) {
            Ok(emails) => Ok(emails),
            Err(e) => {
                let aside = self.sibling(&format!("corrupt-{}", Uuid::new_v4()));
                std::fs::rename(&self.path, &aside).with_context(|| {
                    format!("Failed to move aside unreadable {}", self.path.display())
                })?;
                tracing::warn!(
                    error.message = %e,
                    moved_to = %aside.display(),
                    "Recorded emails were unreadable, starting a new list",
                );
                Ok(Vec::new())
            }
        }
    }

    /// Writes into a sibling file first so the list is replaced in one rename.
    fn store(&self, emails: &[String]) -> Result<(), anyhow::Error> {
        let bytes = serde_json::to_vec(emails).context("Failed to serialize recorded emails")?;
        let tmp = self.sibling("tmp");
        std::fs::write(&tmp, bytes)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

impl LocalRecorder for JsonFileRecorder {
    fn record(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("File recorder lock is poisoned"))?;
        let mut emails = self.load()?;
        if !push_unique(&mut emails, email) {
            return Ok(false);
        }
        self.store(&emails)?;
        Ok(true)
    }
}

fn push_unique(emails: &mut Vec<String>, email: &SubscriberEmail) -> bool {
    if emails.iter().any(|known| known == email.as_ref()) {
        return false;
    }
    emails.push(email.to_string());
    true
}
