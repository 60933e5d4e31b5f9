use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::errors::ServiceError;

/// Outgoing mail message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<MailError> for ServiceError {
    fn from(err: MailError) -> Self {
        ServiceError::NotificationError(err.to_string())
    }
}

/// Delivers account mail such as password reset links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Writes mail to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    #[instrument(skip(self, mail), fields(to = %mail.to))]
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        if !mail.to.contains('@') {
            return Err(MailError::InvalidRecipient(mail.to));
        }
        info!(subject = %mail.subject, "Mail queued for delivery");
        Ok(())
    }
}

/// Keeps sent mail in memory; used by tests to read reset links.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<Mail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Mail> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        self.outbox.lock().await.push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_rejects_bad_recipient() {
        let mail = Mail {
            to: "nobody".to_string(),
            subject: "Reset".to_string(),
            body: String::new(),
        };
        assert!(LogMailer.send(mail).await.is_err());
    }

    #[tokio::test]
    async fn memory_mailer_records_messages() {
        let mailer = MemoryMailer::new();
        mailer
            .send(Mail {
                to: "a@b.c".to_string(),
                subject: "Hi".to_string(),
                body: "body".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
