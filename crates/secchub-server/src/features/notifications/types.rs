//! Email template and outbox types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reusable email template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// An email accepted for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub id: i64,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub queued_at: DateTime<Utc>,
}

/// Errors raised by notification operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("Recipient '{0}' is not a valid email address")]
    InvalidRecipient(String),

    #[error("Email template with name '{0}' already exists")]
    DuplicateTemplate(String),

    #[error("Email template not found for ID: {0}")]
    TemplateNotFound(i64),

    #[error("Outbox message not found for ID: {0}")]
    MessageNotFound(i64),
}

fn require(field: &'static str, value: &str) -> Result<(), NotificationError> {
    if value.trim().is_empty() {
        return Err(NotificationError::Required { field });
    }
    Ok(())
}

impl CreateTemplateRequest {
    pub fn validate(&self) -> Result<(), NotificationError> {
        require("name", &self.name)?;
        require("subject", &self.subject)?;
        require("body", &self.body)
    }
}

impl UpdateTemplateRequest {
    /// Present fields must not be blank
    pub fn validate(&self) -> Result<(), NotificationError> {
        for (field, value) in [("name", &self.name), ("subject", &self.subject), ("body", &self.body)] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }
}

impl SendEmailRequest {
    pub fn validate(&self) -> Result<(), NotificationError> {
        require("to", &self.to)?;
        require("subject", &self.subject)?;

        let valid = self
            .to
            .trim()
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(NotificationError::InvalidRecipient(self.to.clone()));
        }
        Ok(())
    }
}
