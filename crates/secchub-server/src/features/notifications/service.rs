//! Email service
//!
//! Templates live behind an async lock. Sent email is queued in an in-process
//! outbox instead of being handed to a mail server; removing an outbox message
//! is synchronous and goes through the immediate audit path. The methods are
//! reached through [`super::operations`].

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex, MutexGuard, PoisonError,
};
use tokio::sync::RwLock;

use super::types::{
    CreateTemplateRequest, EmailTemplate, NotificationError, OutboxMessage, SendEmailRequest,
    UpdateTemplateRequest,
};
use crate::audit::ServiceLayer;

#[derive(Debug, Default)]
pub struct EmailService {
    templates: RwLock<BTreeMap<i64, EmailTemplate>>,
    outbox: Mutex<Vec<OutboxMessage>>,
    next_template_id: AtomicI64,
    next_message_id: AtomicI64,
}

impl ServiceLayer for EmailService {
    const NAME: &'static str = "EmailService";
}

impl EmailService {
    pub fn new() -> Self {
        Self::default()
    }

    fn outbox(&self) -> MutexGuard<'_, Vec<OutboxMessage>> {
        // Every critical section is a single push, remove or clone
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an email for delivery
    #[tracing::instrument(skip(self, request), fields(to = %request.to))]
    pub(super) async fn send_email(&self, request: SendEmailRequest) -> Result<OutboxMessage, NotificationError> {
        request.validate()?;

        let message = OutboxMessage {
            id: self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1,
            to: request.to.trim().to_string(),
            subject: request.subject,
            body: request.body,
            queued_at: Utc::now(),
        };
        self.outbox().push(message.clone());

        tracing::info!(message_id = message.id, "Email queued");
        Ok(message)
    }

    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub(super) async fn create_email_template(
        &self,
        request: CreateTemplateRequest,
    ) -> Result<EmailTemplate, NotificationError> {
        request.validate()?;

        let mut templates = self.templates.write().await;
        if templates.values().any(|t| t.name == request.name) {
            return Err(NotificationError::DuplicateTemplate(request.name));
        }

        let template = EmailTemplate {
            id: self.next_template_id.fetch_add(1, Ordering::Relaxed) + 1,
            name: request.name,
            subject: request.subject,
            body: request.body,
        };
        templates.insert(template.id, template.clone());

        tracing::info!(template_id = template.id, "Email template created");
        Ok(template)
    }

    pub(super) async fn list_email_templates(&self) -> Result<Vec<EmailTemplate>, NotificationError> {
        Ok(self.templates.read().await.values().cloned().collect())
    }

    #[tracing::instrument(skip(self, request))]
    pub(super) async fn update_email_template(
        &self,
        id: i64,
        request: UpdateTemplateRequest,
    ) -> Result<EmailTemplate, NotificationError> {
        request.validate()?;

        let mut templates = self.templates.write().await;
        if let Some(name) = &request.name {
            if templates.values().any(|t| t.id != id && t.name == *name) {
                return Err(NotificationError::DuplicateTemplate(name.clone()));
            }
        }

        let template = templates.get_mut(&id).ok_or(NotificationError::TemplateNotFound(id))?;
        if let Some(name) = request.name {
            template.name = name;
        }
        if let Some(subject) = request.subject {
            template.subject = subject;
        }
        if let Some(body) = request.body {
            template.body = body;
        }

        tracing::info!(template_id = id, "Email template updated");
        Ok(template.clone())
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn delete_email_template(&self, id: i64) -> Result<(), NotificationError> {
        if self.templates.write().await.remove(&id).is_none() {
            return Err(NotificationError::TemplateNotFound(id));
        }

        tracing::info!(template_id = id, "Email template deleted");
        Ok(())
    }

    /// Queued messages, oldest first
    pub(super) async fn list_outbox(&self) -> Result<Vec<OutboxMessage>, NotificationError> {
        Ok(self.outbox().clone())
    }

    /// Drop a queued message
    pub(super) fn remove_outbox_message(&self, id: i64) -> Result<OutboxMessage, NotificationError> {
        let mut outbox = self.outbox();
        let position = outbox
            .iter()
            .position(|m| m.id == id)
            .ok_or(NotificationError::MessageNotFound(id))?;

        tracing::info!(message_id = id, "Outbox message removed");
        Ok(outbox.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
        }
    }

    fn email(to: &str) -> SendEmailRequest {
        SendEmailRequest {
            to: to.to_string(),
            subject: "Planning".to_string(),
            body: "Please confirm your availability".to_string(),
        }
    }

    #[tokio::test]
    async fn test_template_lifecycle() {
        let service = EmailService::new();

        let created = service.create_email_template(template("welcome")).await.unwrap();
        assert_eq!(created.id, 1);

        let updated = service
            .update_email_template(
                1,
                UpdateTemplateRequest {
                    subject: Some("Welcome aboard".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.subject, "Welcome aboard");
        assert_eq!(updated.name, "welcome");

        service.delete_email_template(1).await.unwrap();
        assert!(service.list_email_templates().await.unwrap().is_empty());
        assert_eq!(
            service.delete_email_template(1).await,
            Err(NotificationError::TemplateNotFound(1))
        );
    }

    #[tokio::test]
    async fn test_template_names_are_unique() {
        let service = EmailService::new();
        service.create_email_template(template("welcome")).await.unwrap();
        service.create_email_template(template("reminder")).await.unwrap();

        assert_eq!(
            service.create_email_template(template("welcome")).await,
            Err(NotificationError::DuplicateTemplate("welcome".into()))
        );

        let rename = UpdateTemplateRequest {
            name: Some("welcome".into()),
            ..Default::default()
        };
        assert!(service.update_email_template(2, rename).await.is_err());
    }

    #[tokio::test]
    async fn test_send_queues_and_remove_dequeues() {
        let service = EmailService::new();

        let first = service.send_email(email("a@uni.edu")).await.unwrap();
        service.send_email(email("b@uni.edu")).await.unwrap();
        assert_eq!(service.list_outbox().await.unwrap().len(), 2);

        let removed = service.remove_outbox_message(first.id).unwrap();
        assert_eq!(removed.to, "a@uni.edu");
        assert_eq!(
            service.remove_outbox_message(first.id),
            Err(NotificationError::MessageNotFound(first.id))
        );

        let outbox = service.list_outbox().await.unwrap();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].to, "b@uni.edu");
    }
}
