//! Email operations
//!
//! One type per [`EmailService`] method, named the way the audit log labels
//! it. [`RemoveOutboxMessage`] is synchronous and runs on the immediate path.

use async_trait::async_trait;

use super::service::EmailService;
use super::types::{
    CreateTemplateRequest, EmailTemplate, NotificationError, OutboxMessage, SendEmailRequest,
    UpdateTemplateRequest,
};
use crate::audit::{ImmediateOperation, Operation};

#[derive(Debug, Clone)]
pub struct SendEmail(pub SendEmailRequest);

#[derive(Debug, Clone)]
pub struct CreateEmailTemplate(pub CreateTemplateRequest);

#[derive(Debug, Clone, Copy)]
pub struct ListEmailTemplates;

#[derive(Debug, Clone)]
pub struct UpdateEmailTemplate {
    pub id: i64,
    pub request: UpdateTemplateRequest,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEmailTemplate(pub i64);

#[derive(Debug, Clone, Copy)]
pub struct ListOutbox;

#[derive(Debug, Clone, Copy)]
pub struct RemoveOutboxMessage(pub i64);

#[async_trait]
impl Operation<EmailService> for SendEmail {
    const NAME: &'static str = "sendEmail";
    type Output = OutboxMessage;
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<OutboxMessage, NotificationError> {
        service.send_email(self.0).await
    }
}

#[async_trait]
impl Operation<EmailService> for CreateEmailTemplate {
    const NAME: &'static str = "createEmailTemplate";
    type Output = EmailTemplate;
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<EmailTemplate, NotificationError> {
        service.create_email_template(self.0).await
    }
}

#[async_trait]
impl Operation<EmailService> for ListEmailTemplates {
    const NAME: &'static str = "listEmailTemplates";
    type Output = Vec<EmailTemplate>;
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<Vec<EmailTemplate>, NotificationError> {
        service.list_email_templates().await
    }
}

#[async_trait]
impl Operation<EmailService> for UpdateEmailTemplate {
    const NAME: &'static str = "updateEmailTemplate";
    type Output = EmailTemplate;
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<EmailTemplate, NotificationError> {
        service.update_email_template(self.id, self.request).await
    }
}

#[async_trait]
impl Operation<EmailService> for DeleteEmailTemplate {
    const NAME: &'static str = "deleteEmailTemplate";
    type Output = ();
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<(), NotificationError> {
        service.delete_email_template(self.0).await
    }
}

#[async_trait]
impl Operation<EmailService> for ListOutbox {
    const NAME: &'static str = "listOutbox";
    type Output = Vec<OutboxMessage>;
    type Error = NotificationError;

    async fn execute(self, service: &EmailService) -> Result<Vec<OutboxMessage>, NotificationError> {
        service.list_outbox().await
    }
}

impl ImmediateOperation<EmailService> for RemoveOutboxMessage {
    const NAME: &'static str = "removeOutboxMessage";
    type Output = Result<OutboxMessage, NotificationError>;

    fn execute(self, service: &EmailService) -> Self::Output {
        service.remove_outbox_message(self.0)
    }
}
