use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::contact::{ContactRequest, ContactResponse, MISSING_REQUIRED_FIELDS},
    errors::AppError,
    mail::smtp::{Mailer, OutboundMail},
    utils::markdown::escape_html,
};

/// Relays the contact form to the site owner's inbox. No queue, no retry.
pub struct ContactHandler {
    mailer: Option<Arc<dyn Mailer>>,
    recipient: Option<String>,
}

impl ContactHandler {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, recipient: Option<String>) -> Self {
        ContactHandler { mailer, recipient }
    }

    pub async fn send_message(&self, request: ContactRequest) -> Result<ContactResponse, AppError> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|_| AppError::InvalidRequest(MISSING_REQUIRED_FIELDS.into()))?;

        let (Some(mailer), Some(recipient)) = (&self.mailer, &self.recipient) else {
            tracing::error!("Contact form used without mail credentials");
            return Err(AppError::ServerMisconfiguration("Server misconfiguration".into()));
        };

        let mail = compose(&request, recipient);
        mailer.send(&mail).await.map_err(|e| {
            tracing::error!(error = %e, "Contact mail delivery failed");
            AppError::UpstreamFailure("Failed to send email".into())
        })?;

        tracing::info!("Contact message relayed");
        Ok(ContactResponse::sent())
    }
}

fn compose(request: &ContactRequest, recipient: &str) -> OutboundMail {
    let subject = request.subject.as_deref().unwrap_or("No Subject");

    let text_body = format!(
        "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}",
        request.name, request.email, subject, request.message
    );

    let html_body = format!(
        "<h3>New Contact Form Submission</h3>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p style=\"white-space: pre-wrap\">{}</p>",
        escape_html(&request.name),
        escape_html(&request.email),
        escape_html(subject),
        escape_html(&request.message),
    );

    OutboundMail {
        to: recipient.to_string(),
        reply_to: request.email.clone(),
        subject: request.subject_line(),
        text_body,
        html_body,
    }
}
