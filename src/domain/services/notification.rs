use std::sync::Arc;
use chrono::{Datelike, Utc};
use tera::{Context, Tera};
use tracing::{error, info};
use crate::domain::ports::EmailService;
use crate::domain::services::defaults::{INVITE_TEMPLATE, SITE_NAME};
use crate::error::AppError;

/// Renders and sends the approval e-mail carrying the redemption link.
pub struct InviteNotifier {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    ttl_days: i64,
}

impl InviteNotifier {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>, ttl_days: i64) -> Self {
        Self { email_service, templates, ttl_days }
    }

    pub fn render(&self, display_name: &str, invite_url: &str) -> Result<(String, String), AppError> {
        let mut context = Context::new();
        context.insert("name", display_name);
        context.insert("invite_url", invite_url);
        context.insert("ttl_days", &self.ttl_days);
        context.insert("site_name", SITE_NAME);
        context.insert("year", &Utc::now().year());

        let subject = self.templates.render("invite_subject", &context)
            .map_err(|e| AppError::InternalWithMsg(format!("subject render failed: {}", e)))?;
        let body = self.templates.render(INVITE_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("invite render failed: {}", e)))?;

        Ok((subject, body))
    }

    /// One attempt, no retry. Any failure comes back as `AppError::Delivery`.
    pub async fn deliver(&self, recipient: &str, display_name: &str, invite_url: &str) -> Result<(), AppError> {
        let (subject, body) = self.render(display_name, invite_url)
            .map_err(|e| AppError::Delivery(e.to_string()))?;

        match self.email_service.send(recipient, &subject, &body).await {
            Ok(()) => {
                info!("Invite e-mail sent to {}", recipient);
                Ok(())
            }
            Err(AppError::Delivery(msg)) => Err(AppError::Delivery(msg)),
            Err(e) => {
                error!("Invite e-mail to {} failed: {}", recipient, e);
                Err(AppError::Delivery(e.to_string()))
            }
        }
    }
}
