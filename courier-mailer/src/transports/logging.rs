//! Log transport for development
//!
//! Emits messages through `tracing` instead of delivering them.

use crate::message::build_message;
use crate::{Delivery, Email, MailerError, Transport};
use async_trait::async_trait;
use tracing::{debug, info};

/// Logs emails instead of sending them.
///
/// The message is still assembled with lettre, so address and body errors
/// surface exactly as they would on a real transport.
#[derive(Debug, Clone, Default)]
pub struct LogTransport {
    verbose: bool,
}

impl LogTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also logs the fully formatted message at debug level.
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        let from = email.from.clone().unwrap_or_default();
        let subject = email.subject.clone();
        let attachments = email.attachments.len();

        let message = build_message(email)?;
        let delivery = Delivery::for_message(&message);

        info!(
            from = %from,
            to = ?delivery.accepted,
            subject = %subject,
            attachments,
            message_id = ?delivery.message_id,
            "Email logged"
        );

        if self.verbose {
            debug!(
                body = %String::from_utf8_lossy(&message.formatted()),
                "Email content"
            );
        }

        Ok(delivery)
    }
}
