use crate::message::build_message;
use crate::{Delivery, Email, MailerError, Transport};
use async_trait::async_trait;
use lettre::Transport as _;
use lettre::transport::sendmail::SendmailTransport as LettreTransport;

/// Pipes messages into a local `sendmail` binary.
#[derive(Debug, Clone)]
pub struct SendmailTransport {
    transport: LettreTransport,
}

impl SendmailTransport {
    pub fn new() -> Self {
        Self {
            transport: LettreTransport::new(),
        }
    }

    pub fn with_command<S: Into<String>>(command: S) -> Self {
        let cmd: String = command.into();
        Self {
            transport: LettreTransport::new_with_command(cmd),
        }
    }
}

impl Default for SendmailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SendmailTransport {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        let message = build_message(email)?;
        let delivery = Delivery::for_message(&message);

        // lettre's SendmailTransport is sync, so we use spawn_blocking
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::Task(format!("Failed to send email: {e}")))??;

        Ok(delivery)
    }
}
