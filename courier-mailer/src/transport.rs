use crate::{Email, MailerError};
use async_trait::async_trait;
use lettre::Message;
use serde::{Deserialize, Serialize};

/// Something that can deliver an [`Email`].
///
/// Implemented by the lettre-backed transports in [`crate::transports`]; user
/// code can implement it to plug in any other delivery mechanism.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError>;
}

/// What a transport reports back after accepting a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub message_id: Option<String>,
    pub accepted: Vec<String>,
    pub response: Vec<String>,
}

impl Delivery {
    pub(crate) fn for_message(message: &Message) -> Self {
        Self {
            message_id: message.headers().get_raw("Message-ID").map(str::to_string),
            accepted: message
                .envelope()
                .to()
                .iter()
                .map(ToString::to_string)
                .collect(),
            response: Vec::new(),
        }
    }

    pub(crate) fn with_response<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.response = lines.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        (**self).send_mail(email).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        (**self).send_mail(email).await
    }
}
