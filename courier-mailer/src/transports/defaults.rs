use crate::{Delivery, Email, MailerError, Transport};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fields applied to a message when it does not set them itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailDefaults {
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub headers: HashMap<String, String>,
}

impl MailDefaults {
    pub fn from_address<S: Into<String>>(from: S) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::default()
        }
    }

    /// Fills in anything `email` leaves unset. Explicit values always win.
    pub fn apply(&self, email: &mut Email) {
        if email.from.is_none() {
            email.from.clone_from(&self.from);
        }

        if email.reply_to.is_none() {
            email.reply_to.clone_from(&self.reply_to);
        }

        for (name, value) in &self.headers {
            email
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Wraps a transport so every message it sends picks up [`MailDefaults`].
pub struct WithDefaults<T> {
    inner: T,
    defaults: MailDefaults,
}

impl<T: Transport> WithDefaults<T> {
    pub fn new(inner: T, defaults: MailDefaults) -> Self {
        Self { inner, defaults }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for WithDefaults<T> {
    async fn send_mail(&self, mut email: Email) -> Result<Delivery, MailerError> {
        self.defaults.apply(&mut email);
        self.inner.send_mail(email).await
    }
}
