use crate::MailerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An outgoing message, independent of the transport that delivers it.
///
/// `from` is optional here: the mail service and settings-built transports fill
/// it in from the configured defaults before the message reaches lettre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub headers: HashMap<String, String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new<F, C>(filename: F, content_type: C, content: Vec<u8>) -> Self
    where
        F: Into<String>,
        C: Into<String>,
    {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }

    /// Checks that the message can be handed to a transport.
    pub fn validate(&self) -> Result<(), MailerError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(MailerError::Builder(
                "At least one recipient is required".to_string(),
            ));
        }

        if self.from.as_deref().is_none_or(str::is_empty) {
            return Err(MailerError::Builder("From address is required".to_string()));
        }

        if self.html_body.is_none() && self.text_body.is_none() {
            return Err(MailerError::Builder(
                "Either HTML or text body is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EmailBuilder {
    email: Email,
}

impl EmailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to<S: Into<String>>(mut self, email: S) -> Self {
        self.email.to.push(email.into());
        self
    }

    pub fn to_multiple<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.email.to.extend(emails.into_iter().map(Into::into));
        self
    }

    pub fn cc<S: Into<String>>(mut self, email: S) -> Self {
        self.email.cc.push(email.into());
        self
    }

    pub fn bcc<S: Into<String>>(mut self, email: S) -> Self {
        self.email.bcc.push(email.into());
        self
    }

    pub fn from<S: Into<String>>(mut self, email: S) -> Self {
        self.email.from = Some(email.into());
        self
    }

    pub fn reply_to<S: Into<String>>(mut self, email: S) -> Self {
        self.email.reply_to = Some(email.into());
        self
    }

    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.email.subject = subject.into();
        self
    }

    pub fn html_body<S: Into<String>>(mut self, html: S) -> Self {
        self.email.html_body = Some(html.into());
        self
    }

    pub fn text_body<S: Into<String>>(mut self, text: S) -> Self {
        self.email.text_body = Some(text.into());
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.email.headers.insert(key.into(), value.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.email.attachments.push(attachment);
        self
    }

    /// Finishes the message without validating it.
    ///
    /// The body may still be produced by a template at send time, so checks are
    /// deferred to [`Email::validate`], which every transport runs.
    pub fn build(self) -> Email {
        self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test Subject")
            .text_body("Test content")
            .build();

        assert_eq!(email.from.as_deref(), Some("sender@example.com"));
        assert_eq!(email.to, vec!["recipient@example.com"]);
        assert_eq!(email.subject, "Test Subject");
        assert_eq!(email.text_body, Some("Test content".to_string()));
        assert!(email.validate().is_ok());
    }

    #[test]
    fn test_email_validation() {
        let missing_recipient = Email::builder()
            .from("sender@example.com")
            .subject("Test")
            .text_body("hello")
            .build();
        assert!(missing_recipient.validate().is_err());

        let missing_from = Email::builder()
            .to("recipient@example.com")
            .text_body("hello")
            .build();
        assert!(missing_from.validate().is_err());

        let missing_body = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .build();
        assert!(missing_body.validate().is_err());
    }

    #[test]
    fn test_email_deserializes_with_missing_fields() {
        let email: Email = serde_json::from_value(serde_json::json!({
            "to": ["a@b.com"],
            "subject": "hi",
            "text_body": "hello"
        }))
        .unwrap();

        assert_eq!(email.to, vec!["a@b.com"]);
        assert!(email.from.is_none());
        assert!(email.attachments.is_empty());
    }
}
