use crate::{Email, MailerError};
use lettre::Message;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment as LettreAttachment, Mailbox, MultiPart, SinglePart};

enum Body {
    Single(SinglePart),
    Multi(MultiPart),
}

/// Converts an [`Email`] into a lettre [`Message`].
///
/// HTML and text bodies become a `multipart/alternative` part; attachments wrap
/// the body in `multipart/mixed`.
pub(crate) fn build_message(email: Email) -> Result<Message, MailerError> {
    email.validate()?;

    let from: Mailbox = email.from.unwrap_or_default().parse()?;
    let mut message_builder = Message::builder().from(from).subject(email.subject);

    for to in email.to {
        message_builder = message_builder.to(to.parse()?);
    }

    for cc in email.cc {
        message_builder = message_builder.cc(cc.parse()?);
    }

    for bcc in email.bcc {
        message_builder = message_builder.bcc(bcc.parse()?);
    }

    if let Some(reply_to) = email.reply_to {
        message_builder = message_builder.reply_to(reply_to.parse()?);
    }

    for (name, value) in email.headers {
        let header_name = HeaderName::new_from_ascii(name.clone())
            .map_err(|_| MailerError::Builder(format!("Invalid header name: {name}")))?;
        message_builder = message_builder.raw_header(HeaderValue::new(header_name, value));
    }

    let body = match (email.html_body, email.text_body) {
        (Some(html), Some(text)) => Body::Multi(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text))
                .singlepart(SinglePart::html(html)),
        ),
        (Some(html), None) => Body::Single(SinglePart::html(html)),
        (None, Some(text)) => Body::Single(SinglePart::plain(text)),
        (None, None) => {
            return Err(MailerError::Builder("No email body provided".to_string()));
        }
    };

    if email.attachments.is_empty() {
        let message = match body {
            Body::Single(part) => message_builder.singlepart(part)?,
            Body::Multi(part) => message_builder.multipart(part)?,
        };
        return Ok(message);
    }

    let mut mixed = match body {
        Body::Single(part) => MultiPart::mixed().singlepart(part),
        Body::Multi(part) => MultiPart::mixed().multipart(part),
    };

    for attachment in email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            MailerError::Builder(format!(
                "Invalid content type for {}: {e}",
                attachment.filename
            ))
        })?;
        mixed = mixed.singlepart(
            LettreAttachment::new(attachment.filename).body(attachment.content, content_type),
        );
    }

    Ok(message_builder.multipart(mixed)?)
}
