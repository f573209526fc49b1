use crate::{MailerError, templates::TemplateData};
use async_trait::async_trait;
use std::sync::Arc;

/// Turns a named template plus data into HTML.
///
/// The mail service holds at most one engine and calls it only when a send
/// names a template.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn render(&self, template: &str, data: &TemplateData) -> Result<String, MailerError>;
}

#[async_trait]
impl<T: TemplateEngine + ?Sized> TemplateEngine for Arc<T> {
    async fn render(&self, template: &str, data: &TemplateData) -> Result<String, MailerError> {
        (**self).render(template, data).await
    }
}
