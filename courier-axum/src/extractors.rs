use std::ops::Deref;
use std::sync::Arc;

use axum::{
    Extension, RequestPartsExt,
    extract::FromRequestParts,
    http::request::Parts,
};
use courier::MailerService;

use crate::error::MailError;

/// The application's [`MailerService`], registered with [`crate::layer`].
pub struct Mailer(pub Arc<MailerService>);

impl Deref for Mailer {
    type Target = MailerService;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Mailer
where
    S: Send + Sync,
{
    type Rejection = MailError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Extension(service): Extension<Arc<MailerService>> =
            parts.extract().await.map_err(|_| MailError::NotConfigured)?;

        Ok(Mailer(service))
    }
}
