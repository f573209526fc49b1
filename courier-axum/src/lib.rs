//! # Courier Axum Integration
//!
//! Makes a [`MailerModule`]'s service injectable into Axum handlers.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Json, Router, routing::post};
//! use courier::{Delivery, Email, MailerModule, MailerModuleOptions, TransportConfig};
//! use courier_axum::{MailError, Mailer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let module = MailerModule::for_root(
//!         MailerModuleOptions::new("log").mailer("log", TransportConfig::Log { verbose: false }),
//!     )
//!     .unwrap();
//!
//!     let app = Router::new()
//!         .route("/invite", post(invite))
//!         .layer(courier_axum::layer(&module));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//!
//! async fn invite(mailer: Mailer) -> Result<Json<Delivery>, MailError> {
//!     let email = Email::builder()
//!         .from("team@example.com")
//!         .to("ann@example.com")
//!         .subject("You're invited")
//!         .text_body("Join us!")
//!         .build();
//!
//!     Ok(Json(mailer.send(email.into()).await?))
//! }
//! ```

mod error;
mod extractors;

pub use error::{MailError, Result};
pub use extractors::Mailer;

use axum::Extension;
use courier::{MailerModule, MailerService};
use std::sync::Arc;

/// Registers the module's service so handlers can extract [`Mailer`].
pub fn layer(module: &MailerModule) -> Extension<Arc<MailerService>> {
    Extension(module.service())
}
