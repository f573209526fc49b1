//! # Courier
//!
//! Courier lets an application configure any number of named mail transports
//! once at startup and send (optionally templated) email through a single
//! [`MailerService::send`] call.
//!
//! Delivery itself is handled by [lettre](https://docs.rs/lettre) through the
//! transports in [`courier_mailer`]; rendering is delegated to whatever
//! [`TemplateEngine`] the application supplies.
//!
//! ## Example
//!
//! ```rust,no_run
//! use courier::{Email, MailDefaults, MailerModule, MailerModuleOptions, SendMailOptions};
//! use courier::TransportConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let module = MailerModule::for_root(
//!         MailerModuleOptions::new("smtp")
//!             .defaults(MailDefaults::from_address("App <noreply@example.com>"))
//!             .mailer(
//!                 "smtp",
//!                 TransportConfig::Smtp {
//!                     host: "smtp.example.com".to_string(),
//!                     port: Some(587),
//!                     username: Some("user".to_string()),
//!                     password: Some("secret".to_string()),
//!                     tls: None,
//!                     timeout_secs: Some(10),
//!                     pool: None,
//!                 },
//!             )
//!             .mailer("outbox", TransportConfig::File { output_dir: "./emails".into() }),
//!     )?;
//!
//!     let email = Email::builder()
//!         .to("ann@example.com")
//!         .subject("hi")
//!         .text_body("hello")
//!         .build();
//!
//!     // Default transport
//!     module.service().send(email.clone().into()).await?;
//!
//!     // Named transport
//!     module
//!         .service()
//!         .send(SendMailOptions::new(email).mailer("outbox"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod module;
pub mod options;
pub mod service;

pub use module::{MailerModule, MailerModuleAsyncOptions, MailerOptionsFactory};
pub use options::{MailTemplateOptions, MailerModuleOptions, MailerSettings, TransportSpec};
pub use service::{MailerService, SendMailOptions};

/// Re-export the message model, transports and template adapters
pub use courier_mailer::{
    AskamaTemplateEngine, Attachment, Delivery, Email, EmailBuilder, MailDefaults, MailerError,
    TemplateData, TemplateEngine, TlsType, Transport, TransportConfig,
};
