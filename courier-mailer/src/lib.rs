pub mod config;
pub mod email;
pub mod error;
mod message;
pub mod templates;
pub mod transport;
pub mod transports;

pub use config::{PoolSettings, TlsType, TransportConfig};
pub use email::{Attachment, Email, EmailBuilder};
pub use error::{MailerError, Result};
pub use templates::{AskamaTemplateEngine, TemplateData, TemplateEngine};
pub use transport::{Delivery, Transport};
pub use transports::{
    FileTransport, LogTransport, MailDefaults, SendmailTransport, SmtpTransport, WithDefaults,
};

