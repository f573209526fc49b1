mod defaults;
mod file;
mod logging;
mod sendmail;
pub mod smtp;

pub use defaults::{MailDefaults, WithDefaults};
pub use file::FileTransport;
pub use logging::LogTransport;
pub use sendmail::SendmailTransport;
pub use smtp::{SmtpTransport, SmtpTransportBuilder, TlsConfig};
