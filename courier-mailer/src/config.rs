use crate::transports::TlsConfig;
use crate::{
    FileTransport, LogTransport, MailDefaults, MailerError, SendmailTransport, SmtpTransport,
    Transport, WithDefaults,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Connection settings for one named transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Smtp {
        host: String,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
        tls: Option<TlsType>,
        timeout_secs: Option<u64>,
        pool: Option<PoolSettings>,
    },
    File {
        output_dir: PathBuf,
    },
    Sendmail {
        command: Option<String>,
    },
    Log {
        #[serde(default)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsType {
    None,
    #[serde(rename = "starttls", alias = "start_tls")]
    StartTls,
    Tls,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    pub max_size: Option<u32>,
    pub idle_timeout_secs: Option<u64>,
}

impl From<TlsType> for TlsConfig {
    fn from(tls_type: TlsType) -> Self {
        match tls_type {
            TlsType::None => TlsConfig::None,
            TlsType::StartTls => TlsConfig::StartTls,
            TlsType::Tls => TlsConfig::Tls,
        }
    }
}

impl TlsType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "none" => Some(TlsType::None),
            "starttls" => Some(TlsType::StartTls),
            "tls" => Some(TlsType::Tls),
            _ => None,
        }
    }
}

impl TransportConfig {
    /// Constructs the transport described by these settings.
    ///
    /// `defaults` become the default envelope values of the returned transport.
    pub fn build_transport(&self, defaults: &MailDefaults) -> Result<Box<dyn Transport>, MailerError> {
        let defaults = defaults.clone();

        match self {
            TransportConfig::Smtp {
                host,
                port,
                username,
                password,
                tls,
                timeout_secs,
                pool,
            } => {
                let mut builder = SmtpTransport::builder(host);

                if let Some(port) = port {
                    builder = builder.port(*port);
                }

                if let (Some(username), Some(password)) = (username, password) {
                    builder = builder.credentials(username, password);
                }

                if let Some(tls) = tls {
                    builder = builder.tls(tls.clone().into());
                }

                if let Some(secs) = timeout_secs {
                    builder = builder.timeout(Duration::from_secs(*secs));
                }

                if let Some(pool) = pool {
                    builder = builder.pool(
                        pool.max_size,
                        pool.idle_timeout_secs.map(Duration::from_secs),
                    );
                }

                Ok(Box::new(WithDefaults::new(builder.build()?, defaults)))
            }
            TransportConfig::File { output_dir } => Ok(Box::new(WithDefaults::new(
                FileTransport::new(output_dir)?,
                defaults,
            ))),
            TransportConfig::Sendmail { command } => {
                let transport = if let Some(command) = command {
                    SendmailTransport::with_command(command)
                } else {
                    SendmailTransport::new()
                };
                Ok(Box::new(WithDefaults::new(transport, defaults)))
            }
            TransportConfig::Log { verbose } => {
                let transport = if *verbose {
                    LogTransport::verbose()
                } else {
                    LogTransport::new()
                };
                Ok(Box::new(WithDefaults::new(transport, defaults)))
            }
        }
    }

    /// Short name of the transport kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportConfig::Smtp { .. } => "smtp",
            TransportConfig::File { .. } => "file",
            TransportConfig::Sendmail { .. } => "sendmail",
            TransportConfig::Log { .. } => "log",
        }
    }
}
