//! Configuration for the mail service.
//!
//! [`MailerModuleOptions`] is what the service is built from. It can carry
//! runtime values (transport factories, a template engine) and therefore is
//! not serializable; [`MailerSettings`] is the serializable subset that can be
//! loaded from a file or the environment and converted into options.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use courier_mailer::{
    MailDefaults, MailerError, TemplateEngine, TlsType, Transport, TransportConfig,
};
use serde::{Deserialize, Serialize};

type TransportFactory = dyn Fn() -> Result<Box<dyn Transport>, MailerError> + Send + Sync;

/// How a named transport is obtained.
#[derive(Clone)]
pub enum TransportSpec {
    /// Called once when the service is built; its return value is the transport.
    Factory(Arc<TransportFactory>),
    /// Built from connection settings, with the configured defaults applied.
    Settings(TransportConfig),
}

impl TransportSpec {
    pub fn factory<F, T>(factory: F) -> Self
    where
        F: Fn() -> Result<T, MailerError> + Send + Sync + 'static,
        T: Transport + 'static,
    {
        Self::Factory(Arc::new(move || {
            factory().map(|transport| Box::new(transport) as Box<dyn Transport>)
        }))
    }
}

impl From<TransportConfig> for TransportSpec {
    fn from(config: TransportConfig) -> Self {
        Self::Settings(config)
    }
}

impl fmt::Debug for TransportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportSpec::Factory(_) => f.write_str("Factory(..)"),
            TransportSpec::Settings(config) => f.debug_tuple("Settings").field(config).finish(),
        }
    }
}

/// Template rendering configuration.
#[derive(Clone)]
pub struct MailTemplateOptions {
    pub engine: Arc<dyn TemplateEngine>,
}

impl MailTemplateOptions {
    pub fn new<E: TemplateEngine + 'static>(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

impl fmt::Debug for MailTemplateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailTemplateOptions").finish_non_exhaustive()
    }
}

/// Everything the mail service is constructed from.
#[derive(Debug, Clone)]
pub struct MailerModuleOptions {
    /// Transport used when a send does not name one.
    pub default_mailer: String,
    /// Fields applied to every message that leaves them unset.
    pub defaults: MailDefaults,
    /// Optional template engine. Without it `template` on a send is ignored.
    pub template: Option<MailTemplateOptions>,
    /// Named transports.
    pub mailers: BTreeMap<String, TransportSpec>,
}

impl MailerModuleOptions {
    pub fn new<S: Into<String>>(default_mailer: S) -> Self {
        Self {
            default_mailer: default_mailer.into(),
            defaults: MailDefaults::default(),
            template: None,
            mailers: BTreeMap::new(),
        }
    }

    pub fn defaults(mut self, defaults: MailDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn mailer<S, T>(mut self, name: S, transport: T) -> Self
    where
        S: Into<String>,
        T: Into<TransportSpec>,
    {
        self.mailers.insert(name.into(), transport.into());
        self
    }

    pub fn mailer_factory<S, F, T>(self, name: S, factory: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Result<T, MailerError> + Send + Sync + 'static,
        T: Transport + 'static,
    {
        self.mailer(name, TransportSpec::factory(factory))
    }

    pub fn template_engine<E: TemplateEngine + 'static>(mut self, engine: E) -> Self {
        self.template = Some(MailTemplateOptions::new(engine));
        self
    }
}

/// The serializable part of [`MailerModuleOptions`].
///
/// ```json
/// {
///   "default_mailer": "smtp",
///   "defaults": { "from": "App <noreply@example.com>" },
///   "mailers": {
///     "smtp": { "type": "smtp", "host": "smtp.example.com", "port": 587 },
///     "outbox": { "type": "file", "output_dir": "./emails" }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailerSettings {
    pub default_mailer: String,
    #[serde(default)]
    pub defaults: MailDefaults,
    pub mailers: BTreeMap<String, TransportConfig>,
}

impl MailerSettings {
    /// Reads `MAILER_*` environment variables.
    ///
    /// Each of `MAILER_SMTP_HOST`, `MAILER_FILE_OUTPUT_DIR` and `MAILER_SENDMAIL`
    /// that is set registers a transport named `smtp`, `file` or `sendmail`.
    /// When none is set a file transport writing to `./emails` is used.
    /// `MAILER_DEFAULT` picks the default transport, otherwise the first
    /// registered one in that order.
    pub fn from_env() -> Result<Self, MailerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, MailerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut mailers = BTreeMap::new();

        if let Some(host) = lookup("MAILER_SMTP_HOST") {
            let port = match lookup("MAILER_SMTP_PORT") {
                Some(port) => Some(port.parse().map_err(|_| {
                    MailerError::Config(format!("MAILER_SMTP_PORT is not a port: {port}"))
                })?),
                None => None,
            };
            let tls = match lookup("MAILER_SMTP_TLS") {
                Some(tls) => Some(TlsType::parse(&tls).ok_or_else(|| {
                    MailerError::Config(format!("MAILER_SMTP_TLS is not a TLS mode: {tls}"))
                })?),
                None => None,
            };
            let timeout_secs = match lookup("MAILER_SMTP_TIMEOUT") {
                Some(timeout) => Some(timeout.parse().map_err(|_| {
                    MailerError::Config(format!(
                        "MAILER_SMTP_TIMEOUT is not a number of seconds: {timeout}"
                    ))
                })?),
                None => None,
            };

            mailers.insert(
                "smtp".to_string(),
                TransportConfig::Smtp {
                    host,
                    port,
                    username: lookup("MAILER_SMTP_USERNAME"),
                    password: lookup("MAILER_SMTP_PASSWORD"),
                    tls,
                    timeout_secs,
                    pool: None,
                },
            );
        }

        if let Some(output_dir) = lookup("MAILER_FILE_OUTPUT_DIR") {
            mailers.insert(
                "file".to_string(),
                TransportConfig::File {
                    output_dir: PathBuf::from(output_dir),
                },
            );
        }

        if lookup("MAILER_SENDMAIL").is_some() {
            mailers.insert(
                "sendmail".to_string(),
                TransportConfig::Sendmail {
                    command: lookup("MAILER_SENDMAIL_COMMAND"),
                },
            );
        }

        if mailers.is_empty() {
            // Default to file transport for development
            mailers.insert(
                "file".to_string(),
                TransportConfig::File {
                    output_dir: PathBuf::from("./emails"),
                },
            );
        }

        let default_mailer = lookup("MAILER_DEFAULT")
            .or_else(|| {
                ["smtp", "file", "sendmail"]
                    .into_iter()
                    .find(|name| mailers.contains_key(*name))
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let from = lookup("MAILER_FROM_ADDRESS").map(|address| {
            match lookup("MAILER_FROM_NAME") {
                Some(name) => format!("{name} <{address}>"),
                None => address,
            }
        });

        Ok(Self {
            default_mailer,
            defaults: MailDefaults {
                from,
                reply_to: lookup("MAILER_REPLY_TO"),
                ..MailDefaults::default()
            },
            mailers,
        })
    }
}

impl From<MailerSettings> for MailerModuleOptions {
    fn from(settings: MailerSettings) -> Self {
        Self {
            default_mailer: settings.default_mailer,
            defaults: settings.defaults,
            template: None,
            mailers: settings
                .mailers
                .into_iter()
                .map(|(name, config)| (name, TransportSpec::Settings(config)))
                .collect(),
        }
    }
}
