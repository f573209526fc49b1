use crate::message::build_message;
use crate::{Delivery, Email, MailerError, Transport};
use async_trait::async_trait;
use lettre::transport::smtp::PoolConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(transport: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        Self { transport }
    }

    pub fn builder(hostname: &str) -> SmtpTransportBuilder {
        SmtpTransportBuilder::new(hostname)
    }

    /// Opens a connection and runs `NOOP` against the server.
    pub async fn test_connection(&self) -> Result<bool, MailerError> {
        Ok(self.transport.test_connection().await?)
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
        let message = build_message(email)?;
        let delivery = Delivery::for_message(&message);
        let response = self.transport.send(message).await?;
        Ok(delivery.with_response(response.message()))
    }
}

pub struct SmtpTransportBuilder {
    hostname: String,
    port: Option<u16>,
    credentials: Option<Credentials>,
    tls: TlsConfig,
    timeout: Option<Duration>,
    pool: Option<PoolConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsConfig {
    None,
    StartTls,
    Tls,
}

impl SmtpTransportBuilder {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            port: None,
            credentials: None,
            tls: TlsConfig::StartTls,
            timeout: None,
            pool: None,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    pub fn no_tls(mut self) -> Self {
        self.tls = TlsConfig::None;
        self
    }

    pub fn starttls(mut self) -> Self {
        self.tls = TlsConfig::StartTls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides lettre's connection pool settings.
    pub fn pool(mut self, max_size: Option<u32>, idle_timeout: Option<Duration>) -> Self {
        let mut pool = PoolConfig::new();
        if let Some(max_size) = max_size {
            pool = pool.max_size(max_size);
        }
        if let Some(idle_timeout) = idle_timeout {
            pool = pool.idle_timeout(idle_timeout);
        }
        self.pool = Some(pool);
        self
    }

    pub fn build(self) -> Result<SmtpTransport, MailerError> {
        let mut builder = match self.tls {
            TlsConfig::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.hostname)
            }
            TlsConfig::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.hostname)?
            }
            TlsConfig::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.hostname)?,
        };

        if let Some(port) = self.port {
            builder = builder.port(port);
        }

        if let Some(credentials) = self.credentials {
            builder = builder.credentials(credentials);
        }

        if self.timeout.is_some() {
            builder = builder.timeout(self.timeout);
        }

        if let Some(pool) = self.pool {
            builder = builder.pool_config(pool);
        }

        Ok(SmtpTransport::new(builder.build()))
    }
}
