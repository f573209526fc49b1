//! Wiring the mail service into an application.
//!
//! A [`MailerModule`] resolves [`MailerModuleOptions`] exactly once, builds the
//! [`MailerService`] from them and hands out the shared instance. Options can
//! be supplied directly with [`MailerModule::for_root`] or resolved
//! asynchronously with [`MailerModule::for_root_async`].
//!
//! # Example
//!
//! ```rust,no_run
//! use courier::{MailerError, MailerModule, MailerModuleAsyncOptions, MailerModuleOptions, MailerSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let module = MailerModule::for_root_async(MailerModuleAsyncOptions::use_factory(
//!         || async {
//!             let settings = MailerSettings::from_env()?;
//!             Ok::<_, MailerError>(MailerModuleOptions::from(settings))
//!         },
//!     ))
//!     .await?;
//!
//!     let mailer = module.service();
//!     println!("default transport: {}", mailer.default_mailer());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use courier_mailer::MailerError;
use tracing::debug;

use crate::options::{MailerModuleOptions, MailerSettings};
use crate::service::MailerService;

type OptionsFuture = Pin<Box<dyn Future<Output = Result<MailerModuleOptions, MailerError>> + Send>>;

/// Produces mail service options, possibly asynchronously.
#[async_trait]
pub trait MailerOptionsFactory: Send + Sync {
    async fn create_mailer_options(&self) -> Result<MailerModuleOptions, MailerError>;
}

#[async_trait]
impl MailerOptionsFactory for MailerSettings {
    async fn create_mailer_options(&self) -> Result<MailerModuleOptions, MailerError> {
        Ok(self.clone().into())
    }
}

/// The ways options can be resolved for [`MailerModule::for_root_async`].
pub enum MailerModuleAsyncOptions {
    /// An async function returning the options.
    UseFactory(Box<dyn FnOnce() -> OptionsFuture + Send>),
    /// A factory the application already owns and may share with other code.
    UseExisting(Arc<dyn MailerOptionsFactory>),
    /// A factory instantiated by the module for this resolution only.
    UseClass(Box<dyn MailerOptionsFactory>),
}

impl MailerModuleAsyncOptions {
    pub fn use_factory<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<MailerModuleOptions, MailerError>> + Send + 'static,
    {
        Self::UseFactory(Box::new(move || -> OptionsFuture { Box::pin(factory()) }))
    }

    pub fn use_existing<F: MailerOptionsFactory + 'static>(factory: Arc<F>) -> Self {
        Self::UseExisting(factory)
    }

    pub fn use_class<F: MailerOptionsFactory + Default + 'static>() -> Self {
        Self::UseClass(Box::new(F::default()))
    }

    async fn resolve(self) -> Result<MailerModuleOptions, MailerError> {
        match self {
            MailerModuleAsyncOptions::UseFactory(factory) => factory().await,
            MailerModuleAsyncOptions::UseExisting(factory) => factory.create_mailer_options().await,
            MailerModuleAsyncOptions::UseClass(factory) => factory.create_mailer_options().await,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            MailerModuleAsyncOptions::UseFactory(_) => "factory",
            MailerModuleAsyncOptions::UseExisting(_) => "existing",
            MailerModuleAsyncOptions::UseClass(_) => "class",
        }
    }
}

impl fmt::Debug for MailerModuleAsyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MailerModuleAsyncOptions")
            .field(&self.kind())
            .finish()
    }
}

/// Holds the application's single [`MailerService`].
#[derive(Debug, Clone)]
pub struct MailerModule {
    service: Arc<MailerService>,
}

impl MailerModule {
    pub fn for_root(options: MailerModuleOptions) -> Result<Self, MailerError> {
        let service = MailerService::new(options)?;
        debug!(mailers = ?service.mailer_names(), "Mailer module initialized");
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub async fn for_root_async(options: MailerModuleAsyncOptions) -> Result<Self, MailerError> {
        debug!(resolver = options.kind(), "Resolving mailer options");
        let options = options.resolve().await?;
        Self::for_root(options)
    }

    pub fn service(&self) -> Arc<MailerService> {
        self.service.clone()
    }
}

impl From<MailerService> for MailerModule {
    fn from(service: MailerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
