use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use courier_mailer::{
    Delivery, Email, MailDefaults, MailerError, TemplateData, TemplateEngine, Transport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::options::{MailerModuleOptions, TransportSpec};

/// A message plus the send-time instructions for the mail service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendMailOptions {
    #[serde(flatten)]
    pub email: Email,
    /// Template to render into the HTML body, if an engine is configured.
    #[serde(default)]
    pub template: Option<String>,
    /// Data for the template. Missing data renders with an empty map.
    #[serde(default)]
    pub data: Option<TemplateData>,
    /// Transport to use instead of the default one.
    #[serde(default)]
    pub mailer: Option<String>,
}

impl SendMailOptions {
    pub fn new(email: Email) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    pub fn template<S: Into<String>>(mut self, template: S) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn data(mut self, data: TemplateData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn mailer<S: Into<String>>(mut self, mailer: S) -> Self {
        self.mailer = Some(mailer.into());
        self
    }
}

impl From<Email> for SendMailOptions {
    fn from(email: Email) -> Self {
        Self::new(email)
    }
}

/// Owns the named transports and dispatches outgoing mail.
///
/// The transport registry and the template engine are fixed at construction,
/// so a service can be shared behind an [`Arc`] and used concurrently.
pub struct MailerService {
    default_mailer: String,
    defaults: MailDefaults,
    transports: HashMap<String, Arc<dyn Transport>>,
    engine: Option<Arc<dyn TemplateEngine>>,
}

impl MailerService {
    /// Builds one transport per configured mailer.
    ///
    /// Fails if a transport cannot be constructed or if `default_mailer` does
    /// not name one of the configured mailers.
    pub fn new(options: MailerModuleOptions) -> Result<Self, MailerError> {
        let MailerModuleOptions {
            default_mailer,
            defaults,
            template,
            mailers,
        } = options;

        let mut transports = HashMap::with_capacity(mailers.len());

        for (name, spec) in mailers {
            let transport: Arc<dyn Transport> = match spec {
                TransportSpec::Factory(factory) => {
                    debug!(mailer = %name, "Creating transport from factory");
                    Arc::from(factory()?)
                }
                TransportSpec::Settings(config) => {
                    debug!(mailer = %name, kind = config.kind(), "Creating transport from settings");
                    Arc::from(config.build_transport(&defaults)?)
                }
            };
            transports.insert(name, transport);
        }

        if !transports.contains_key(&default_mailer) {
            return Err(MailerError::UnknownMailer(default_mailer));
        }

        Ok(Self {
            default_mailer,
            defaults,
            transports,
            engine: template.map(|template| template.engine),
        })
    }

    /// Sends a message through the named or default transport.
    ///
    /// When a template engine is configured and `options.template` is set, the
    /// rendered output replaces any HTML body on the message. `from` falls back
    /// to the configured default. Transport results are returned unchanged.
    pub async fn send(&self, options: SendMailOptions) -> Result<Delivery, MailerError> {
        let SendMailOptions {
            mut email,
            template,
            data,
            mailer,
        } = options;

        // Empty names count as unset.
        let name = mailer
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_mailer.as_str());
        let transport = self
            .transports
            .get(name)
            .ok_or_else(|| MailerError::UnknownMailer(name.to_string()))?;

        let template = template.filter(|template| !template.is_empty());

        match (&self.engine, template) {
            (Some(engine), Some(template)) => {
                let data = data.unwrap_or_default();
                email.html_body = Some(engine.render(&template, &data).await?);
            }
            (None, Some(template)) => {
                warn!(%template, "No template engine configured, ignoring template");
            }
            _ => {}
        }

        if email.from.is_none() {
            email.from.clone_from(&self.defaults.from);
        }

        debug!(
            mailer = %name,
            to = ?email.to,
            subject = %email.subject,
            "Sending email"
        );

        transport.send_mail(email).await
    }

    pub fn default_mailer(&self) -> &str {
        &self.default_mailer
    }

    pub fn defaults(&self) -> &MailDefaults {
        &self.defaults
    }

    /// Names of all configured transports, sorted.
    pub fn mailer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn has_mailer(&self, name: &str) -> bool {
        self.transports.contains_key(name)
    }

    pub fn transport(&self, name: &str) -> Option<Arc<dyn Transport>> {
        self.transports.get(name).cloned()
    }

    pub fn has_template_engine(&self) -> bool {
        self.engine.is_some()
    }
}

impl fmt::Debug for MailerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerService")
            .field("default_mailer", &self.default_mailer)
            .field("mailers", &self.mailer_names())
            .field("template_engine", &self.engine.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_mailer::TransportConfig;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct MockTransport {
        sent_emails: Arc<Mutex<Vec<Email>>>,
    }

    impl MockTransport {
        fn get_sent_emails(&self) -> Vec<Email> {
            self.sent_emails.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_mail(&self, email: Email) -> Result<Delivery, MailerError> {
            let accepted = email.to.clone();
            self.sent_emails.lock().unwrap().push(email);
            Ok(Delivery {
                accepted,
                ..Delivery::default()
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send_mail(&self, _email: Email) -> Result<Delivery, MailerError> {
            Err(MailerError::Builder("relay refused".to_string()))
        }
    }

    struct EchoEngine;

    #[async_trait]
    impl TemplateEngine for EchoEngine {
        async fn render(
            &self,
            template: &str,
            data: &TemplateData,
        ) -> Result<String, MailerError> {
            let name = data
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("nobody");
            Ok(format!("<p>{template}:{name}</p>"))
        }
    }

    struct BrokenEngine;

    #[async_trait]
    impl TemplateEngine for BrokenEngine {
        async fn render(&self, template: &str, _: &TemplateData) -> Result<String, MailerError> {
            Err(MailerError::TemplateNotFound(template.to_string()))
        }
    }

    fn message() -> Email {
        Email::builder()
            .to("a@b.com")
            .subject("hi")
            .text_body("hello")
            .build()
    }

    fn service_with(mock: &MockTransport) -> MailerService {
        let mock = mock.clone();
        MailerService::new(
            MailerModuleOptions::new("smtp")
                .defaults(MailDefaults::from_address("noreply@example.com"))
                .mailer_factory("smtp", move || Ok(mock.clone())),
        )
        .unwrap()
    }

    #[test]
    fn test_factories_are_invoked_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let service = MailerService::new(
            MailerModuleOptions::new("smtp").mailer_factory("smtp", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(MockTransport::default())
            }),
        )
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.mailer_names(), vec!["smtp"]);
    }

    #[test]
    fn test_unknown_default_mailer_fails_construction() {
        let result = MailerService::new(
            MailerModuleOptions::new("missing")
                .mailer("smtp", TransportConfig::Log { verbose: false }),
        );
        assert!(matches!(result, Err(MailerError::UnknownMailer(name)) if name == "missing"));

        let empty = MailerService::new(MailerModuleOptions::new("smtp"));
        assert!(matches!(empty, Err(MailerError::UnknownMailer(_))));
    }

    #[test]
    fn test_factory_error_propagates() {
        let result = MailerService::new(MailerModuleOptions::new("smtp").mailer_factory(
            "smtp",
            || -> Result<MockTransport, MailerError> {
                Err(MailerError::Config("no credentials".to_string()))
            },
        ));
        assert!(matches!(result, Err(MailerError::Config(_))));
    }

    #[tokio::test]
    async fn test_send_fills_default_from() {
        let mock = MockTransport::default();
        let service = service_with(&mock);

        let delivery = service.send(message().into()).await.unwrap();
        assert_eq!(delivery.accepted, vec!["a@b.com"]);

        let sent = mock.get_sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from.as_deref(), Some("noreply@example.com"));
        assert_eq!(sent[0].subject, "hi");
        assert_eq!(sent[0].text_body.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_explicit_from_wins() {
        let mock = MockTransport::default();
        let service = service_with(&mock);

        let mut email = message();
        email.from = Some("ann@example.com".to_string());
        service.send(email.into()).await.unwrap();

        assert_eq!(
            mock.get_sent_emails()[0].from.as_deref(),
            Some("ann@example.com")
        );
    }

    #[tokio::test]
    async fn test_unknown_mailer_does_not_send() {
        let mock = MockTransport::default();
        let service = service_with(&mock);

        let result = service
            .send(SendMailOptions::new(message()).mailer("nope"))
            .await;

        assert!(matches!(result, Err(MailerError::UnknownMailer(name)) if name == "nope"));
        assert!(mock.get_sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_empty_mailer_uses_default() {
        let mock = MockTransport::default();
        let service = service_with(&mock);

        let options: SendMailOptions = serde_json::from_value(serde_json::json!({
            "to": ["a@b.com"],
            "subject": "hi",
            "text_body": "x",
            "mailer": ""
        }))
        .unwrap();
        service.send(options).await.unwrap();

        assert_eq!(mock.get_sent_emails().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_template_is_not_rendered() {
        let mock = MockTransport::default();
        let sender = mock.clone();
        let service = MailerService::new(
            MailerModuleOptions::new("smtp")
                .mailer_factory("smtp", move || Ok(sender.clone()))
                .template_engine(BrokenEngine),
        )
        .unwrap();

        let mut email = message();
        email.html_body = Some("<p>handwritten</p>".to_string());
        service
            .send(SendMailOptions::new(email).template(""))
            .await
            .unwrap();

        assert_eq!(
            mock.get_sent_emails()[0].html_body.as_deref(),
            Some("<p>handwritten</p>")
        );
    }

    #[tokio::test]
    async fn test_template_ignored_without_engine() {
        let mock = MockTransport::default();
        let service = service_with(&mock);
        assert!(!service.has_template_engine());

        let mut email = message();
        email.html_body = Some("<p>handwritten</p>".to_string());
        service
            .send(SendMailOptions::new(email).template("welcome"))
            .await
            .unwrap();

        assert_eq!(
            mock.get_sent_emails()[0].html_body.as_deref(),
            Some("<p>handwritten</p>")
        );
    }

    #[tokio::test]
    async fn test_rendered_template_overrides_html() {
        let mock = MockTransport::default();
        let sender = mock.clone();
        let service = MailerService::new(
            MailerModuleOptions::new("smtp")
                .mailer_factory("smtp", move || Ok(sender.clone()))
                .template_engine(EchoEngine),
        )
        .unwrap();

        let mut email = message();
        email.html_body = Some("<p>handwritten</p>".to_string());
        let data = TemplateData::new().insert("name", "Ann").unwrap();
        service
            .send(SendMailOptions::new(email).template("welcome").data(data))
            .await
            .unwrap();

        service
            .send(SendMailOptions::new(message()).template("welcome"))
            .await
            .unwrap();

        let sent = mock.get_sent_emails();
        assert_eq!(sent[0].html_body.as_deref(), Some("<p>welcome:Ann</p>"));
        assert_eq!(sent[1].html_body.as_deref(), Some("<p>welcome:nobody</p>"));
    }

    #[tokio::test]
    async fn test_render_failure_aborts_send() {
        let mock = MockTransport::default();
        let sender = mock.clone();
        let service = MailerService::new(
            MailerModuleOptions::new("smtp")
                .mailer_factory("smtp", move || Ok(sender.clone()))
                .template_engine(BrokenEngine),
        )
        .unwrap();

        let result = service
            .send(SendMailOptions::new(message()).template("welcome"))
            .await;

        assert!(matches!(result, Err(MailerError::TemplateNotFound(_))));
        assert!(mock.get_sent_emails().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let service = MailerService::new(
            MailerModuleOptions::new("smtp").mailer_factory("smtp", || Ok(FailingTransport)),
        )
        .unwrap();

        let result = service.send(message().into()).await;
        assert!(matches!(result, Err(MailerError::Builder(msg)) if msg == "relay refused"));
    }

    #[test]
    fn test_send_options_deserialize() {
        let options: SendMailOptions = serde_json::from_value(serde_json::json!({
            "to": ["a@b.com"],
            "subject": "hi",
            "template": "welcome",
            "data": { "name": "Ann" },
            "mailer": "backup"
        }))
        .unwrap();

        assert_eq!(options.email.to, vec!["a@b.com"]);
        assert_eq!(options.template.as_deref(), Some("welcome"));
        assert_eq!(options.mailer.as_deref(), Some("backup"));
        assert_eq!(
            options.data.unwrap().get("name"),
            Some(&serde_json::json!("Ann"))
        );
    }
}
