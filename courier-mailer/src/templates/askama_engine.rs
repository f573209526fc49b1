use crate::{MailerError, templates::TemplateData};
use askama::Template;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;

use super::TemplateEngine;

type RenderFn = Box<dyn Fn(&TemplateData) -> Result<String, MailerError> + Send + Sync>;

/// A [`TemplateEngine`] backed by compiled askama templates.
///
/// Each template is registered under a name. At render time the data map is
/// deserialized into the template struct, so field names in the data must
/// match the struct's fields.
///
/// ```rust,ignore
/// #[derive(askama::Template, serde::Deserialize)]
/// #[template(path = "welcome.html")]
/// struct Welcome { name: String }
///
/// let engine = AskamaTemplateEngine::new().register::<Welcome>("welcome");
/// ```
#[derive(Default)]
pub struct AskamaTemplateEngine {
    templates: HashMap<String, RenderFn>,
}

impl AskamaTemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T>(mut self, name: impl Into<String>) -> Self
    where
        T: Template + DeserializeOwned + 'static,
    {
        self.templates.insert(
            name.into(),
            Box::new(|data: &TemplateData| -> Result<String, MailerError> {
                let template: T = data.deserialize_into()?;
                Ok(template.render()?)
            }),
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl fmt::Debug for AskamaTemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.templates.keys().collect();
        names.sort();
        f.debug_struct("AskamaTemplateEngine")
            .field("templates", &names)
            .finish()
    }
}

#[async_trait]
impl TemplateEngine for AskamaTemplateEngine {
    async fn render(&self, template: &str, data: &TemplateData) -> Result<String, MailerError> {
        let render = self
            .templates
            .get(template)
            .ok_or_else(|| MailerError::TemplateNotFound(template.to_string()))?;
        render(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Template, Deserialize)]
    #[template(source = "<p>Welcome, {{ name }}!</p>", ext = "html")]
    struct WelcomeTemplate {
        name: String,
    }

    #[derive(Template, Deserialize)]
    #[template(
        source = "<p>{% if let Some(code) = code %}Your code is {{ code }}{% else %}No code{% endif %}</p>",
        ext = "html"
    )]
    struct CodeTemplate {
        #[serde(default)]
        code: Option<String>,
    }

    fn engine() -> AskamaTemplateEngine {
        AskamaTemplateEngine::new()
            .register::<WelcomeTemplate>("welcome")
            .register::<CodeTemplate>("code")
    }

    #[tokio::test]
    async fn test_renders_registered_template() {
        let data = TemplateData::new().insert("name", "Ann").unwrap();

        let html = engine().render("welcome", &data).await.unwrap();
        assert_eq!(html, "<p>Welcome, Ann!</p>");
    }

    #[tokio::test]
    async fn test_escapes_html() {
        let data = TemplateData::new().insert("name", "<b>Ann</b>").unwrap();

        let html = engine().render("welcome", &data).await.unwrap();
        assert!(!html.contains("<b>"));
    }

    #[tokio::test]
    async fn test_empty_data_uses_serde_defaults() {
        let html = engine()
            .render("code", &TemplateData::new())
            .await
            .unwrap();
        assert_eq!(html, "<p>No code</p>");
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let result = engine().render("missing", &TemplateData::new()).await;
        assert!(matches!(result, Err(MailerError::TemplateNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_missing_field_is_an_error() {
        let result = engine().render("welcome", &TemplateData::new()).await;
        assert!(matches!(result, Err(MailerError::Serialization(_))));
    }

    #[test]
    fn test_debug_lists_names() {
        let engine = engine();
        assert!(engine.contains("welcome"));
        assert_eq!(
            format!("{engine:?}"),
            r#"AskamaTemplateEngine { templates: ["code", "welcome"] }"#
        );
    }
}
