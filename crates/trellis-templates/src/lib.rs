//! Template integration for hosts that render named build bodies.
//!
//! A host registers each template once as a closure over a [`Builder`].
//! Rendering instantiates a fresh builder, evaluates the body through
//! [`Builder::build`] and encodes the result in the requested
//! [`OutputFormat`] (JSON when the host expresses no preference).

use std::collections::HashMap;
use thiserror::Error;
use trellis_engine::{BuildError, Builder, Value};
use trellis_render::{OutputFormat, RenderError};

type TemplateBody = dyn Fn(&mut Builder) -> Result<Value, BuildError> + Send + Sync;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template registered under `{0}`")]
    UnknownTemplate(String),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Registry mapping template names to build bodies.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Box<TemplateBody>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a name. Re-registering a name replaces
    /// the previous body.
    pub fn register<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: Fn(&mut Builder) -> Result<Value, BuildError> + Send + Sync + 'static,
    {
        self.templates.insert(name.into(), Box::new(body));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Evaluate a template with a fresh builder and encode the result.
    pub fn render(&self, name: &str, format: OutputFormat) -> Result<String, TemplateError> {
        let body = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))?;

        let mut builder = Builder::new();
        let value = builder.build(|m| body(m))?;
        Ok(trellis_render::encode(&value, format)?)
    }

    /// Render in the default format (JSON).
    pub fn render_default(&self, name: &str) -> Result<String, TemplateError> {
        self.render(name, OutputFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trellis_engine::Hint;

    fn registry_with_menu() -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        registry.register("menu", |m| {
            m.hash(|m| {
                m.pair("free", "toast")?;
                m.pair_with("sides", Hint::Array, |m| {
                    m.item("eggs")?;
                    m.item("jam")
                })
            })
        });
        registry
    }

    #[test]
    fn test_renders_a_registered_template_as_json() {
        let registry = registry_with_menu();
        assert_eq!(
            registry.render("menu", OutputFormat::Json).unwrap(),
            r#"{"free":"toast","sides":["eggs","jam"]}"#
        );
    }

    #[test]
    fn test_renders_a_registered_template_as_yaml() {
        let registry = registry_with_menu();
        assert_eq!(
            registry.render("menu", OutputFormat::Yaml).unwrap(),
            "free: toast\nsides:\n- eggs\n- jam\n"
        );
    }

    #[test]
    fn test_renders_a_registered_template_as_text() {
        let registry = registry_with_menu();
        assert_eq!(
            registry.render("menu", OutputFormat::Text).unwrap(),
            "{free: toast, sides: [eggs, jam]}"
        );
    }

    #[test]
    fn test_default_render_format_is_json() {
        let registry = registry_with_menu();
        assert_eq!(
            registry.render_default("menu").unwrap(),
            registry.render("menu", OutputFormat::Json).unwrap()
        );
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let registry = registry_with_menu();
        let err = registry.render_default("lunch").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownTemplate(name) if name == "lunch"));
    }

    #[test]
    fn test_build_errors_surface_through_render() {
        let mut registry = TemplateRegistry::new();
        registry.register("broken", |m| {
            m.call("nope", 1)?;
            Ok(Value::Null)
        });

        let err = registry.render_default("broken").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Build(BuildError::UnsupportedCall { name }) if name == "nope"
        ));
    }

    #[test]
    fn test_reregistering_replaces_the_body() {
        let mut registry = registry_with_menu();
        registry.register("menu", |m| m.build(|_| Ok("closed")));

        assert_eq!(registry.render_default("menu").unwrap(), "\"closed\"");
    }

    #[test]
    fn test_contains_and_names() {
        let registry = registry_with_menu();
        assert!(registry.contains("menu"));
        assert!(!registry.contains("lunch"));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["menu"]);
    }

    #[test]
    fn test_each_render_starts_from_a_fresh_builder() {
        let registry = registry_with_menu();
        let first = registry.render_default("menu").unwrap();
        let second = registry.render_default("menu").unwrap();
        assert_eq!(first, second);
    }
}
