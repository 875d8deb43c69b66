//! HTML template rendering.
//!
//! Wraps a Tera environment loaded from the configured template root. Every
//! render merges a `settings` sub-mapping into the context under a reserved
//! key, built from the allow-list in `templates.settings_keys` — templates
//! only ever see approved configuration values, never the whole settings
//! table.

use anyhow::{Context as _, Result};
use tera::Tera;
use thiserror::Error;

use crate::config::Config;

/// Context key under which the approved settings are exposed to templates.
const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("template rendering failed")]
    Render(#[source] tera::Error),
}

pub struct Renderer {
    tera: Tera,
    settings: serde_json::Map<String, serde_json::Value>,
}

impl Renderer {
    /// Loads every `.html` template under the configured root and
    /// precomputes the settings sub-mapping.
    pub fn new(config: &Config) -> Result<Self> {
        let pattern = format!("{}/**/*.html", config.templates.root.display());
        let tera = Tera::new(&pattern)
            .with_context(|| format!("Failed to load templates from {}", pattern))?;

        Ok(Self {
            tera,
            settings: template_settings(config),
        })
    }

    /// Renders `template` with `context`, after injecting the settings
    /// sub-mapping. A context entry already named `settings` is overwritten.
    pub fn render(&self, template: &str, context: &mut tera::Context) -> Result<String, RenderError> {
        context.insert(SETTINGS_KEY, &self.settings);

        self.tera.render(template, context).map_err(|e| match &e.kind {
            tera::ErrorKind::TemplateNotFound(name) => RenderError::TemplateNotFound(name.clone()),
            _ => RenderError::Render(e),
        })
    }
}

/// Projects the `[settings]` table through the allow-list. Keys listed but
/// absent from the table come through as null so templates can test them
/// uniformly.
fn template_settings(config: &Config) -> serde_json::Map<String, serde_json::Value> {
    let mut out = serde_json::Map::new();
    for key in &config.templates.settings_keys {
        let value = config
            .settings
            .get(key)
            .and_then(|v| serde_json::to_value(v).ok())
            .unwrap_or(serde_json::Value::Null);
        out.insert(key.clone(), value);
    }
    out
}
