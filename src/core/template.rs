//! Package name templating
//!
//! Renders the configured name template with Handlebars. Templates run in
//! strict mode so a misspelled placeholder fails instead of rendering empty.

use crate::{
    config::Config,
    core::artifacts::Artifact,
    error::{PackagerError, Result},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

/// Values available to the name template
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateFields {
    pub project_name: String,
    pub version: String,
    pub tag: String,
    pub os: String,
    pub arch: String,
    /// Empty when the platform has no ARM variant
    pub arm: String,
    /// Name of the first binary of the group
    pub binary: String,
}

impl TemplateFields {
    /// Build the fields for a platform group, applying label replacements
    pub fn new(
        config: &Config,
        replacements: &HashMap<String, String>,
        binaries: &[Artifact],
    ) -> Self {
        let replace = |value: &str| {
            replacements
                .get(value)
                .cloned()
                .unwrap_or_else(|| value.to_string())
        };
        let first = binaries.first();

        Self {
            project_name: config.project_name.clone(),
            version: config.version.clone(),
            tag: config.tag().to_string(),
            os: first.map(|b| replace(&b.os)).unwrap_or_default(),
            arch: first.map(|b| replace(&b.arch)).unwrap_or_default(),
            arm: first
                .and_then(|b| b.arm.as_deref())
                .map(replace)
                .unwrap_or_default(),
            binary: first.map(|b| b.name.clone()).unwrap_or_default(),
        }
    }
}

/// Compiled-on-demand name template
#[derive(Debug)]
pub struct NameTemplate {
    source: String,
    registry: Handlebars<'static>,
}

impl NameTemplate {
    /// Create a template from its source text
    pub fn new(source: impl Into<String>) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        Self {
            source: source.into(),
            registry,
        }
    }

    /// Render the template with the given fields
    pub fn apply(&self, fields: &TemplateFields) -> Result<String> {
        self.registry
            .render_template(&self.source, fields)
            .map_err(|e| PackagerError::template(&self.source, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT_NAME_TEMPLATE, core::platform::Platform};

    fn test_config() -> Config {
        Config {
            project_name: "app".to_string(),
            version: "1.0.0".to_string(),
            ..Config::default()
        }
    }

    fn binaries(platform: &Platform) -> Vec<Artifact> {
        vec![Artifact::binary("app", "dist/app", platform)]
    }

    #[test]
    fn test_default_template() {
        let config = test_config();
        let fields = TemplateFields::new(
            &config,
            &HashMap::new(),
            &binaries(&Platform::new("linux", "amd64", None)),
        );

        let name = NameTemplate::new(DEFAULT_NAME_TEMPLATE).apply(&fields).unwrap();
        assert_eq!(name, "app_1.0.0_linux_amd64");
    }

    #[test]
    fn test_default_template_with_arm() {
        let config = test_config();
        let fields = TemplateFields::new(
            &config,
            &HashMap::new(),
            &binaries(&Platform::new("linux", "arm", Some("6".to_string()))),
        );

        let name = NameTemplate::new(DEFAULT_NAME_TEMPLATE).apply(&fields).unwrap();
        assert_eq!(name, "app_1.0.0_linux_armv6");
    }

    #[test]
    fn test_replacements() {
        let config = test_config();
        let replacements = HashMap::from([
            ("amd64".to_string(), "x86_64".to_string()),
            ("linux".to_string(), "Linux".to_string()),
        ]);
        let fields = TemplateFields::new(
            &config,
            &replacements,
            &binaries(&Platform::new("linux", "amd64", None)),
        );

        let name = NameTemplate::new(DEFAULT_NAME_TEMPLATE).apply(&fields).unwrap();
        assert_eq!(name, "app_1.0.0_Linux_x86_64");
    }

    #[test]
    fn test_no_html_escaping() {
        let config = Config {
            project_name: "a&b".to_string(),
            ..test_config()
        };
        let fields = TemplateFields::new(&config, &HashMap::new(), &[]);

        let name = NameTemplate::new("{{ ProjectName }}-{{ Tag }}").apply(&fields).unwrap();
        assert_eq!(name, "a&b-1.0.0");
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let config = test_config();
        let fields = TemplateFields::new(&config, &HashMap::new(), &[]);

        let result = NameTemplate::new("{{ ProjectName }}_{{ Nope }}").apply(&fields);
        assert!(matches!(result, Err(PackagerError::Template { .. })));
    }

    #[test]
    fn test_malformed_template_fails() {
        let config = test_config();
        let fields = TemplateFields::new(&config, &HashMap::new(), &[]);

        let result = NameTemplate::new("{{#if Arm}}unterminated").apply(&fields);
        assert!(matches!(result, Err(PackagerError::Template { .. })));
    }
}
