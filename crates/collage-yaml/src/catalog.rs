//! Template catalog keyed by slot count.

use crate::config::CollageConfig;
use crate::error::ParseError;
use collage_layout::LayoutTemplate;
use serde::Deserialize;
use std::collections::BTreeMap;

const BUILTIN_YAML: &str = include_str!("../templates/default.yaml");

#[derive(Deserialize)]
struct TemplateFile {
    templates: Vec<LayoutTemplate>,
}

/// Validated templates grouped by the item count they target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    by_count: BTreeMap<usize, Vec<LayoutTemplate>>,
}

impl TemplateCatalog {
    /// Build a catalog, validating every template.
    pub fn new(templates: impl IntoIterator<Item = LayoutTemplate>) -> Result<Self, ParseError> {
        let mut catalog = Self::default();
        for template in templates {
            template.validate()?;
            if catalog.find(&template.name).is_some() {
                return Err(ParseError::Validation(format!(
                    "duplicate template '{}'",
                    template.name
                )));
            }
            catalog
                .by_count
                .entry(template.slot_count())
                .or_default()
                .push(template);
        }
        Ok(catalog)
    }

    /// The bundled two- to six-slot layouts.
    pub fn builtin() -> Result<Self, ParseError> {
        let file: TemplateFile = serde_yaml_ng::from_str(BUILTIN_YAML)?;
        Self::new(file.templates)
    }

    /// Templates from a config, or the built-in set when it defines none.
    pub fn from_config(config: &CollageConfig) -> Result<Self, ParseError> {
        if config.templates.is_empty() {
            Self::builtin()
        } else {
            Self::new(config.templates.iter().cloned())
        }
    }

    /// Templates with exactly `count` slots.
    #[must_use]
    pub fn for_count(&self, count: usize) -> &[LayoutTemplate] {
        self.by_count.get(&count).map(Vec::as_slice).unwrap_or_default()
    }

    /// Template for `count` items: an exact match, else the smallest with
    /// more slots, else the largest available.
    #[must_use]
    pub fn best_fit(&self, count: usize) -> Option<&LayoutTemplate> {
        self.by_count
            .range(count..)
            .next()
            .or_else(|| self.by_count.iter().next_back())
            .and_then(|(_, templates)| templates.first())
    }

    /// Look up a template by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&LayoutTemplate> {
        self.iter().find(|t| t.name == name)
    }

    /// All templates, ordered by slot count.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutTemplate> {
        self.by_count.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_count.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_count.is_empty()
    }
}
