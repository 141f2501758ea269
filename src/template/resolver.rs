//! Recursive template resolution.

use serde_json::{Map, Value};

use crate::config::GenerationConfig;
use crate::template::directive::Directive;
use crate::template::generators::Generator;

/// Prefix of the value substituted for directives outside the grammar.
pub const INVALID_KEY_PREFIX: &str = "Invalid key: ";

/// Turns template trees into concrete value trees.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    generator: Generator,
}

impl TemplateResolver {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            generator: Generator::new(config),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        self.generator.config()
    }

    /// Resolve a template tree.
    ///
    /// Strings are directives; other scalars pass through; objects and
    /// arrays are resolved element by element.
    pub fn resolve(&self, template: &Value) -> Value {
        match template {
            Value::String(directive) => self.resolve_directive(directive),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), self.resolve(value)))
                    .collect::<Map<String, Value>>(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.resolve(item)).collect()),
            literal => literal.clone(),
        }
    }

    /// Resolve a single directive string. Never fails: directives that
    /// cannot be parsed or generated become the sentinel.
    pub fn resolve_directive(&self, directive: &str) -> Value {
        match Directive::parse(directive).and_then(|parsed| self.generator.generate(&parsed)) {
            Some(value) => value,
            None => {
                tracing::debug!(directive = %directive, "Unusable directive");
                Value::String(format!("{INVALID_KEY_PREFIX}{directive}"))
            }
        }
    }
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}
