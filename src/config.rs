//! Generation configuration: variables for `{key}` references and custom classes

use crate::error::{LazyError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const CUSTOM_CLASSES_KEY: &str = "custom_classes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Text(String),
    /// Class name -> raw declaration text, in document order.
    CustomClasses(Vec<(String, String)>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: HashMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(source)
            .map_err(|e| LazyError::invalid_format(format!("Invalid JSON config: {}", e)))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut config = Self::new();
                config.merge_object(map);
                Ok(config)
            }
            other => Err(LazyError::config(format!(
                "configuration must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Merge a JSON object into the configuration. Keys present in `map`
    /// replace existing entries wholesale, including `custom_classes`.
    pub fn merge_object(&mut self, map: Map<String, Value>) {
        for (key, value) in map {
            match Self::convert_value(&key, value) {
                Some(converted) => {
                    self.values.insert(key, converted);
                }
                None => log::warn!("Ignoring unsupported configuration value for '{}'", key),
            }
        }
    }

    fn convert_value(key: &str, value: Value) -> Option<ConfigValue> {
        if key == CUSTOM_CLASSES_KEY {
            let Value::Object(classes) = value else {
                return None;
            };
            let classes = classes
                .into_iter()
                .filter_map(|(name, css)| match scalar_text(css) {
                    Some(css) => Some((name, css)),
                    None => {
                        log::warn!("Ignoring custom class '{}': declarations must be text", name);
                        None
                    }
                })
                .collect();
            return Some(ConfigValue::CustomClasses(classes));
        }
        scalar_text(value).map(ConfigValue::Text)
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), ConfigValue::Text(value.into()));
    }

    pub fn add_custom_class(&mut self, name: impl Into<String>, css: impl Into<String>) {
        let entry = self
            .values
            .entry(CUSTOM_CLASSES_KEY.to_string())
            .or_insert_with(|| ConfigValue::CustomClasses(Vec::new()));
        let name = name.into();
        let css = css.into();
        match entry {
            ConfigValue::CustomClasses(classes) => {
                match classes.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(slot) => slot.1 = css,
                    None => classes.push((name, css)),
                }
            }
            ConfigValue::Text(_) => *entry = ConfigValue::CustomClasses(vec![(name, css)]),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Text value for `{key}` substitution.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ConfigValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn custom_classes(&self) -> &[(String, String)] {
        match self.values.get(CUSTOM_CLASSES_KEY) {
            Some(ConfigValue::CustomClasses(classes)) => classes,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_are_resolved_at_load() {
        let config = Config::from_json_value(json!({
            "gap-size": "16px",
            "columns": 3,
            "dark": true,
            "ignored": [1, 2],
            "custom_classes": {
                "my-button": "color: white;",
                "my-card": "padding: 4px;"
            }
        }))
        .unwrap();

        assert_eq!(config.len(), 4);
        assert_eq!(config.text("gap-size"), Some("16px"));
        assert_eq!(config.text("columns"), Some("3"));
        assert_eq!(config.text("dark"), Some("true"));
        assert_eq!(config.get("ignored"), None);
        assert_eq!(config.text("custom_classes"), None);
        assert_eq!(
            config.custom_classes(),
            &[
                ("my-button".to_string(), "color: white;".to_string()),
                ("my-card".to_string(), "padding: 4px;".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_classes_keep_document_order() {
        let config =
            Config::from_json_str(r#"{"custom_classes": {"zeta": "a:1;", "alpha": "b:2;", "mid": "c:3;"}}"#)
                .unwrap();
        let names: Vec<_> = config.custom_classes().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_later_merge_wins() {
        let mut config = Config::from_json_str(
            r#"{"accent": "red", "custom_classes": {"a": "x:1;", "b": "y:2;"}}"#,
        )
        .unwrap();
        config.merge_object(
            json!({"accent": "blue", "custom_classes": {"c": "z:3;"}})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert_eq!(config.text("accent"), Some("blue"));
        assert_eq!(config.custom_classes().len(), 1);
        assert_eq!(config.custom_classes()[0].0, "c");
    }

    #[test]
    fn test_non_object_config_rejected() {
        assert!(Config::from_json_str("[1, 2]").is_err());
        assert!(Config::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_add_custom_class_replaces_existing() {
        let mut config = Config::new();
        config.add_custom_class("card", "padding: 1px;");
        config.add_custom_class("card", "padding: 2px;");
        assert_eq!(config.custom_classes(), &[("card".to_string(), "padding: 2px;".to_string())]);
    }
}
