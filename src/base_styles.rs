//! Predefined utility classes emitted when the markup uses them

use crate::error::{LazyError, Result};
use crate::types::CssRule;
use crate::utils::class_selector;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUNDLED_BASE_STYLES: &str = include_str!("../data/lazy.json");

/// Ordered class name -> declaration list library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseStyles {
    entries: Vec<(String, String)>,
}

impl BaseStyles {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The library shipped with the generator.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_BASE_STYLES)
            .map_err(|e| LazyError::static_data(format!("bundled base styles: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| LazyError::FileNotFound {
            path: format!("Base styles {}: {}", path.display(), e),
        })?;
        log::info!("Loaded base styles from {}", path.display());
        Self::from_json_str(&source)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(source)
            .map_err(|e| LazyError::invalid_format(format!("Invalid base styles JSON: {}", e)))?;

        let mut entries = Vec::with_capacity(map.len());
        for (class, declarations) in map {
            match declarations {
                Value::String(text) => entries.push((class, text)),
                other => {
                    return Err(LazyError::invalid_format(format!(
                        "base style '{}' must map to a string, found {}",
                        class, other
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, class: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, css)| css.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules for the used classes, in library order.
    pub fn rules_for(&self, used: &HashSet<&str>) -> Vec<CssRule> {
        self.entries
            .iter()
            .filter(|(class, _)| used.contains(class.as_str()))
            .map(|(class, css)| CssRule::new(class_selector(class), css.clone()))
            .collect()
    }
}
