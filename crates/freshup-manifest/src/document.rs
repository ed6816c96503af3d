//! In-memory manifest document

use crate::error::{ManifestError, ManifestResult};
use crate::jsonc::strip_jsonc;
use serde_json::{Map, Value};
use std::path::Path;

/// Known top-level keys and the JSON type each must hold
const SHAPE: &[(&str, &str)] = &[
    ("lock", "a boolean"),
    ("tasks", "an object"),
    ("name", "a string"),
    ("version", "a string"),
    ("imports", "an object"),
];

/// Parsed `deno.json` / `deno.jsonc`
///
/// Key order of the source file is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Map<String, Value>,
}

impl ManifestDocument {
    /// Create from a JSON object
    #[inline]
    #[must_use]
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Parse manifest text, comments and trailing commas allowed
    ///
    /// # Errors
    /// - `ManifestError::Syntax` if the text is not JSON after normalization
    /// - `ManifestError::InvalidShape` if the root or a known key has the
    ///   wrong type
    pub fn parse(path: &Path, text: &str) -> ManifestResult<Self> {
        let value: Value = serde_json::from_str(&strip_jsonc(text))
            .map_err(|e| ManifestError::syntax(path, e.to_string()))?;
        let Value::Object(root) = value else {
            return Err(ManifestError::InvalidShape {
                key: "<root>".into(),
                expected: "an object",
            });
        };
        let document = Self { root };
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> ManifestResult<()> {
        for (key, expected) in SHAPE {
            let ok = match self.root.get(*key) {
                None => true,
                Some(Value::Bool(_)) => *expected == "a boolean",
                Some(Value::Object(_)) => *expected == "an object",
                Some(Value::String(_)) => *expected == "a string",
                Some(_) => false,
            };
            if !ok {
                return Err(ManifestError::InvalidShape {
                    key: (*key).to_string(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Top-level object
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Get value at a key path
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for segment in rest {
            match current {
                Value::Object(map) => current = map.get(*segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Object at a top-level key, created empty if absent
    ///
    /// # Errors
    /// `ManifestError::InvalidShape` if `key` holds a non-object value.
    pub fn object_mut(&mut self, key: &str) -> ManifestResult<&mut Map<String, Value>> {
        self.root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ManifestError::InvalidShape {
                key: key.to_string(),
                expected: "an object",
            })
    }

    /// Set value at a key path, creating intermediate objects as needed
    pub fn set_path(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.root;
        for segment in parents {
            let slot = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            current = map;
        }
        current.insert((*last).to_string(), value);
    }

    /// Remove value at a key path, returning it
    pub fn remove_path(&mut self, path: &[&str]) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        let mut current = &mut self.root;
        for segment in parents {
            current = current.get_mut(*segment)?.as_object_mut()?;
        }
        current.shift_remove(*last)
    }

    /// Serialize with two-space indentation and a trailing newline
    ///
    /// # Errors
    /// `ManifestError::Serialize` if serialization fails.
    pub fn to_pretty(&self) -> ManifestResult<String> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }
}
