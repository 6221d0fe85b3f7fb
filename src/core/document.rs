//! Document - a single entry of a compiled archive
//!
//! Documents come from the external loader; this crate only reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata attached to a document (free-form JSON object)
pub type Metadata = Map<String, Value>;

/// A document as yielded by an archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier, unique within an archive
    pub id: String,

    /// Extracted text (may be absent)
    #[serde(default)]
    pub text: Option<String>,

    /// Metadata (`source` is used as display label)
    #[serde(default, alias = "meta")]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            metadata: Metadata::new(),
        }
    }

    /// A document without any text
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Text if present and non-empty
    pub fn searchable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Display label: metadata `source`, falling back to the id
    pub fn label(&self) -> String {
        match self.metadata.get("source") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => self.id.clone(),
        }
    }

    /// First `max_chars` characters on a single line
    pub fn preview(&self, max_chars: usize) -> String {
        let head: String = self
            .text
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(max_chars)
            .collect();
        head.replace('\n', " ").trim().to_string()
    }
}
