mod builtin;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub use builtin::builtin_models;

/// Timestamp used for models that do not declare `created_at`.
pub const DEFAULT_CREATED_AT: &str = "2025-01-01T00:00:00Z";

/// Behavioural family of a mock model, as authored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[default]
    Text,
    Thinking,
    ThinkingTag,
    Markdown,
    Image,
    ToolCalls,
    Function,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Text => write!(f, "text"),
            ModelKind::Thinking => write!(f, "thinking"),
            ModelKind::ThinkingTag => write!(f, "thinking-tag"),
            ModelKind::Markdown => write!(f, "markdown"),
            ModelKind::Image => write!(f, "image"),
            ModelKind::ToolCalls => write!(f, "tool-calls"),
            ModelKind::Function => write!(f, "function"),
        }
    }
}

/// Scripted tool invocation attached to a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prompt: String,
    pub response: String,
    /// Pre-split streaming fragments. Empty means "derive from `response`".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stream_chunks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning_chunks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ScriptedToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_response: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_call_response_chunks: Vec<String>,
}

impl TestCase {
    /// Minimal test case with only a canned response.
    #[must_use]
    pub fn with_response(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prompt: String::new(),
            response: response.into(),
            stream_chunks: Vec::new(),
            reasoning_content: None,
            reasoning_chunks: Vec::new(),
            tool_call: None,
            tool_call_response: None,
            tool_call_response_chunks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stream_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stream_chunks = chunks.into_iter().map(Into::into).collect();
        self
    }
}

/// Catalog entry as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: ModelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// A loaded mock model. Always holds at least one test case.
#[derive(Debug)]
pub struct ModelDescriptor {
    id: String,
    display_name: String,
    description: String,
    kind: ModelKind,
    created_at: String,
    test_cases: Vec<Arc<TestCase>>,
}

impl ModelDescriptor {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the entry has a blank id or no test cases.
    pub fn from_spec(spec: ModelSpec) -> Result<Self, ConfigError> {
        if spec.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "model id cannot be empty".to_string(),
            ));
        }
        if spec.test_cases.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Model '{}' must have at least one test case",
                spec.id
            )));
        }
        Ok(Self {
            id: spec.id,
            display_name: spec.name,
            description: spec.description,
            kind: spec.kind,
            created_at: spec
                .created_at
                .unwrap_or_else(|| DEFAULT_CREATED_AT.to_string()),
            test_cases: spec.test_cases.into_iter().map(Arc::new).collect(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// The test case every request is answered with: always the first one.
    #[must_use]
    pub fn selected_test_case(&self) -> &Arc<TestCase> {
        // non-empty: checked in `from_spec`
        &self.test_cases[0]
    }
}

/// Read-only model table, built once and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    models: Vec<Arc<ModelDescriptor>>,
    index: FxHashMap<String, usize>,
}

impl ModelCatalog {
    /// Build a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for duplicate ids or invalid entries.
    pub fn from_specs(specs: Vec<ModelSpec>) -> Result<Self, ConfigError> {
        let mut models = Vec::with_capacity(specs.len());
        let mut index = FxHashMap::default();
        for spec in specs {
            let descriptor = ModelDescriptor::from_spec(spec)?;
            if index
                .insert(descriptor.id.clone(), models.len())
                .is_some()
            {
                return Err(ConfigError::Validation(format!(
                    "duplicate model id '{}'",
                    descriptor.id
                )));
            }
            models.push(Arc::new(descriptor));
        }
        Ok(Self { models, index })
    }

    /// Catalog shipped with the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in table itself is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_specs(builtin_models())
    }

    #[must_use]
    pub fn lookup(&self, model_id: &str) -> Option<&Arc<ModelDescriptor>> {
        self.index.get(model_id).map(|&i| &self.models[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelDescriptor>> {
        self.models.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
