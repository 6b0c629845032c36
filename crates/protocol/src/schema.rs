//! Declared parameter schemas for the operation catalog.
//!
//! Schemas are registered once at process startup and are read-only for the
//! process lifetime; validation happens before any handler runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime shape a declared parameter must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "values")]
pub enum ParamShape {
    String,
    Number,
    Object,
    Enum(Vec<String>),
}

impl ParamShape {
    /// Checks a present value against this shape.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamShape::String => value.is_string(),
            ParamShape::Number => value.is_number(),
            ParamShape::Object => value.is_object(),
            ParamShape::Enum(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|a| a == s)),
        }
    }

    /// Human-readable shape name used in validation messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            ParamShape::String => "string",
            ParamShape::Number => "number",
            ParamShape::Object => "object",
            ParamShape::Enum(_) => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(flatten)]
    pub shape: ParamShape,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSchema {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl OperationSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: Vec::new(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(
        mut self,
        name: impl Into<String>,
        shape: ParamShape,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            shape,
            description: description.into(),
        });
        self
    }

    #[must_use]
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    #[must_use]
    pub fn shape_of(&self, name: &str) -> Option<&ParamShape> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.shape)
    }
}
