//! Declaration-site metadata for marked operations.

use serde::{Deserialize, Serialize};

use crate::level::OperationLevel;

/// Immutable metadata describing one marked operation.
///
/// A descriptor is built once where the operation is declared and shared by
/// every invocation for the life of the process. Records created for the
/// operation copy the level and the tag seed; the type and description stay
/// on the descriptor for tooling that inspects declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    level: OperationLevel,
    #[serde(rename = "type")]
    op_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl OperationDescriptor {
    /// Start building a descriptor for the given operation type.
    pub fn builder(op_type: impl Into<String>) -> OperationDescriptorBuilder {
        OperationDescriptorBuilder {
            level: OperationLevel::default(),
            op_type: op_type.into(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Severity copied onto every record of this operation.
    pub fn level(&self) -> OperationLevel {
        self.level
    }

    /// Caller-chosen classification of the operation.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Human-readable summary of what the operation does.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tags seeded onto every record, in declaration order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Builder for [`OperationDescriptor`].
#[derive(Debug)]
pub struct OperationDescriptorBuilder {
    level: OperationLevel,
    op_type: String,
    description: String,
    tags: Vec<String>,
}

impl OperationDescriptorBuilder {
    /// Set the severity level (defaults to [`OperationLevel::Info`]).
    pub fn level(mut self, level: OperationLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a single tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append several tags, preserving their order.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> OperationDescriptor {
        OperationDescriptor {
            level: self.level,
            op_type: self.op_type,
            description: self.description,
            tags: self.tags,
        }
    }
}
