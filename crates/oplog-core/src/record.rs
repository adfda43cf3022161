//! Per-invocation operation records.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::descriptor::OperationDescriptor;
use crate::host;
use crate::level::OperationLevel;

/// Timestamp layout at the reporter boundary: date and time to the second.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One invocation's worth of operation data.
///
/// A record is created when a marked operation is entered, accumulates
/// annotations while the operation runs, and is finalized and handed to a
/// reporter when the operation exits. The id is assigned exactly once at
/// creation; `success` stays `false` until the outcome is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    id: Uuid,
    level: OperationLevel,
    tags: Vec<String>,
    annotations: Vec<String>,
    created_at: String,
    origin_host: String,
    success: bool,
}

impl OperationRecord {
    /// A fresh record for one invocation of the described operation.
    ///
    /// Copies the level and the tag seed from the descriptor; the type and
    /// description are declaration-side data and stay behind.
    pub(crate) fn from_descriptor(descriptor: &OperationDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: descriptor.level(),
            tags: descriptor.tags().to_vec(),
            annotations: Vec::new(),
            created_at: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            origin_host: host::origin_host().to_string(),
            success: false,
        }
    }

    /// A record backed by no live frame.
    ///
    /// This is what the current-operation handle resolves to on an idle
    /// thread. It is never stored and never reported, so writes to it are
    /// harmless by construction.
    pub(crate) fn detached() -> Self {
        Self {
            id: Uuid::new_v4(),
            level: OperationLevel::default(),
            tags: Vec::new(),
            annotations: Vec::new(),
            created_at: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            origin_host: host::origin_host().to_string(),
            success: false,
        }
    }

    /// Identifier assigned at creation, unique per invocation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Severity copied from the descriptor.
    pub fn level(&self) -> OperationLevel {
        self.level
    }

    /// Tags on this record: the descriptor seed plus any added at runtime.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Annotations appended while the operation ran, in order.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Creation time (UTC, second precision).
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Address of the host the record was created on.
    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    /// Outcome of the invocation. Meaningful only after finalization.
    pub fn success(&self) -> bool {
        self.success
    }

    pub(crate) fn push_annotation(&mut self, message: impl Into<String>) {
        self.annotations.push(message.into());
    }

    /// Records own their tags; the descriptor that seeded them is untouched.
    pub(crate) fn push_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub(crate) fn finalize(&mut self, success: bool) {
        self.success = success;
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OperationRecord {{ id={}, level={}, tags={:?}, annotations={:?}, createdAt={}, originHost={}, success={} }}",
            self.id,
            self.level,
            self.tags,
            self.annotations,
            self.created_at,
            self.origin_host,
            self.success
        )
    }
}
