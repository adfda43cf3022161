//! Severity levels for declared operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity attached to a declared operation.
///
/// The level lives on the descriptor and is copied onto every record created
/// for that operation, so a record carries it even after the descriptor is
/// out of reach.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl OperationLevel {
    /// Stable uppercase name, as emitted at the reporter boundary.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationLevel::Trace => "TRACE",
            OperationLevel::Debug => "DEBUG",
            OperationLevel::Info => "INFO",
            OperationLevel::Warn => "WARN",
            OperationLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for OperationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(OperationLevel::default(), OperationLevel::Info);
    }

    #[test]
    fn test_display_uses_uppercase_names() {
        assert_eq!(OperationLevel::Trace.to_string(), "TRACE");
        assert_eq!(OperationLevel::Warn.to_string(), "WARN");
        assert_eq!(OperationLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_serializes_as_uppercase_string() {
        let json = serde_json::to_string(&OperationLevel::Debug).unwrap();
        assert_eq!(json, r#""DEBUG""#);

        let back: OperationLevel = serde_json::from_str(r#""INFO""#).unwrap();
        assert_eq!(back, OperationLevel::Info);
    }

    #[test]
    fn test_levels_order_by_severity() {
        assert!(OperationLevel::Trace < OperationLevel::Debug);
        assert!(OperationLevel::Debug < OperationLevel::Info);
        assert!(OperationLevel::Info < OperationLevel::Warn);
        assert!(OperationLevel::Warn < OperationLevel::Error);
    }
}
