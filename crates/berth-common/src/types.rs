//! Domain primitive types used across the berth workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BerthError, Result};

/// Name of a service in the generated orchestration document.
///
/// Orchestration service names must be alphanumeric, so a service name is
/// always derived from a container name by dropping every character that is
/// not an ASCII letter or digit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceName(String);

impl ServiceName {
    /// Derives a service name from a container name.
    ///
    /// # Errors
    ///
    /// Returns [`BerthError::Sanitization`] if nothing alphanumeric remains.
    pub fn sanitize(container_name: &str) -> Result<Self> {
        let name = sanitize(container_name);
        if name.is_empty() {
            return Err(BerthError::Sanitization {
                name: container_name.to_owned(),
            });
        }
        Ok(Self(name))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips every character that is not an ASCII letter or digit.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}
