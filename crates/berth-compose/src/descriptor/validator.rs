//! Semantic checks on a parsed descriptor.
//!
//! Runs after every definition has been converted, so errors here concern
//! relationships between definitions rather than individual fields.

use std::collections::HashSet;

use berth_common::constants::SUPPORTED_DESCRIPTOR_VERSION;
use berth_common::error::{BerthError, Result};
use serde_json::Value;

use super::model::Descriptor;

/// Checks the version marker of a raw descriptor document.
///
/// The marker may be a string or an integer.
///
/// # Errors
///
/// Returns [`BerthError::UnsupportedDescriptorVersion`] if the marker is
/// absent or is anything other than the supported version.
pub fn check_version(version: Option<&Value>) -> Result<()> {
    let found = match version {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    if found.as_deref() == Some(SUPPORTED_DESCRIPTOR_VERSION) {
        Ok(())
    } else {
        Err(BerthError::UnsupportedDescriptorVersion { found })
    }
}

/// Validates a descriptor for semantic correctness.
///
/// # Checks performed
///
/// 1. No two definitions share a name.
/// 2. Links naming an undefined container are reported (not rejected).
///
/// # Errors
///
/// Returns an error if a container name is defined twice.
pub fn validate(descriptor: &Descriptor) -> Result<()> {
    check_duplicate_names(descriptor)?;
    warn_unknown_links(descriptor);
    Ok(())
}

fn check_duplicate_names(descriptor: &Descriptor) -> Result<()> {
    let mut seen = HashSet::new();
    for def in &descriptor.definitions {
        if !seen.insert(def.name.as_str()) {
            return Err(BerthError::MalformedDescriptor {
                definition: def.name.clone(),
                message: "container name is defined more than once".into(),
            });
        }
    }
    Ok(())
}

fn warn_unknown_links(descriptor: &Descriptor) {
    let names: HashSet<&str> = descriptor
        .definitions
        .iter()
        .map(|d| d.name.as_str())
        .collect();

    for def in &descriptor.definitions {
        for link in def.links.iter().filter(|l| !names.contains(l.as_str())) {
            tracing::warn!(container = %def.name, link = %link, "link to undefined container");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::descriptor::model::ContainerDefinition;

    fn make_definition(name: &str) -> ContainerDefinition {
        ContainerDefinition {
            name: name.into(),
            image: "img".into(),
            ..ContainerDefinition::default()
        }
    }

    #[test]
    fn version_accepts_string_and_integer() {
        assert!(check_version(Some(&json!("2"))).is_ok());
        assert!(check_version(Some(&json!(2))).is_ok());
    }

    #[test]
    fn version_rejects_missing_marker() {
        let err = check_version(None).unwrap_err();
        assert!(matches!(
            err,
            BerthError::UnsupportedDescriptorVersion { found: None }
        ));
    }

    #[test]
    fn version_rejects_single_container_format() {
        let err = check_version(Some(&json!(1))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('1'), "got: {msg}");
    }

    #[test]
    fn validate_empty_descriptor_succeeds() {
        assert!(validate(&Descriptor::default()).is_ok());
    }

    #[test]
    fn validate_duplicate_name_fails() {
        let descriptor = Descriptor {
            definitions: vec![make_definition("web"), make_definition("web")],
            volumes: Vec::new(),
        };
        let err = validate(&descriptor).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("more than once"), "got: {msg}");
    }

    #[test]
    fn validate_unknown_link_is_not_an_error() {
        let mut web = make_definition("web");
        web.links = vec!["ghost".into()];
        let descriptor = Descriptor {
            definitions: vec![web],
            volumes: Vec::new(),
        };
        assert!(validate(&descriptor).is_ok());
    }
}
