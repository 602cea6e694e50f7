//! docker-compose document emission.
//!
//! The document is a mapping from service name to service definition, with
//! no top-level `services` key. Empty fields are omitted entirely.

use std::collections::BTreeMap;
use std::path::Path;

use berth_common::error::{BerthError, Result};
use serde::{Deserialize, Serialize};

use crate::translator::ServiceEntry;

/// A service in the generated docker-compose document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeService {
    /// Image reference.
    pub image: String,
    /// Command override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// Published ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
    /// Links to other services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    /// Volume specifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    /// Environment variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    /// Privileged mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
}

impl From<ServiceEntry> for ComposeService {
    fn from(entry: ServiceEntry) -> Self {
        Self {
            image: entry.image,
            command: non_empty(entry.command),
            ports: non_empty(entry.ports),
            links: non_empty(entry.links),
            volumes: non_empty(entry.volumes),
            environment: (!entry.environment.is_empty()).then_some(entry.environment),
            privileged: entry.privileged,
        }
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

/// A docker-compose document keyed by service name.
pub type ComposeDocument = BTreeMap<String, ComposeService>;

/// Builds the document from translated services.
///
/// # Errors
///
/// Returns [`BerthError::DuplicateService`] if two entries share a name.
pub fn emit(services: Vec<ServiceEntry>) -> Result<ComposeDocument> {
    let mut document = ComposeDocument::new();
    for entry in services {
        let name = entry.service_name.as_str().to_owned();
        if document.contains_key(&name) {
            return Err(BerthError::DuplicateService {
                first: name.clone(),
                second: name.clone(),
                service: name,
            });
        }
        let _ = document.insert(name, entry.into());
    }
    Ok(document)
}

/// Serializes the document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml(document: &ComposeDocument) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Writes the document as YAML to `path`, replacing any previous file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_compose_file(document: &ComposeDocument, path: &Path) -> Result<()> {
    let yaml = to_yaml(document)?;
    crate::fsio::write_atomic(path, yaml.as_bytes())?;
    tracing::info!(path = %path.display(), services = document.len(), "wrote compose file");
    Ok(())
}
