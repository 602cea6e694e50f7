//! Multi-container descriptor parser.
//!
//! Reads the JSON descriptor into loosely typed serde structs, then converts
//! each definition into the typed [`model`], reporting missing or mistyped
//! fields as [`BerthError::MalformedDescriptor`] with the offending
//! definition identified.

pub mod model;
pub mod validator;

use std::collections::BTreeMap;
use std::path::Path;

use berth_common::error::{BerthError, Result};
use serde::Deserialize;
use serde_json::Value;

use self::model::{ContainerDefinition, Descriptor, MountPoint, PortMapping, VolumeDeclaration};

const PRIMARY_LIST: &str = "containerDefinitions";
const LOCAL_LIST: &str = "localContainerDefinitions";
const VOLUMES_LIST: &str = "volumes";

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "AWSEBDockerrunVersion", default)]
    version: Option<Value>,
    #[serde(rename = "containerDefinitions", default)]
    container_definitions: Option<Value>,
    #[serde(rename = "localContainerDefinitions", default)]
    local_container_definitions: Option<Value>,
    #[serde(default)]
    volumes: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    name: Option<String>,
    image: Option<String>,
    command: Option<Vec<String>>,
    links: Option<Vec<String>>,
    port_mappings: Option<Vec<RawPortMapping>>,
    mount_points: Option<Vec<RawMountPoint>>,
    environment: Option<Vec<RawEnvVar>>,
    privileged: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPortMapping {
    host_port: Option<u16>,
    container_port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMountPoint {
    source_volume: Option<String>,
    container_path: Option<String>,
    #[serde(default)]
    read_only: bool,
}

#[derive(Debug, Deserialize)]
struct RawEnvVar {
    name: Option<String>,
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawVolume {
    name: String,
    host: RawVolumeHost,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolumeHost {
    source_path: String,
}

/// Reads and parses a descriptor file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the document is invalid.
pub fn load_descriptor(path: &Path) -> Result<Descriptor> {
    tracing::info!(path = %path.display(), "loading descriptor");
    let content = std::fs::read_to_string(path).map_err(|e| BerthError::io(path, e))?;
    parse_descriptor(&content)
}

/// Parses a descriptor from its JSON text.
///
/// # Errors
///
/// Returns an error if the text is not JSON, the version is unsupported, or a
/// container definition is malformed.
pub fn parse_descriptor(input: &str) -> Result<Descriptor> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

/// Converts an already-decoded JSON document into a [`Descriptor`].
///
/// Definitions from the primary list come first, followed by the local-only
/// list, each in document order.
///
/// # Errors
///
/// Returns an error if the version is unsupported or a container definition
/// is malformed.
pub fn from_value(value: Value) -> Result<Descriptor> {
    let raw: RawDocument =
        serde_json::from_value(value).map_err(|e| malformed("document", e.to_string()))?;
    validator::check_version(raw.version.as_ref())?;

    let primary = entries(raw.container_definitions, PRIMARY_LIST)?;
    let local = entries(raw.local_container_definitions, LOCAL_LIST)?;
    let mut definitions = Vec::with_capacity(primary.len() + local.len());
    for (list, items) in [(PRIMARY_LIST, primary), (LOCAL_LIST, local)] {
        for (index, entry) in items.into_iter().enumerate() {
            definitions.push(convert_definition(entry, &format!("{list}[{index}]"))?);
        }
    }

    let volumes = entries(raw.volumes, VOLUMES_LIST)?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let v: RawVolume = serde_json::from_value(entry)
                .map_err(|e| malformed(&format!("{VOLUMES_LIST}[{index}]"), e.to_string()))?;
            Ok(VolumeDeclaration {
                name: v.name,
                source_path: v.host.source_path,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let descriptor = Descriptor {
        definitions,
        volumes,
    };
    validator::validate(&descriptor)?;
    tracing::debug!(
        containers = descriptor.definitions.len(),
        volumes = descriptor.volumes.len(),
        "descriptor parsed"
    );
    Ok(descriptor)
}

fn malformed(definition: &str, message: impl Into<String>) -> BerthError {
    BerthError::MalformedDescriptor {
        definition: definition.to_owned(),
        message: message.into(),
    }
}

/// Unpacks a top-level list. Absent and `null` both mean empty.
fn entries(value: Option<Value>, list: &str) -> Result<Vec<Value>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(malformed(list, format!("expected a list, found {other}"))),
    }
}

fn convert_definition(entry: Value, position: &str) -> Result<ContainerDefinition> {
    let label = entry
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| position.to_owned(), |n| format!("\"{n}\""));

    let raw: RawDefinition =
        serde_json::from_value(entry).map_err(|e| malformed(&label, e.to_string()))?;

    let name = raw
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| malformed(&label, "missing required field \"name\""))?;
    let image = raw
        .image
        .ok_or_else(|| malformed(&label, "missing required field \"image\""))?;

    let port_mappings = raw
        .port_mappings
        .unwrap_or_default()
        .into_iter()
        .map(|p| match (p.host_port, p.container_port) {
            (Some(host_port), Some(container_port)) => Ok(PortMapping {
                host_port,
                container_port,
            }),
            _ => Err(malformed(
                &label,
                "port mapping needs both \"hostPort\" and \"containerPort\"",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let mount_points = raw
        .mount_points
        .unwrap_or_default()
        .into_iter()
        .map(|m| match (m.source_volume, m.container_path) {
            (Some(source_volume), Some(container_path)) => Ok(MountPoint {
                source_volume,
                container_path,
                read_only: m.read_only,
            }),
            _ => Err(malformed(
                &label,
                "mount point needs both \"sourceVolume\" and \"containerPath\"",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut environment = BTreeMap::new();
    for var in raw.environment.unwrap_or_default() {
        let Some(var_name) = var.name else {
            return Err(malformed(&label, "environment entry without \"name\""));
        };
        let value = var
            .value
            .as_ref()
            .and_then(scalar_to_string)
            .ok_or_else(|| {
                malformed(
                    &label,
                    format!("environment variable \"{var_name}\" needs a string, number or boolean value"),
                )
            })?;
        let _ = environment.insert(var_name, value);
    }

    Ok(ContainerDefinition {
        name,
        image,
        command: raw.command.unwrap_or_default(),
        links: raw.links.unwrap_or_default(),
        port_mappings,
        mount_points,
        environment,
        privileged: raw.privileged,
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> Result<Descriptor> {
        from_value(value)
    }

    #[test]
    fn parse_minimal_definition_defaults_optional_fields() {
        let descriptor = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{ "name": "web", "image": "nginx" }]
        }))
        .expect("should parse");

        let web = &descriptor.definitions[0];
        assert_eq!(web.name, "web");
        assert_eq!(web.image, "nginx");
        assert!(web.command.is_empty());
        assert!(web.links.is_empty());
        assert!(web.port_mappings.is_empty());
        assert!(web.mount_points.is_empty());
        assert!(web.environment.is_empty());
        assert_eq!(web.privileged, None);
    }

    #[test]
    fn parse_null_optional_fields_as_absent() {
        for field in [
            "command",
            "links",
            "portMappings",
            "mountPoints",
            "environment",
            "privileged",
        ] {
            let mut def = json!({ "name": "web", "image": "nginx" });
            def[field] = Value::Null;
            let descriptor = parse(json!({
                "AWSEBDockerrunVersion": 2,
                "containerDefinitions": [def]
            }))
            .unwrap_or_else(|e| panic!("{field}: null should parse: {e}"));

            let web = &descriptor.definitions[0];
            assert!(web.command.is_empty(), "{field}");
            assert!(web.links.is_empty(), "{field}");
            assert!(web.port_mappings.is_empty(), "{field}");
            assert!(web.mount_points.is_empty(), "{field}");
            assert!(web.environment.is_empty(), "{field}");
            assert_eq!(web.privileged, None, "{field}");
        }
    }

    #[test]
    fn parse_null_top_level_lists_as_empty() {
        let descriptor = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": null,
            "localContainerDefinitions": null,
            "volumes": null
        }))
        .expect("should parse");
        assert!(descriptor.definitions.is_empty());
        assert!(descriptor.volumes.is_empty());
    }

    #[test]
    fn parse_mistyped_top_level_list_names_it() {
        for list in ["containerDefinitions", "localContainerDefinitions", "volumes"] {
            let mut doc = json!({ "AWSEBDockerrunVersion": 2 });
            doc[list] = json!("oops");
            let err = parse(doc).unwrap_err();
            assert!(
                matches!(err, BerthError::MalformedDescriptor { ref definition, .. } if definition == list),
                "{list}: got {err}"
            );
        }
    }

    #[test]
    fn parse_incomplete_volume_names_entry() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "volumes": [
                { "name": "ok", "host": { "sourcePath": "/srv" } },
                { "name": "broken", "host": {} }
            ]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            BerthError::MalformedDescriptor { ref definition, .. } if definition == "volumes[1]"
        ));
    }

    #[test]
    fn parse_non_object_document_is_malformed() {
        let err = parse(json!("not a descriptor")).unwrap_err();
        assert!(matches!(err, BerthError::MalformedDescriptor { .. }));
    }

    #[test]
    fn parse_concatenates_primary_then_local_definitions() {
        let descriptor = parse(json!({
            "AWSEBDockerrunVersion": "2",
            "localContainerDefinitions": [
                { "name": "local-a", "image": "x" },
                { "name": "local-b", "image": "x" }
            ],
            "containerDefinitions": [
                { "name": "one", "image": "x" },
                { "name": "two", "image": "x" }
            ]
        }))
        .expect("should parse");

        let names: Vec<_> = descriptor.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "local-a", "local-b"]);
    }

    #[test]
    fn parse_full_definition() {
        let descriptor = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "volumes": [
                { "name": "php-app", "host": { "sourcePath": "/var/app/current/php-app" } }
            ],
            "containerDefinitions": [{
                "name": "nginx-proxy",
                "image": "nginx",
                "command": ["nginx", "-g", "daemon off;"],
                "links": ["php-app"],
                "portMappings": [{ "hostPort": 80, "containerPort": 8080 }],
                "mountPoints": [
                    { "sourceVolume": "php-app", "containerPath": "/var/www/html", "readOnly": true },
                    { "sourceVolume": "awseb-logs-nginx-proxy", "containerPath": "/var/log/nginx" }
                ],
                "environment": [
                    { "name": "a", "value": 1000 },
                    { "name": "e", "value": "f" },
                    { "name": "debug", "value": true }
                ],
                "privileged": true
            }]
        }))
        .expect("should parse");

        assert_eq!(
            descriptor.volumes,
            vec![VolumeDeclaration {
                name: "php-app".into(),
                source_path: "/var/app/current/php-app".into(),
            }]
        );

        let def = &descriptor.definitions[0];
        assert_eq!(def.command, vec!["nginx", "-g", "daemon off;"]);
        assert_eq!(def.links, vec!["php-app"]);
        assert_eq!(def.port_mappings[0].to_string(), "80:8080");
        assert!(def.mount_points[0].read_only);
        assert!(!def.mount_points[1].read_only);
        assert_eq!(def.environment.get("a").map(String::as_str), Some("1000"));
        assert_eq!(def.environment.get("e").map(String::as_str), Some("f"));
        assert_eq!(def.environment.get("debug").map(String::as_str), Some("true"));
        assert_eq!(def.privileged, Some(true));
    }

    #[test]
    fn parse_missing_name_identifies_position() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{ "name": "ok", "image": "x" }],
            "localContainerDefinitions": [{ "image": "x" }]
        }))
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("localContainerDefinitions[0]"), "got: {msg}");
        assert!(msg.contains("\"name\""), "got: {msg}");
    }

    #[test]
    fn parse_missing_image_identifies_name() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{ "name": "db" }]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            BerthError::MalformedDescriptor { ref definition, .. } if definition == "\"db\""
        ));
    }

    #[test]
    fn parse_mistyped_field_is_malformed() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{ "name": "db", "image": "x", "links": "web" }]
        }))
        .unwrap_err();
        assert!(matches!(err, BerthError::MalformedDescriptor { .. }));
    }

    #[test]
    fn parse_incomplete_port_mapping_fails() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{
                "name": "web", "image": "x",
                "portMappings": [{ "containerPort": 80 }]
            }]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("hostPort"));
    }

    #[test]
    fn parse_object_env_value_fails() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 2,
            "containerDefinitions": [{
                "name": "web", "image": "x",
                "environment": [{ "name": "a", "value": { "nested": 1 } }]
            }]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn parse_rejects_unsupported_version() {
        let err = parse(json!({
            "AWSEBDockerrunVersion": 1,
            "containerDefinitions": []
        }))
        .unwrap_err();
        assert!(matches!(err, BerthError::UnsupportedDescriptorVersion { .. }));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = parse_descriptor("{ not json").unwrap_err();
        assert!(matches!(err, BerthError::Serialization { .. }));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Dockerrun.aws.json");
        let err = load_descriptor(&path).unwrap_err();
        assert!(matches!(err, BerthError::Io { .. }));
        assert!(err.to_string().contains("Dockerrun.aws.json"));
    }
}
