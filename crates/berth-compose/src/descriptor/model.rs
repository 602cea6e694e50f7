//! Typed model of a parsed multi-container descriptor.

use std::collections::BTreeMap;
use std::fmt;

/// A validated descriptor document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Container definitions, primary list first, then local-only ones.
    pub definitions: Vec<ContainerDefinition>,
    /// Named volumes declared at the top level.
    pub volumes: Vec<VolumeDeclaration>,
}

/// One container in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDefinition {
    /// Container name, unique within the descriptor.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Command override, empty if absent.
    pub command: Vec<String>,
    /// Names of other containers in the same descriptor.
    pub links: Vec<String>,
    /// Host to container port mappings.
    pub port_mappings: Vec<PortMapping>,
    /// Logical volumes mounted into the container.
    pub mount_points: Vec<MountPoint>,
    /// Variables embedded in the descriptor. Lowest priority layer.
    pub environment: BTreeMap<String, String>,
    /// Privileged flag, passed through when present.
    pub privileged: Option<bool>,
}

/// A host port published to a container port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    /// Port on the host.
    pub host_port: u16,
    /// Port inside the container.
    pub container_port: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_port, self.container_port)
    }
}

/// A logical volume mounted at a container path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPoint {
    /// Logical volume name.
    pub source_volume: String,
    /// Mount path inside the container.
    pub container_path: String,
    /// Whether the mount is read-only.
    pub read_only: bool,
}

/// A named volume backed by a host path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeDeclaration {
    /// Logical volume name referenced by mount points.
    pub name: String,
    /// Host source path as written in the descriptor.
    pub source_path: String,
}
