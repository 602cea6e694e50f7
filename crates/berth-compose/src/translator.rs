//! Container definition to service translation.
//!
//! Each container definition becomes one service entry: the name is
//! sanitized, links are aliased, ports and volumes are formatted, and the
//! environment is layered as descriptor, then persisted setenv state, then
//! one-shot overrides, with removals applied last.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use berth_common::error::{BerthError, Result};
use berth_common::types::{ServiceName, sanitize};

use crate::descriptor::model::{ContainerDefinition, MountPoint};
use crate::envvars::EnvironmentOverlay;
use crate::volume::{DirectoryMaker, MountSource, VolumeMap, classify_mount};

/// Suffix appended to a read-only volume specification.
const READ_ONLY_SUFFIX: &str = ":ro";

/// One translated service, before serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Sanitized service name.
    pub service_name: ServiceName,
    /// Image reference.
    pub image: String,
    /// Command override, empty if absent.
    pub command: Vec<String>,
    /// `host:container` port strings in descriptor order.
    pub ports: Vec<String>,
    /// `alias:original` link strings in descriptor order.
    pub links: Vec<String>,
    /// `host:container[:ro]` volume strings for resolved mount points.
    pub volumes: Vec<String>,
    /// Final merged and filtered environment.
    pub environment: BTreeMap<String, String>,
    /// Privileged flag, if the descriptor set one.
    pub privileged: Option<bool>,
}

/// Translates container definitions for a single run.
pub struct Translator<'a> {
    volume_map: &'a VolumeMap,
    host_log: Option<&'a Path>,
    overlay: EnvironmentOverlay,
    dirs: &'a dyn DirectoryMaker,
}

impl<'a> Translator<'a> {
    /// Creates a translator.
    ///
    /// `persisted` is the setenv layer and `cli` the one-shot layer; `cli`
    /// takes priority. `host_log` is the run's host log directory, if one was
    /// allocated.
    pub fn new(
        volume_map: &'a VolumeMap,
        host_log: Option<&'a Path>,
        persisted: &EnvironmentOverlay,
        cli: &EnvironmentOverlay,
        dirs: &'a dyn DirectoryMaker,
    ) -> Self {
        Self {
            volume_map,
            host_log,
            overlay: persisted.merge(cli),
            dirs,
        }
    }

    /// Translates every definition, preserving order.
    ///
    /// Log directories are only created once every definition has translated.
    ///
    /// # Errors
    ///
    /// Returns an error if a name sanitizes to nothing, two names collide
    /// after sanitization, or a log directory cannot be created.
    pub fn translate(&self, definitions: &[ContainerDefinition]) -> Result<Vec<ServiceEntry>> {
        let mut entries = Vec::with_capacity(definitions.len());
        let mut log_dirs = Vec::new();
        let mut owners: BTreeMap<ServiceName, &str> = BTreeMap::new();

        for def in definitions {
            let entry = self.translate_one(def, &mut log_dirs)?;
            if let Some(first) = owners.insert(entry.service_name.clone(), &def.name) {
                return Err(BerthError::DuplicateService {
                    service: entry.service_name.into_string(),
                    first: first.to_owned(),
                    second: def.name.clone(),
                });
            }
            entries.push(entry);
        }

        for dir in &log_dirs {
            self.dirs.create_dir_all(dir)?;
        }
        tracing::info!(services = entries.len(), "translated container definitions");
        Ok(entries)
    }

    fn translate_one(
        &self,
        def: &ContainerDefinition,
        log_dirs: &mut Vec<PathBuf>,
    ) -> Result<ServiceEntry> {
        let service_name = ServiceName::sanitize(&def.name)?;

        let links = def
            .links
            .iter()
            .map(|link| format!("{}:{link}", sanitize(link)))
            .collect();
        let ports = def.port_mappings.iter().map(ToString::to_string).collect();

        let environment = EnvironmentOverlay::from_additions(def.environment.clone())
            .merge(&self.overlay)
            .filtered()
            .into_additions();

        let volumes = def
            .mount_points
            .iter()
            .filter_map(|mp| self.volume_spec(&def.name, mp, log_dirs))
            .collect();

        Ok(ServiceEntry {
            service_name,
            image: def.image.clone(),
            command: def.command.clone(),
            ports,
            links,
            volumes,
            environment,
            privileged: def.privileged,
        })
    }

    fn volume_spec(
        &self,
        container: &str,
        mount: &MountPoint,
        log_dirs: &mut Vec<PathBuf>,
    ) -> Option<String> {
        let host_path = match classify_mount(&mount.source_volume, self.volume_map, self.host_log)
        {
            MountSource::Declared(path) => path,
            MountSource::Log(path) => {
                if !log_dirs.contains(&path) {
                    log_dirs.push(path.clone());
                }
                path
            }
            MountSource::Unresolved => {
                tracing::debug!(
                    container,
                    volume = %mount.source_volume,
                    "skipping mount point with unresolved volume"
                );
                return None;
            }
        };

        let mut spec = format!("{}:{}", host_path.display(), mount.container_path);
        if mount.read_only {
            spec.push_str(READ_ONLY_SUFFIX);
        }
        Some(spec)
    }
}
