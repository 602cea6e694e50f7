//! Fixed names, prefixes, and formats shared by the core and the CLI.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "berth";

/// Per-project directory holding generated files and local state.
pub const STATE_DIR_NAME: &str = ".berth";

/// Default file name of the multi-container descriptor.
pub const DESCRIPTOR_FILENAME: &str = "Dockerrun.aws.json";

/// Only descriptor version understood by the translator.
pub const SUPPORTED_DESCRIPTOR_VERSION: &str = "2";

/// File name of the generated orchestration document.
pub const COMPOSE_FILENAME: &str = "docker-compose.yml";

/// File name of the persisted local state (setenv variables).
pub const LOCAL_STATE_FILENAME: &str = ".localstate";

/// Directory under the state directory that holds all logs.
pub const LOGS_DIR_NAME: &str = "logs";

/// Directory under [`LOGS_DIR_NAME`] that holds per-run local logs.
pub const HOST_LOGS_DIR_NAME: &str = "local";

/// Symlink in the local log root pointing at the newest run directory.
pub const LATEST_LOGS_LINK: &str = "latest";

/// `chrono` format used to name per-run host log directories.
pub const HOST_LOG_DIR_FORMAT: &str = "%y%m%d_%H%M%S%6f";

/// Application root inside the deployed container. Volume source paths under
/// it are rewritten relative to the local project root.
pub const APP_ROOT_PREFIX: &str = "/var/app/current/";

/// Logical volume name prefix marking a log volume.
pub const LOG_VOLUME_PREFIX: &str = "awseb-logs-";
