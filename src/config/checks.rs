//! Cross-checks against filesystem state.
//!
//! # Responsibilities
//! - Init scripts named in `services` exist and are executable
//! - Every declared DRBD resource has a resource-definition file
//! - Plugin directory and plugin files exist
//!
//! # Design Decisions
//! - Checks return `CheckError`; they never exit the process
//! - An unset plugin name passes, plugins are optional features
//! - Resources on disk that were not declared are ignored

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::configuration::Configuration;
use crate::config::discovery::discover_resources;
use crate::config::schema::{ConfigValue, DEFAULT_PLUGIN_DIR};

/// Failure reported by a cross-check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Service '{0}' does not exist")]
    MissingService(String),

    #[error("The following DRBD resources do not exist: {}", quoted_list(.0))]
    MissingResources(Vec<String>),

    #[error("{kind} plugin '{name}' does not exist.")]
    MissingPlugin { kind: PluginKind, name: String },

    #[error("Directory '{}' does not exist.", .0.display())]
    MissingDirectory(PathBuf),

    #[error("File '{}' does not exist.", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to scan resource definitions in '{}': {reason}", .path.display())]
    Discovery { path: PathBuf, reason: String },
}

/// Render names as `['a', 'b']`.
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Plugin families the daemon can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Quorum,
    Switcher,
}

impl PluginKind {
    /// Subdirectory of the plugin directory holding this family.
    pub fn subdir(self) -> &'static str {
        match self {
            PluginKind::Quorum => "quorum",
            PluginKind::Switcher => "switcher",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginKind::Quorum => write!(f, "Quorum"),
            PluginKind::Switcher => write!(f, "Switcher"),
        }
    }
}

/// State a cross-check may consult besides the value itself.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Parameters accepted so far (defaults for everything not yet seen).
    pub config: &'a Configuration,

    /// Directory holding DRBD resource-definition files.
    pub resource_dir: &'a Path,

    /// Directory holding init scripts.
    pub init_dir: &'a Path,

    /// Extension of plugin files, without the dot.
    pub plugin_extension: &'a str,
}

impl<'a> CheckContext<'a> {
    /// Plugin directory as currently resolved.
    pub fn plugin_dir(&self) -> &'a Path {
        Path::new(self.config.string("plugin_dir").unwrap_or(DEFAULT_PLUGIN_DIR))
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: &'a Configuration) -> Self {
        Self {
            config,
            resource_dir: Path::new("/nonexistent/drbd.d"),
            init_dir: Path::new("/nonexistent/init.d"),
            plugin_extension: "py",
        }
    }
}

pub fn check_services(value: &ConfigValue, ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    for service in value.as_list().unwrap_or_default() {
        if !is_executable(&ctx.init_dir.join(service)) {
            return Err(CheckError::MissingService(service.clone()));
        }
    }
    Ok(())
}

pub fn check_drbd_resources(
    value: &ConfigValue,
    ctx: &CheckContext<'_>,
) -> Result<(), CheckError> {
    let mut missing = value.as_list().unwrap_or_default().to_vec();

    for resource in discover_resources(ctx.resource_dir)? {
        if let Some(pos) = missing.iter().position(|r| *r == resource) {
            missing.remove(pos);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckError::MissingResources(missing))
    }
}

pub fn check_directory(value: &ConfigValue, _ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    match value.as_str() {
        Some(dir) => ensure_directory(Path::new(dir)),
        None => Ok(()),
    }
}

pub fn check_quorum_plugin(value: &ConfigValue, ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    check_plugin(PluginKind::Quorum, value, ctx)
}

pub fn check_switcher_plugin(
    value: &ConfigValue,
    ctx: &CheckContext<'_>,
) -> Result<(), CheckError> {
    check_plugin(PluginKind::Switcher, value, ctx)
}

fn check_plugin(
    kind: PluginKind,
    value: &ConfigValue,
    ctx: &CheckContext<'_>,
) -> Result<(), CheckError> {
    let Some(name) = value.as_str() else {
        return Ok(());
    };

    let path = ctx
        .plugin_dir()
        .join(kind.subdir())
        .join(format!("{}.{}", name, ctx.plugin_extension));

    if path.is_file() {
        Ok(())
    } else {
        Err(CheckError::MissingPlugin {
            kind,
            name: name.to_string(),
        })
    }
}

/// Fails unless `path` is an existing regular file.
pub fn ensure_file(path: &Path) -> Result<(), CheckError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CheckError::MissingFile(path.to_path_buf()))
    }
}

/// Fails unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<(), CheckError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CheckError::MissingDirectory(path.to_path_buf()))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}
