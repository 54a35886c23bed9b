//! Shared fixtures for integration testing.

use std::fs;
use std::path::{Path, PathBuf};

use failover::config::LoadOptions;
use tempfile::TempDir;

/// The required parameters with no usable default.
pub const REQUIRED: &str = "\
role = master
peer_host = node-b
peer_port = 4997
";

/// A throwaway `/etc` with a config file, `drbd.d`, `init.d` and `plugins/`.
pub struct Fixture {
    root: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["drbd.d", "init.d", "plugins/quorum", "plugins/switcher"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn config_file(&self) -> PathBuf {
        self.path().join("failover.conf")
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.path().join("drbd.d")
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.path().join("plugins")
    }

    pub fn write_config(&self, contents: &str) -> &Self {
        fs::write(self.config_file(), contents).unwrap();
        self
    }

    pub fn add_resource(&self, file: &str, resource: &str) -> &Self {
        let body = format!("resource {} {{\n  protocol C;\n}}\n", resource);
        fs::write(self.resource_dir().join(file), body).unwrap();
        self
    }

    pub fn add_service(&self, name: &str) -> &Self {
        let path = self.path().join("init.d").join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        self
    }

    pub fn add_plugin(&self, kind: &str, name: &str) -> &Self {
        let path = self.plugin_dir().join(kind).join(format!("{}.py", name));
        fs::write(path, "").unwrap();
        self
    }

    pub fn options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_config_file(self.config_file())
            .with_resource_dir(self.resource_dir())
            .with_init_dir(self.path().join("init.d"))
    }
}
