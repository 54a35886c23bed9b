//! DRBD resource discovery.
//!
//! Each `*.res` file in the resource directory declares one resource. The
//! first `resource <name>` line of a file is authoritative; files without
//! one contribute nothing.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::checks::CheckError;

/// Extension of resource-definition files.
pub const RESOURCE_EXTENSION: &str = "res";

fn resource_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ \t]*resource[ \t]+([a-z0-9]+).*$").expect("resource pattern is valid")
    })
}

/// Extract the resource identifier declared in one file's contents.
pub fn declared_resource(contents: &str) -> Option<&str> {
    contents
        .lines()
        .find_map(|line| resource_line().captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scan `dir` for resource-definition files, in path order.
pub fn discover_resources(dir: &Path) -> Result<Vec<String>, CheckError> {
    let discovery_error = |reason: String| CheckError::Discovery {
        path: dir.to_path_buf(),
        reason,
    };

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        RESOURCE_EXTENSION
    );
    // hidden files (editor backups, disabled definitions) never count
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let entries =
        glob::glob_with(&pattern, options).map_err(|e| discovery_error(e.to_string()))?;

    let mut resources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| discovery_error(e.to_string()))?;
        let contents = fs::read_to_string(&path)
            .map_err(|e| discovery_error(format!("{}: {}", path.display(), e)))?;

        match declared_resource(&contents) {
            Some(resource) => {
                tracing::debug!(file = %path.display(), resource, "Discovered DRBD resource");
                resources.push(resource.to_string());
            }
            None => {
                tracing::debug!(file = %path.display(), "No resource declaration found");
            }
        }
    }

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_resource() {
        let contents = "# shared storage\n  resource r0 {\n  on alpha {}\n}\nresource r9 {}\n";
        assert_eq!(declared_resource(contents), Some("r0"));

        assert_eq!(declared_resource("\tresource\tdata1 {"), Some("data1"));
        assert_eq!(declared_resource("resources r0 {"), None);
        assert_eq!(declared_resource("# resource r0"), None);
        assert_eq!(declared_resource(""), None);
    }

    #[test]
    fn test_discover_resources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.res"), "resource r2 {\n}\n").unwrap();
        fs::write(dir.path().join("a.res"), "resource r1 {\n}\n").unwrap();
        fs::write(dir.path().join("global_common.conf"), "resource r7 {\n}\n").unwrap();
        fs::write(dir.path().join("empty.res"), "# nothing here\n").unwrap();

        let resources = discover_resources(dir.path()).unwrap();
        assert_eq!(resources, vec!["r1", "r2"]);
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".r2.res"), "resource r2 {\n}\n").unwrap();
        fs::write(dir.path().join("r1.res"), "resource r1 {\n}\n").unwrap();

        let resources = discover_resources(dir.path()).unwrap();
        assert_eq!(resources, vec!["r1"]);
    }

    #[test]
    fn test_directory_name_is_not_a_pattern() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("drbd[1]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.res"), "resource r1 {\n}\n").unwrap();

        let resources = discover_resources(&dir).unwrap();
        assert_eq!(resources, vec!["r1"]);
    }
}
