//! The validated configuration handed to the rest of the daemon.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::config::schema::ConfigValue;

/// Role this node starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Role::Master),
            "slave" => Ok(Role::Slave),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Slave => write!(f, "slave"),
        }
    }
}

/// Parameter name to value, ordered by name.
///
/// Only the loader mutates a `Configuration`; once `load_config` returns it
/// is read-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<&'static str, ConfigValue>,
}

impl Configuration {
    pub(crate) fn from_entries(
        entries: impl IntoIterator<Item = (&'static str, ConfigValue)>,
    ) -> Self {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    pub(crate) fn set(&mut self, name: &'static str, value: ConfigValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ConfigValue::as_integer)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ConfigValue::as_float)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(ConfigValue::as_list)
    }

    /// A float parameter interpreted as seconds.
    pub fn duration(&self, name: &str) -> Option<Duration> {
        self.float(name)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn role(&self) -> Option<Role> {
        self.string("role").and_then(|s| s.parse().ok())
    }

    /// Entries sorted by parameter name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One `name: value` row per parameter, sorted by name.
    pub fn render_table(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{:<16}: {}\n", name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Schema;

    #[test]
    fn test_typed_accessors() {
        let mut config = Schema::builtin().defaults();
        config.set("role", ConfigValue::String("slave".into()));

        assert_eq!(config.role(), Some(Role::Slave));
        assert_eq!(config.duration("interval"), Some(Duration::from_millis(200)));
        assert_eq!(config.duration("port"), None);
        assert_eq!(config.integer("timeout"), None);
        assert!(config.get("foo").is_none());
    }

    #[test]
    fn test_render_table_sorted() {
        let table = Schema::builtin().defaults().render_table();
        let names: Vec<_> = table
            .lines()
            .map(|line| line.split(':').next().unwrap().trim())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(table.contains("port            : 4997\n"));
        assert!(table.contains("role            : unset\n"));
    }

    #[test]
    fn test_json_view() {
        let json = serde_json::to_value(Schema::builtin().defaults()).unwrap();

        assert_eq!(json["port"], 4997);
        assert_eq!(json["initdead"], 5.0);
        assert!(json["role"].is_null());
        assert_eq!(json["services"], serde_json::json!([]));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("master".parse::<Role>(), Ok(Role::Master));
        assert!("MASTER".parse::<Role>().is_err());
        assert_eq!(Role::Slave.to_string(), "slave");
    }
}
