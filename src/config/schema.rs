//! Configuration schema definitions.
//!
//! This module defines the fixed table of parameters the failover daemon
//! understands, together with the typed value each one resolves to.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::config::checks;
use crate::config::configuration::Configuration;
use crate::config::validation::{CompareOp, CustomCheck, Rule};
use crate::threshold;

/// Default plugin directory, relative to the daemon's working directory.
pub const DEFAULT_PLUGIN_DIR: &str = "plugins/";

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Float,
    String,
    StringList,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Integer => write!(f, "int"),
            ParamType::Float => write!(f, "float"),
            ParamType::String => write!(f, "str"),
            ParamType::StringList => write!(f, "list"),
        }
    }
}

/// A coerced parameter value.
///
/// `Unset` is the "no value" sentinel. It is distinct from zero and from
/// the empty string, and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Integer(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
    Unset,
}

impl ConfigValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, ConfigValue::Unset)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::StringList(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Integer(n) => write!(f, "{}", n),
            // Debug keeps the trailing ".0" on whole numbers
            ConfigValue::Float(x) => write!(f, "{:?}", x),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::StringList(items) => write!(f, "[{}]", items.join(", ")),
            ConfigValue::Unset => write!(f, "unset"),
        }
    }
}

/// Compile-time default for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Float(f64),
    Str(&'static str),
    EmptyList,
    Unset,
}

impl DefaultValue {
    pub fn to_value(self) -> ConfigValue {
        match self {
            DefaultValue::Integer(n) => ConfigValue::Integer(n),
            DefaultValue::Float(x) => ConfigValue::Float(x),
            DefaultValue::Str(s) => ConfigValue::String(s.to_string()),
            DefaultValue::EmptyList => ConfigValue::StringList(Vec::new()),
            DefaultValue::Unset => ConfigValue::Unset,
        }
    }
}

/// Definition of a single configuration parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    /// Key as it appears in the config file.
    pub name: &'static str,

    /// Type the raw string is coerced to.
    pub kind: ParamType,

    /// Value used when the file does not mention the parameter.
    pub default: DefaultValue,

    /// Constraint applied to every occurrence in the file.
    pub rule: Rule,

    /// Optional parameters may remain unset after loading.
    pub optional: bool,
}

const fn param(
    name: &'static str,
    kind: ParamType,
    default: DefaultValue,
    rule: Rule,
) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        default,
        rule,
        optional: false,
    }
}

const fn optional(spec: ParameterSpec) -> ParameterSpec {
    ParameterSpec {
        optional: true,
        ..spec
    }
}

const ROLES: &[&str] = &["master", "slave"];

/// Every parameter the daemon understands, in declaration order.
pub static PARAMETERS: [ParameterSpec; 12] = [
    param(
        "port",
        ParamType::Integer,
        DefaultValue::Integer(4997),
        Rule::Compare(CompareOp::Gt, threshold!(1024)),
    ),
    param(
        "role",
        ParamType::String,
        DefaultValue::Unset,
        Rule::MembershipIn(ROLES),
    ),
    param(
        "initdead",
        ParamType::Float,
        DefaultValue::Float(5.0),
        Rule::Compare(CompareOp::Gt, threshold!(0.0)),
    ),
    param("peer_host", ParamType::String, DefaultValue::Unset, Rule::None),
    param(
        "peer_port",
        ParamType::Integer,
        DefaultValue::Unset,
        Rule::Compare(CompareOp::Gt, threshold!(1024)),
    ),
    param(
        "timeout",
        ParamType::Float,
        DefaultValue::Float(2.0),
        Rule::Compare(CompareOp::Ge, threshold!(0.1)),
    ),
    param(
        "interval",
        ParamType::Float,
        DefaultValue::Float(0.2),
        Rule::Compare(CompareOp::Ge, threshold!(0.2)),
    ),
    param(
        "services",
        ParamType::StringList,
        DefaultValue::EmptyList,
        Rule::Custom(CustomCheck::new("check_services", checks::check_services)),
    ),
    param(
        "drbd_resources",
        ParamType::StringList,
        DefaultValue::EmptyList,
        Rule::Custom(CustomCheck::new(
            "check_drbd_resources",
            checks::check_drbd_resources,
        )),
    ),
    param(
        "plugin_dir",
        ParamType::String,
        DefaultValue::Str(DEFAULT_PLUGIN_DIR),
        Rule::Custom(CustomCheck::new("check_directory", checks::check_directory)),
    ),
    optional(param(
        "quorum_plugin",
        ParamType::String,
        DefaultValue::Unset,
        Rule::Custom(CustomCheck::new(
            "check_quorum_plugin",
            checks::check_quorum_plugin,
        )),
    )),
    optional(param(
        "switcher_plugin",
        ParamType::String,
        DefaultValue::Unset,
        Rule::Custom(CustomCheck::new(
            "check_switcher_plugin",
            checks::check_switcher_plugin,
        )),
    )),
];

/// Read-only registry over a parameter table.
#[derive(Debug)]
pub struct Schema {
    params: &'static [ParameterSpec],
    index: HashMap<&'static str, usize>,
}

impl Schema {
    /// Build a registry over an arbitrary static table.
    pub fn new(params: &'static [ParameterSpec]) -> Self {
        let index = params
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name, i))
            .collect();
        Self { params, index }
    }

    /// The daemon's built-in schema, indexed on first use.
    pub fn builtin() -> &'static Schema {
        static BUILTIN: OnceLock<Schema> = OnceLock::new();
        BUILTIN.get_or_init(|| Schema::new(&PARAMETERS))
    }

    pub fn get(&self, name: &str) -> Option<&'static ParameterSpec> {
        let params = self.params;
        self.index.get(name).map(|&i| &params[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &'static ParameterSpec> {
        self.params.iter()
    }

    /// A configuration holding every parameter's default.
    pub fn defaults(&self) -> Configuration {
        Configuration::from_entries(
            self.params
                .iter()
                .map(|spec| (spec.name, spec.default.to_value())),
        )
    }
}
