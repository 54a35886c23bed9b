//! Constraint evaluation.
//!
//! Each parameter carries one [`Rule`]. Rules form a closed set: a numeric
//! comparison against a literal, membership in a fixed set of strings, or a
//! named cross-check function that may consult the filesystem and the
//! parameters already accepted.

use std::fmt;

use thiserror::Error;

use crate::config::checks::{CheckContext, CheckError};
use crate::config::schema::ConfigValue;

/// Signature shared by every cross-check.
pub type CheckFn = fn(&ConfigValue, &CheckContext<'_>) -> Result<(), CheckError>;

/// Anything that can accept or reject a coerced value.
pub trait Validate {
    fn validate(&self, value: &ConfigValue, ctx: &CheckContext<'_>) -> Result<(), RuleViolation>;
}

/// Why a rule rejected a value.
#[derive(Debug, Error)]
pub enum RuleViolation {
    /// A comparison or membership rule failed; carries the rule description.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Check(#[from] CheckError),
}

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// A named reference to a cross-check function.
#[derive(Debug, Clone, Copy)]
pub struct CustomCheck {
    pub name: &'static str,
    pub check: CheckFn,
}

impl CustomCheck {
    pub const fn new(name: &'static str, check: CheckFn) -> Self {
        Self { name, check }
    }
}

/// Comparison literal together with its text as written in the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub value: f64,
    pub text: &'static str,
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Build a [`Threshold`] from a numeric literal, keeping its spelling.
#[macro_export]
macro_rules! threshold {
    ($lit:literal) => {
        $crate::config::validation::Threshold {
            value: $lit as f64,
            text: stringify!($lit),
        }
    };
}

/// Constraint attached to a parameter.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Always passes.
    None,
    /// Numeric comparison against a literal.
    Compare(CompareOp, Threshold),
    /// The string must be one of a fixed set.
    MembershipIn(&'static [&'static str]),
    /// Delegates to a cross-check.
    Custom(CustomCheck),
}

impl Rule {
    fn reject(&self) -> RuleViolation {
        RuleViolation::Rejected(self.to_string())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::None => write!(f, "none"),
            Rule::Compare(op, literal) => write!(f, "{} {}", op.symbol(), literal),
            Rule::MembershipIn(allowed) => {
                write!(f, "in [")?;
                for (i, item) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", item)?;
                }
                write!(f, "]")
            }
            Rule::Custom(custom) => write!(f, "{}(value)", custom.name),
        }
    }
}

impl Validate for Rule {
    fn validate(&self, value: &ConfigValue, ctx: &CheckContext<'_>) -> Result<(), RuleViolation> {
        match self {
            Rule::None => Ok(()),
            Rule::Compare(op, literal) => {
                let number = match value {
                    ConfigValue::Integer(n) => *n as f64,
                    ConfigValue::Float(x) => *x,
                    _ => return Err(self.reject()),
                };
                if op.apply(one_decimal(number), literal.value) {
                    Ok(())
                } else {
                    Err(self.reject())
                }
            }
            Rule::MembershipIn(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|item| *item == s) => Ok(()),
                _ => Err(self.reject()),
            },
            Rule::Custom(custom) => (custom.check)(value, ctx).map_err(RuleViolation::from),
        }
    }
}

/// Rounds to the precision comparisons are evaluated at.
fn one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::checks::CheckContext;
    use crate::config::schema::Schema;

    fn validate(rule: Rule, value: ConfigValue) -> Result<(), RuleViolation> {
        let config = Schema::builtin().defaults();
        let ctx = CheckContext::for_tests(&config);
        rule.validate(&value, &ctx)
    }

    #[test]
    fn test_compare() {
        let rule = Rule::Compare(CompareOp::Gt, crate::threshold!(1024));
        assert!(validate(rule, ConfigValue::Integer(2000)).is_ok());
        assert!(validate(rule, ConfigValue::Integer(1024)).is_err());
        assert!(validate(rule, ConfigValue::Integer(500)).is_err());
        assert!(validate(rule, ConfigValue::Unset).is_err());
    }

    #[test]
    fn test_compare_rounds_to_one_decimal() {
        let rule = Rule::Compare(CompareOp::Ge, crate::threshold!(0.1));
        assert!(validate(rule, ConfigValue::Float(0.14)).is_ok());
        assert!(validate(rule, ConfigValue::Float(0.04)).is_err());
    }

    #[test]
    fn test_membership() {
        let rule = Rule::MembershipIn(&["master", "slave"]);
        assert!(validate(rule, ConfigValue::String("master".into())).is_ok());
        assert!(validate(rule, ConfigValue::String("slave".into())).is_ok());
        assert!(validate(rule, ConfigValue::String("unknown".into())).is_err());
        assert!(validate(rule, ConfigValue::Unset).is_err());
    }

    #[test]
    fn test_rule_descriptions() {
        assert_eq!(Rule::Compare(CompareOp::Gt, crate::threshold!(1024)).to_string(), "> 1024");
        assert_eq!(Rule::Compare(CompareOp::Ge, crate::threshold!(0.1)).to_string(), ">= 0.1");
        assert_eq!(Rule::Compare(CompareOp::Gt, crate::threshold!(0.0)).to_string(), "> 0.0");
        assert_eq!(
            Rule::MembershipIn(&["master", "slave"]).to_string(),
            "in ['master', 'slave']"
        );

        let err = validate(Rule::MembershipIn(&["a"]), ConfigValue::Unset).unwrap_err();
        assert_eq!(err.to_string(), "in ['a']");
    }

    #[test]
    fn test_custom_check_is_called() {
        fn always_fails(_: &ConfigValue, _: &CheckContext<'_>) -> Result<(), CheckError> {
            Err(CheckError::MissingService("nope".into()))
        }

        let rule = Rule::Custom(CustomCheck::new("always_fails", always_fails));
        assert_eq!(rule.to_string(), "always_fails(value)");

        let err = validate(rule, ConfigValue::Unset).unwrap_err();
        assert!(matches!(err, RuleViolation::Check(CheckError::MissingService(_))));
    }
}
