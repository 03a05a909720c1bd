//! Minimal model of Go types for matcher decisions.

use std::fmt;

/// A Go type as far as single-file analysis can see it.
///
/// `Named.pkg` holds the resolved import path of the qualifying package,
/// or `None` for predeclared names and types declared in the file itself.
/// Everything the resolver cannot prove collapses to `Unknown`, which
/// matchers treat as "not established" rather than as a wildcard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GoType {
    Named { pkg: Option<String>, name: String },
    Pointer(Box<GoType>),
    Unknown,
}

impl GoType {
    pub fn named(name: impl Into<String>) -> Self {
        GoType::Named {
            pkg: None,
            name: name.into(),
        }
    }

    pub fn qualified(pkg: impl Into<String>, name: impl Into<String>) -> Self {
        GoType::Named {
            pkg: Some(pkg.into()),
            name: name.into(),
        }
    }

    pub fn pointer(inner: GoType) -> Self {
        GoType::Pointer(Box::new(inner))
    }

    /// Strip one level of pointer indirection, if present.
    pub fn deref(&self) -> &GoType {
        match self {
            GoType::Pointer(inner) => inner,
            other => other,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, GoType::Unknown)
    }

    /// The predeclared `error` interface.
    pub fn is_error(&self) -> bool {
        matches!(self, GoType::Named { pkg: None, name } if name == "error")
    }

    pub fn is_named(&self, pkg: &str, name: &str) -> bool {
        matches!(
            self,
            GoType::Named { pkg: Some(p), name: n } if p == pkg && n == name
        )
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Named { pkg: Some(p), name } => write!(f, "{p}.{name}"),
            GoType::Named { pkg: None, name } => write!(f, "{name}"),
            GoType::Pointer(inner) => write!(f, "*{inner}"),
            GoType::Unknown => write!(f, "<unknown>"),
        }
    }
}
