//! Qualified names identifying every entity of the workspace graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::SYS_PACKAGE;
use crate::error::{AclError, Result};

/// Two-part name `pkg.entity`.
///
/// Ordering is package first, then entity; this is the "alphabetical QName order"
/// used when types are enumerated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QName {
    pkg: String,
    entity: String,
}

impl QName {
    /// Builds a name from its parts. No validation is performed.
    pub fn new(pkg: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            pkg: pkg.into(),
            entity: entity.into(),
        }
    }

    /// Builds a name in the system package.
    pub fn sys(entity: impl Into<String>) -> Self {
        Self::new(SYS_PACKAGE, entity)
    }

    #[must_use]
    pub fn pkg(&self) -> &str {
        &self.pkg
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn is_sys(&self) -> bool {
        self.pkg == SYS_PACKAGE
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pkg, self.entity)
    }
}

impl FromStr for QName {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((pkg, entity))
                if !pkg.is_empty() && !entity.is_empty() && !entity.contains('.') =>
            {
                Ok(Self::new(pkg, entity))
            }
            _ => Err(AclError::invalid(format!("qualified name «{s}»"))),
        }
    }
}

impl TryFrom<String> for QName {
    type Error = AclError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<QName> for String {
    fn from(name: QName) -> Self {
        name.to_string()
    }
}

/// Renders a set of names as `[a, b, c]` for diagnostics.
pub(crate) fn display_names<'a>(names: impl IntoIterator<Item = &'a QName>) -> String {
    let mut out = String::from("[");
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&name.to_string());
    }
    out.push(']');
    out
}
