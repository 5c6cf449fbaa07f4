//! Deployment mode.

use std::fmt;
use std::str::FromStr;

use crate::core::constants::PROD_MODE;
use crate::error::ConfigError;

/// Deployment mode.
///
/// Production contributes nothing to file and secret names; every other mode
/// contributes its label verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Prod,
    /// A non-production label such as `dev` or `staging`.
    NonProd(String),
}

impl Mode {
    /// The name suffix this mode contributes, if any.
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Self::Prod => None,
            Self::NonProd(label) => Some(label.as_str()),
        }
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }

    pub fn as_str(&self) -> &str {
        self.suffix().unwrap_or(PROD_MODE)
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    /// Parse a mode label.
    ///
    /// Labels must be lowercase ASCII letters, digits and inner hyphens so
    /// they are safe in both file names and secret names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label == PROD_MODE {
            return Ok(Self::Prod);
        }

        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "mode",
            reason: format!("'{}': {}", label, reason),
        };

        if label.is_empty() {
            return Err(invalid("cannot be empty"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("cannot start or end with '-'"));
        }
        if let Some(ch) = label
            .chars()
            .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-'))
        {
            return Err(invalid(&format!(
                "invalid character '{}'; only a-z, 0-9 and '-' are allowed",
                ch
            )));
        }

        Ok(Self::NonProd(label.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
