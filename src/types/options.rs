use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

/// Skip the literal `&nbsp;` / `&nbsp` sequences as whitespace by default
const DEFAULT_LITERAL_NBSP_ENTITIES: bool = true;

/// Resolver configuration
///
/// ```toml
/// literal_nbsp_entities = false
/// max_iterations = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverOptions {
    /// Treat the literal character sequences `&nbsp;` and `&nbsp` as a single
    /// whitespace unit when skipping whitespace after a prefix or before a suffix.
    ///
    /// The no-break space code point itself is always whitespace.
    #[serde(default = "default_literal_nbsp_entities")]
    pub literal_nbsp_entities: bool,

    /// Upper bound for the backtracking loop of a single directive.
    /// When unset, the bound is derived from the size of the document.
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            literal_nbsp_entities: default_literal_nbsp_entities(),
            max_iterations: None,
        }
    }
}

const fn default_literal_nbsp_entities() -> bool {
    DEFAULT_LITERAL_NBSP_ENTITIES
}

impl ResolverOptions {
    /// Parse options from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` for invalid TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load options from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Toml` if it cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
