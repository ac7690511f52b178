use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::instrument;

use crate::{lists, Engine, HebnormError, Registry, RuleSet};

pub const RULES_ENV: &str = "HEBNORM_RULES";
pub const LISTS_DIR_ENV: &str = "HEBNORM_LISTS_DIR";

const DEFAULT_RULES: &str = "rules/rules.yaml";
const DEFAULT_LISTS_DIR: &str = "rules/lists";

/// Where an [`Engine`] gets its rules and word lists.
///
/// Deserializable from YAML; missing keys take their defaults.
///
/// ```yaml
/// rules_path: rules/rules.yaml
/// lists_dir: rules/lists
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub rules_path: PathBuf,
    pub lists_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES),
            lists_dir: PathBuf::from(DEFAULT_LISTS_DIR),
        }
    }
}

impl EngineConfig {
    /// Read [`RULES_ENV`] and [`LISTS_DIR_ENV`], falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    /// Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let defaults = Self::default();
        Self {
            rules_path: var(RULES_ENV).unwrap_or(defaults.rules_path),
            lists_dir: var(LISTS_DIR_ENV).unwrap_or(defaults.lists_dir),
        }
    }

    /// # Errors
    ///
    /// Returns [`HebnormError::Config`] on malformed YAML or unknown keys.
    pub fn from_yaml(input: &str) -> Result<Self, HebnormError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(HebnormError::Config)
    }

    /// # Errors
    ///
    /// Returns [`HebnormError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HebnormError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_yaml(&input)
    }

    /// Compile the rule file, load the list directory and check that every
    /// function the rules name is in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`HebnormError`] if the rule file cannot be read, parsed, or
    /// compiled, or if it references unregistered functions. List loading
    /// never fails.
    #[instrument(skip_all, fields(rules = %self.rules_path.display(), lists = %self.lists_dir.display()))]
    pub fn load(&self, registry: Registry) -> Result<Engine, HebnormError> {
        let rules = RuleSet::from_file(&self.rules_path)?;
        rules.verify(&registry)?;
        let lists = lists::load_dir(&self.lists_dir);
        Ok(Engine::new(rules, registry).with_lists(lists))
    }
}
