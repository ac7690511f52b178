//! Authored rule documents.
//!
//! A rule document is YAML with two top-level keys:
//!
//! ```yaml
//! function_costs:
//!   in_list: 5
//!   is_syntactic_feature: 50
//! rules:
//!   - name: vav_after_prefix
//!     description: add a vav after listed prefixes
//!     conditions:
//!       all:
//!         - function: is_syntactic_feature
//!           args: { feature: noun }
//!     exceptions:
//!       lists: [VAV_EXCEPTIONS]
//!     actions:
//!       - function: add_after
//!         args: { letter: ו }
//! ```

mod error;
pub(crate) mod shorthand;

use std::collections::HashMap;

use serde::Deserialize;

use crate::RuleSpec;

pub use error::DocumentError;

/// A parsed, not yet compiled, rule document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub function_costs: HashMap<String, f64>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Parse a YAML rule document.
///
/// An empty input is an empty document.
///
/// # Errors
///
/// Returns [`DocumentError`] if the input is not valid YAML or does not have the
/// document structure.
pub fn parse(input: &str) -> Result<RuleDocument, DocumentError> {
    let value: serde_yaml::Value = serde_yaml::from_str(input).map_err(DocumentError::new)?;
    if value.is_null() {
        return Ok(RuleDocument::default());
    }
    serde_yaml::from_value(value).map_err(DocumentError::new)
}
