use serde::Deserialize;

use super::node::Node;
use super::value::Args;

/// One rule as authored in a rule document.
///
/// `conditions` and `exceptions` hold the shorthand condition documents
/// (`function`, `not`, `all`, `any`, `lists`, `words`) and are normalized
/// into a [`Node`] tree during compilation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: Option<serde_yaml::Value>,
    #[serde(default)]
    pub exceptions: Option<serde_yaml::Value>,
    #[serde(default)]
    pub actions: Vec<ActionCall>,
}

/// An action invocation: action name plus keyword arguments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionCall {
    pub function: String,
    #[serde(default)]
    pub args: Args,
}

impl ActionCall {
    pub fn new(function: impl Into<String>, args: Args) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }
}

/// A rule whose condition and exception blocks have been merged into a
/// single condition tree.
///
/// Produced by compilation and owned by a [`RuleSet`](super::RuleSet).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) condition: Node,
    pub(crate) actions: Vec<ActionCall>,
}

impl Rule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn condition(&self) -> &Node {
        &self.condition
    }

    /// Actions in declared order.
    #[must_use]
    pub fn actions(&self) -> &[ActionCall] {
        &self.actions
    }
}

/// A rule before shorthand normalization and exception merging.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleDraft {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) conditions: Option<Node>,
    pub(crate) exceptions: Option<Node>,
    pub(crate) actions: Vec<ActionCall>,
}
