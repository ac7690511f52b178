use thiserror::Error;

/// Errors raised while compiling authored rules into condition trees.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("unsupported condition node at {path} in rule '{rule}': {reason}: {node}")]
    UnsupportedNode {
        rule: String,
        path: String,
        reason: String,
        node: String,
    },

    #[error("invalid arguments at {path} in rule '{rule}': {reason}")]
    InvalidArgs {
        rule: String,
        path: String,
        reason: String,
    },

    #[error("cost of function '{function}' must be a non-negative number, got {cost}")]
    NegativeCost { function: String, cost: f64 },

    #[error("rule '{rule}' references unregistered predicate '{function}'")]
    UnknownPredicate { rule: String, function: String },

    #[error("rule '{rule}' references unregistered action '{function}'")]
    UnknownAction { rule: String, function: String },
}

/// Errors raised while evaluating condition trees or dispatching actions.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unknown predicate '{function}'")]
    UnknownPredicate { function: String },

    #[error("unknown action '{function}'")]
    UnknownAction { function: String },

    #[error("invalid arguments for '{function}': {source}")]
    InvalidArgs {
        function: String,
        #[source]
        source: ArgError,
    },

    #[error("action '{action}' failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: ActionFailure,
    },
}

/// A keyword argument a predicate or action could not use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("missing required argument '{name}'")]
    Missing { name: String },

    #[error("argument '{name}' must be {expected}")]
    WrongType { name: String, expected: &'static str },
}

/// Failure reported by an action.
///
/// Recoverable failures are logged and the remaining actions of the rule
/// still run. Fatal failures stop the rule and surface as
/// [`EvalError::ActionFailed`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionFailure {
    message: String,
    fatal: bool,
}

impl ActionFailure {
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: false,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: true,
        }
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// A malformed argument is a rule authoring mistake, not a transient failure.
impl From<ArgError> for ActionFailure {
    fn from(err: ArgError) -> Self {
        Self::fatal(err.to_string())
    }
}
