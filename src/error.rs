use thiserror::Error;

use crate::document::DocumentError;
use crate::lists::LoadError;
use crate::{CompileError, EvalError};

/// Unified error type covering rule documents, compilation, evaluation,
/// configuration and I/O.
///
/// Returned by convenience entry points like
/// [`RuleSet::from_file()`](crate::RuleSet::from_file) and
/// [`EngineConfig::load()`](crate::EngineConfig::load).
#[derive(Debug, Error)]
pub enum HebnormError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid engine config: {0}")]
    Config(#[source] serde_yaml::Error),
}
