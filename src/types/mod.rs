mod context;
mod cost;
mod error;
mod evaluation_report;
mod list_registry;
mod node;
mod registry;
mod rule;
mod ruleset;
mod value;

pub use context::{Analysis, Analyzer, Context, Edit, NullAnalyzer};
pub use cost::CostTable;
pub use error::{ActionFailure, ArgError, CompileError, EvalError};
pub use evaluation_report::EvaluationReport;
pub use list_registry::ListRegistry;
pub use node::{in_list, in_words, leaf, Node};
pub use registry::{ActionFn, PredicateFn, Registry};
pub use rule::{ActionCall, Rule, RuleSpec};
pub use ruleset::{RuleBuilder, RuleSet, RuleSetBuilder};
pub use value::{Args, Value};

pub(crate) use rule::RuleDraft;
