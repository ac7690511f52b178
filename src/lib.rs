//! Declarative rule compiler and cost-ordered predicate evaluator for Hebrew
//! text normalization.
//!
//! Rules are authored in YAML shorthand (or built in code), compiled once into
//! condition trees, and evaluated per token position against a [`Context`].
//! At every `all`/`any` node the children run cheapest first, using a
//! [`CostTable`] of per-function costs, so expensive predicates such as
//! morphological analysis are skipped whenever a cheap check already decides
//! the outcome.
//!
//! ```
//! use hebnorm::{Edit, Engine, ListRegistry, Registry, RuleSet};
//!
//! let rules = RuleSet::from_yaml(r"
//! function_costs:
//!   in_list: 5
//! rules:
//!   - name: vav_after_prefix
//!     conditions:
//!       lists: [PREFIXES]
//!     exceptions:
//!       words: [ב]
//!     actions:
//!       - function: add_after
//!         args: { letter: ו }
//! ").unwrap();
//!
//! let mut lists = ListRegistry::new();
//! lists.extend("PREFIXES", ["של", "ב"]);
//! let engine = Engine::new(rules, Registry::with_builtins()).with_lists(lists);
//!
//! let edits = engine.run("ב בית של דוד").unwrap();
//! assert_eq!(edits, [Edit::InsertAfter { position: 2, text: "ו".into() }]);
//! ```

pub mod builtins;
mod compile;
mod config;
mod engine;
mod error;
mod evaluate;
pub mod lists;
pub mod document;
mod types;

pub use config::{EngineConfig, LISTS_DIR_ENV, RULES_ENV};
pub use engine::Engine;
pub use error::HebnormError;
pub use evaluate::Evaluator;
pub use lists::LoadError;
pub use document::{DocumentError, RuleDocument};
pub use types::{
    in_list, in_words, leaf, ActionCall, ActionFailure, ActionFn, Analysis, Analyzer, ArgError,
    Args, CompileError, Context, CostTable, Edit, EvalError, EvaluationReport, ListRegistry, Node,
    NullAnalyzer, PredicateFn, Registry, Rule, RuleBuilder, RuleSet, RuleSetBuilder, RuleSpec,
    Value,
};
