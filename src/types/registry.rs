use std::collections::HashMap;
use std::fmt;

use super::context::Context;
use super::error::{ActionFailure, ArgError};
use super::value::Args;

/// A predicate callable from condition tree leaves.
pub type PredicateFn = dyn Fn(&Context, &Args) -> Result<bool, ArgError> + Send + Sync;

/// An action run when a rule fires. Edits go through [`Context::record_edit`].
pub type ActionFn = dyn Fn(&mut Context, &Args) -> Result<(), ActionFailure> + Send + Sync;

/// Named predicates and actions available to compiled rules.
///
/// Built once at startup and shared read-only by every evaluation.
///
/// # Example
///
/// ```
/// use hebnorm::{Context, Registry};
///
/// let registry = Registry::with_builtins()
///     .predicate("is_first", |ctx: &Context, _args| Ok(ctx.index() == 0));
/// assert!(registry.has_predicate("is_first"));
/// assert!(registry.has_predicate("in_list"));
/// ```
#[derive(Default)]
pub struct Registry {
    predicates: HashMap<String, Box<PredicateFn>>,
    actions: HashMap<String, Box<ActionFn>>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the functions in [`builtins`](crate::builtins).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::install(&mut registry);
        registry
    }

    #[must_use]
    pub fn predicate<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Context, &Args) -> Result<bool, ArgError> + Send + Sync + 'static,
    {
        self.register_predicate(name, f);
        self
    }

    #[must_use]
    pub fn action<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&mut Context, &Args) -> Result<(), ActionFailure> + Send + Sync + 'static,
    {
        self.register_action(name, f);
        self
    }

    /// Register a predicate, replacing any previous one with the same name.
    pub fn register_predicate<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Context, &Args) -> Result<bool, ArgError> + Send + Sync + 'static,
    {
        self.predicates.insert(name.to_owned(), Box::new(f));
    }

    /// Register an action, replacing any previous one with the same name.
    pub fn register_action<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut Context, &Args) -> Result<(), ActionFailure> + Send + Sync + 'static,
    {
        self.actions.insert(name.to_owned(), Box::new(f));
    }

    #[must_use]
    pub fn get_predicate(&self, name: &str) -> Option<&PredicateFn> {
        self.predicates.get(name).map(Box::as_ref)
    }

    #[must_use]
    pub fn get_action(&self, name: &str) -> Option<&ActionFn> {
        self.actions.get(name).map(Box::as_ref)
    }

    #[must_use]
    pub fn has_predicate(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    #[must_use]
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut predicates: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        let mut actions: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        predicates.sort_unstable();
        actions.sort_unstable();
        f.debug_struct("Registry")
            .field("predicates", &predicates)
            .field("actions", &actions)
            .finish()
    }
}
