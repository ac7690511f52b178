use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::{Args, Context, CostTable, EvalError, Node, Registry, Rule};

/// Receives the name of every predicate actually invoked.
pub(crate) trait CallTrace {
    fn called(&mut self, function: &str);
}

impl CallTrace for () {
    #[inline]
    fn called(&mut self, _function: &str) {}
}

impl CallTrace for Vec<String> {
    fn called(&mut self, function: &str) {
        self.push(function.to_owned());
    }
}

/// Evaluates condition trees and dispatches actions against a [`Context`].
///
/// Children of `All`/`Any` are evaluated in ascending estimated cost, ties
/// in authored order, and evaluation stops at the first deciding child. The
/// order is computed on every call and never stored in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    costs: &'a CostTable,
    registry: &'a Registry,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub fn new(costs: &'a CostTable, registry: &'a Registry) -> Self {
        Self { costs, registry }
    }

    /// Evaluate `node` against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownPredicate`] if a reached leaf names an
    /// unregistered function, or [`EvalError::InvalidArgs`] if a predicate
    /// rejects its arguments.
    pub fn evaluate(&self, node: &Node, ctx: &Context) -> Result<bool, EvalError> {
        self.eval(node, ctx, &mut ())
    }

    /// Run the action `name` with `args`.
    ///
    /// A recoverable action failure is logged and swallowed; a fatal one is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownAction`] or [`EvalError::ActionFailed`].
    pub fn dispatch(&self, name: &str, ctx: &mut Context, args: &Args) -> Result<(), EvalError> {
        let action = self
            .registry
            .get_action(name)
            .ok_or_else(|| EvalError::UnknownAction {
                function: name.to_owned(),
            })?;
        match action(ctx, args) {
            Ok(()) => Ok(()),
            Err(failure) if failure.is_fatal() => Err(EvalError::ActionFailed {
                action: name.to_owned(),
                source: failure,
            }),
            Err(failure) => {
                warn!(action = name, index = ctx.index(), error = %failure, "action failed, continuing");
                Ok(())
            }
        }
    }

    /// Evaluate the rule's condition and, if it holds, run its actions in
    /// declared order. Returns whether the rule fired.
    ///
    /// # Errors
    ///
    /// Any [`EvalError`] from evaluation or dispatch. Actions that ran before
    /// a fatal failure are not rolled back.
    pub fn apply(&self, rule: &Rule, ctx: &mut Context) -> Result<bool, EvalError> {
        self.apply_traced(rule, ctx, &mut ())
    }

    pub(crate) fn apply_traced(
        &self,
        rule: &Rule,
        ctx: &mut Context,
        trace: &mut impl CallTrace,
    ) -> Result<bool, EvalError> {
        if !self.eval(&rule.condition, ctx, trace)? {
            return Ok(false);
        }
        debug!(rule = %rule.name, index = ctx.index(), "rule fired");
        for action in &rule.actions {
            self.dispatch(&action.function, ctx, &action.args)?;
        }
        Ok(true)
    }

    fn eval(&self, node: &Node, ctx: &Context, trace: &mut impl CallTrace) -> Result<bool, EvalError> {
        match node {
            Node::Leaf {
                function,
                args,
                negate,
            } => {
                let predicate = self.registry.get_predicate(function).ok_or_else(|| {
                    EvalError::UnknownPredicate {
                        function: function.clone(),
                    }
                })?;
                trace.called(function);
                let result = predicate(ctx, args).map_err(|source| EvalError::InvalidArgs {
                    function: function.clone(),
                    source,
                })?;
                Ok(result != *negate)
            }
            Node::Not(child) => Ok(!self.eval(child, ctx, trace)?),
            Node::All(children) => {
                for child in self.by_cost(children) {
                    if !self.eval(child, ctx, trace)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Node::Any(children) => {
                for child in self.by_cost(children) {
                    if self.eval(child, ctx, trace)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Children in ascending estimated cost. The sort is stable.
    fn by_cost<'n>(&self, children: &'n [Node]) -> Vec<&'n Node> {
        let mut keyed: Vec<(f64, &Node)> = children
            .iter()
            .map(|child| (self.costs.estimate(child), child))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(_, child)| child).collect()
    }
}
