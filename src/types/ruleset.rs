use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use super::context::Context;
use super::cost::CostTable;
use super::error::{CompileError, EvalError};
use super::evaluation_report::EvaluationReport;
use super::node::Node;
use super::registry::Registry;
use super::rule::{ActionCall, Rule, RuleDraft, RuleSpec};
use super::value::Args;
use crate::document::RuleDocument;
use crate::evaluate::Evaluator;

/// Builder for constructing a [`RuleSet`].
///
/// Rules come either from authored [`RuleSpec`]s (shorthand documents) or
/// from closures building [`Node`] trees directly.
///
/// # Example
///
/// ```
/// use hebnorm::{Args, RuleSetBuilder, in_list, leaf};
///
/// let ruleset = RuleSetBuilder::new()
///     .cost("in_list", 5.0)
///     .cost("is_syntactic_feature", 50.0)
///     .rule("add_vav", |r| {
///         r.describe("insert vav after nouns outside the exception list")
///             .when(leaf("is_syntactic_feature").arg("feature", "noun"))
///             .unless(in_list("VAV_EXCEPTIONS"))
///             .then("add_after", Args::new().with("letter", "ו"))
///     })
///     .compile()
///     .unwrap();
/// assert_eq!(ruleset.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    sources: Vec<RuleSource>,
    costs: Vec<(String, f64)>,
}

#[derive(Debug)]
enum RuleSource {
    Spec(RuleSpec),
    Built(RuleDraft),
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    description: String,
    conditions: Option<Node>,
    exceptions: Option<Node>,
    actions: Vec<ActionCall>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule from a closure. Without `.when()` the rule always fires.
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let built = f(RuleBuilder::default());
        self.sources.push(RuleSource::Built(RuleDraft {
            name: name.to_owned(),
            description: built.description,
            conditions: built.conditions,
            exceptions: built.exceptions,
            actions: built.actions,
        }));
        self
    }

    /// Add an authored rule.
    #[must_use]
    pub fn spec(mut self, spec: RuleSpec) -> Self {
        self.sources.push(RuleSource::Spec(spec));
        self
    }

    /// Declare the execution cost of a predicate function.
    #[must_use]
    pub fn cost(mut self, function: &str, cost: f64) -> Self {
        self.costs.push((function.to_owned(), cost));
        self
    }

    /// Compile the rules into an immutable `RuleSet`, keeping declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] for malformed condition shapes, duplicate
    /// rule names or negative costs.
    pub fn compile(self) -> Result<RuleSet, CompileError> {
        let costs = CostTable::from_pairs(self.costs)?;
        let drafts = self
            .sources
            .into_iter()
            .map(|source| match source {
                RuleSource::Spec(spec) => crate::compile::normalize_spec(spec),
                RuleSource::Built(draft) => Ok(draft),
            })
            .collect::<Result<Vec<_>, _>>()?;
        crate::compile::compile(drafts, costs)
    }
}

impl RuleBuilder {
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the condition tree.
    #[must_use]
    pub fn when(mut self, condition: Node) -> Self {
        self.conditions = Some(condition);
        self
    }

    /// Set the exception tree. The rule fires only if it does not hold.
    #[must_use]
    pub fn unless(mut self, exception: Node) -> Self {
        self.exceptions = Some(exception);
        self
    }

    /// Append an action to run when the rule fires.
    #[must_use]
    pub fn then(mut self, function: &str, args: Args) -> Self {
        self.actions.push(ActionCall::new(function, args));
        self
    }
}

/// A compiled, immutable rule set. Thread-safe and designed to live behind `Arc`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<Rule>,
    pub(crate) costs: Arc<CostTable>,
}

impl RuleSet {
    /// Compile a parsed rule document.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on malformed rules or costs.
    pub fn from_document(document: RuleDocument) -> Result<Self, CompileError> {
        let mut builder = RuleSetBuilder::new();
        for (function, cost) in document.function_costs {
            builder = builder.cost(&function, cost);
        }
        for spec in document.rules {
            builder = builder.spec(spec);
        }
        builder.compile()
    }

    /// Parse a YAML rule document and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`HebnormError`](crate::HebnormError) on parse or compile failure.
    pub fn from_yaml(input: &str) -> Result<Self, crate::HebnormError> {
        let document = crate::document::parse(input)?;
        Ok(Self::from_document(document)?)
    }

    /// Read a YAML rule file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`HebnormError`](crate::HebnormError) on I/O, parse, or compile failure.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::HebnormError> {
        let input = std::fs::read_to_string(path.as_ref())?;
        let ruleset = Self::from_yaml(&input)?;
        tracing::info!(rules = ruleset.len(), "compiled rule file");
        Ok(ruleset)
    }

    /// Compiled rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn cost_table(&self) -> &CostTable {
        &self.costs
    }

    /// Replace the cost table. Compiled trees are untouched; the next
    /// evaluation orders children by the new costs.
    #[must_use]
    pub fn with_cost_table(mut self, costs: CostTable) -> Self {
        self.costs = Arc::new(costs);
        self
    }

    /// An evaluator bound to this rule set's cost table and `registry`.
    #[must_use]
    pub fn evaluator<'a>(&'a self, registry: &'a Registry) -> Evaluator<'a> {
        Evaluator::new(&self.costs, registry)
    }

    /// Apply every rule in order to `ctx`, returning the names of the rules
    /// that fired. Edits of fired rules are left in the context's sink.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on an unknown predicate or action, invalid
    /// arguments, or a fatal action failure. Edits recorded before the
    /// failure stay in the context.
    pub fn apply(&self, registry: &Registry, ctx: &mut Context) -> Result<Vec<&str>, EvalError> {
        let evaluator = self.evaluator(registry);
        let mut fired = Vec::new();
        for rule in &self.rules {
            if evaluator.apply(rule, ctx)? {
                fired.push(rule.name.as_str());
            }
        }
        Ok(fired)
    }

    /// Like [`apply`](Self::apply), but also records every predicate call.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn apply_detailed(
        &self,
        registry: &Registry,
        ctx: &mut Context,
    ) -> Result<EvaluationReport, EvalError> {
        let start = Instant::now();
        let evaluator = self.evaluator(registry);
        let mut fired = Vec::new();
        let mut calls: Vec<String> = Vec::new();
        for rule in &self.rules {
            if evaluator.apply_traced(rule, ctx, &mut calls)? {
                fired.push(rule.name.clone());
            }
        }
        Ok(EvaluationReport::new(fired, calls, start.elapsed()))
    }

    /// Check that every predicate and action the rules reference is registered.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError::UnknownPredicate`] or
    /// [`CompileError::UnknownAction`] found, in rule order.
    pub fn verify(&self, registry: &Registry) -> Result<(), CompileError> {
        for rule in &self.rules {
            let mut functions = Vec::new();
            collect_functions(&rule.condition, &mut functions);
            if let Some(missing) = functions.into_iter().find(|f| !registry.has_predicate(f)) {
                return Err(CompileError::UnknownPredicate {
                    rule: rule.name.clone(),
                    function: missing.to_owned(),
                });
            }
            if let Some(missing) = rule
                .actions
                .iter()
                .find(|a| !registry.has_action(&a.function))
            {
                return Err(CompileError::UnknownAction {
                    rule: rule.name.clone(),
                    function: missing.function.clone(),
                });
            }
        }
        Ok(())
    }
}

fn collect_functions<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Leaf { function, .. } => out.push(function),
        Node::Not(child) => collect_functions(child, out),
        Node::All(children) | Node::Any(children) => {
            for child in children {
                collect_functions(child, out);
            }
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} rules, {} costed functions)",
            self.rules.len(),
            self.costs.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{in_list, leaf};

    #[test]
    fn builder_keeps_declaration_order() {
        let ruleset = RuleSetBuilder::new()
            .rule("b", |r| r.when(leaf("p")))
            .rule("a", |r| r.when(leaf("q")))
            .compile()
            .unwrap();
        let names: Vec<&str> = ruleset.rules().iter().map(Rule::name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn rule_without_when_is_vacuously_true() {
        let ruleset = RuleSetBuilder::new()
            .rule("always", |r| r.describe("fires everywhere"))
            .compile()
            .unwrap();
        let rule = ruleset.get("always").unwrap();
        assert_eq!(rule.condition(), &Node::All(vec![]));
        assert_eq!(rule.description(), "fires everywhere");
    }

    #[test]
    fn unless_wraps_exception() {
        let ruleset = RuleSetBuilder::new()
            .rule("r", |r| r.when(leaf("p")).unless(in_list("X")))
            .compile()
            .unwrap();
        assert_eq!(
            ruleset.get("r").unwrap().condition(),
            &Node::all([leaf("p"), !in_list("X")])
        );
    }

    #[test]
    fn negative_cost_fails_compile() {
        let result = RuleSetBuilder::new().cost("p", -1.0).compile();
        assert!(matches!(result, Err(CompileError::NegativeCost { .. })));
    }

    #[test]
    fn verify_reports_missing_functions() {
        let ruleset = RuleSetBuilder::new()
            .rule("r", |r| {
                r.when(Node::any([leaf("known"), leaf("missing")]))
            })
            .compile()
            .unwrap();
        let registry = Registry::new().predicate("known", |_, _| Ok(true));
        match ruleset.verify(&registry) {
            Err(CompileError::UnknownPredicate { rule, function }) => {
                assert_eq!(rule, "r");
                assert_eq!(function, "missing");
            }
            other => panic!("expected UnknownPredicate, got {other:?}"),
        }

        let ruleset = RuleSetBuilder::new()
            .rule("r", |r| r.then("emit", Args::new()))
            .compile()
            .unwrap();
        assert!(matches!(
            ruleset.verify(&Registry::new()),
            Err(CompileError::UnknownAction { .. })
        ));
        assert!(ruleset
            .verify(&Registry::new().action("emit", |_, _| Ok(())))
            .is_ok());
    }

    #[test]
    fn display_summary() {
        let ruleset = RuleSetBuilder::new()
            .cost("p", 1.0)
            .rule("r", |r| r.when(leaf("p")))
            .compile()
            .unwrap();
        assert_eq!(ruleset.to_string(), "RuleSet(1 rules, 1 costed functions)");
    }
}
