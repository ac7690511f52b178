use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{Analyzer, Context, Edit, EvalError, ListRegistry, NullAnalyzer, Registry, RuleSet};

/// A compiled rule set bundled with everything needed to run it.
///
/// All parts are read-only after construction, so an `Engine` can be shared
/// across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use hebnorm::{Args, Edit, Engine, ListRegistry, Registry, RuleSetBuilder, in_list};
///
/// let rules = RuleSetBuilder::new()
///     .rule("vav_after_prefix", |r| {
///         r.when(in_list("PREFIXES"))
///             .then("add_after", Args::new().with("letter", "ו"))
///     })
///     .compile()
///     .unwrap();
/// let mut lists = ListRegistry::new();
/// lists.extend("PREFIXES", ["של"]);
///
/// let engine = Engine::new(rules, Registry::with_builtins()).with_lists(lists);
/// let edits = engine.run("בית של דוד").unwrap();
/// assert_eq!(edits, [Edit::InsertAfter { position: 1, text: "ו".into() }]);
/// ```
pub struct Engine {
    rules: RuleSet,
    registry: Registry,
    lists: Arc<ListRegistry>,
    analyzer: Arc<dyn Analyzer>,
}

impl Engine {
    #[must_use]
    pub fn new(rules: RuleSet, registry: Registry) -> Self {
        Self {
            rules,
            registry,
            lists: Arc::new(ListRegistry::new()),
            analyzer: Arc::new(NullAnalyzer),
        }
    }

    #[must_use]
    pub fn with_lists(mut self, lists: ListRegistry) -> Self {
        self.lists = Arc::new(lists);
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.analyzer = Arc::new(analyzer);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn lists(&self) -> &ListRegistry {
        &self.lists
    }

    /// A fresh context over `tokens` at `index`, wired to this engine's lists
    /// and analyzer.
    #[must_use]
    pub fn context(&self, tokens: impl Into<Arc<[String]>>, index: usize) -> Context {
        Context::from_tokens(tokens)
            .at(index)
            .with_lists(Arc::clone(&self.lists))
            .with_analyzer(Arc::clone(&self.analyzer))
    }

    /// Apply every rule at every token position of `sentence` and return the
    /// recorded edits in position order.
    ///
    /// Each position gets its own [`Context`]. The sentence is analyzed at
    /// most once; an analysis computed at one position is handed to the next.
    ///
    /// # Errors
    ///
    /// Stops at the first [`EvalError`].
    pub fn run(&self, sentence: &str) -> Result<Vec<Edit>, EvalError> {
        let tokens: Arc<[String]> = sentence.split_whitespace().map(str::to_owned).collect();
        let mut edits = Vec::new();
        let mut analysis = None;
        for index in 0..tokens.len() {
            let mut ctx = self.context(Arc::clone(&tokens), index);
            if let Some(done) = analysis.take() {
                ctx = ctx.with_analysis(done);
            }
            let fired = self.rules.apply(&self.registry, &mut ctx)?;
            if !fired.is_empty() {
                debug!(index, rules = ?fired, "token matched");
            }
            let (mut recorded, computed) = ctx.into_parts();
            edits.append(&mut recorded);
            analysis = computed;
        }
        Ok(edits)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("rules", &self.rules.len())
            .field("registry", &self.registry)
            .field("lists", &self.lists.len())
            .finish_non_exhaustive()
    }
}
