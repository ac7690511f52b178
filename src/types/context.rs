use std::borrow::Cow;
use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::list_registry::ListRegistry;

/// Result of the expensive linguistic analysis of a sentence: a set of
/// feature labels per token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    features: Vec<HashSet<String>>,
}

impl Analysis {
    /// An analysis of `token_count` tokens with no features.
    #[must_use]
    pub fn new(token_count: usize) -> Self {
        Self {
            features: vec![HashSet::new(); token_count],
        }
    }

    /// Attach `feature` to the token at `index`. Out-of-range indices are ignored.
    pub fn add_feature(&mut self, index: usize, feature: impl Into<String>) {
        if let Some(set) = self.features.get_mut(index) {
            set.insert(feature.into());
        }
    }

    #[must_use]
    pub fn has_feature(&self, index: usize, feature: &str) -> bool {
        self.features
            .get(index)
            .is_some_and(|set| set.contains(feature))
    }
}

/// Source of token analysis and normalization.
///
/// Morphological analysis and lemmatization are supplied by the host; the
/// engine only decides when to ask for them.
pub trait Analyzer: Send + Sync {
    /// Analyze the whole token sequence. Called at most once per [`Context`].
    fn analyze(&self, tokens: &[String]) -> Analysis;

    /// Normalize a token before list membership checks.
    fn normalize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

/// Analyzer that reports no features and leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnalyzer;

impl Analyzer for NullAnalyzer {
    fn analyze(&self, tokens: &[String]) -> Analysis {
        Analysis::new(tokens.len())
    }
}

/// Output edit recorded by an action. Edits are collected, never applied by
/// the engine itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `text` after the token at `position`.
    InsertAfter { position: usize, text: String },
}

/// Per-evaluation state for one token position of one input.
///
/// A context is owned by a single evaluation pass. Its caches use interior
/// mutability without synchronization, so it is `Send` but not `Sync`.
pub struct Context {
    tokens: Arc<[String]>,
    index: usize,
    lists: Arc<ListRegistry>,
    analyzer: Arc<dyn Analyzer>,
    analysis: OnceCell<Analysis>,
    inline_sets: RefCell<HashMap<Vec<String>, Arc<BTreeSet<String>>>>,
    edits: Vec<Edit>,
}

impl Context {
    /// Split `sentence` on whitespace and position the context at token 0.
    #[must_use]
    pub fn new(sentence: &str) -> Self {
        Self::from_tokens(sentence.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
    }

    /// A context over already split tokens. Pass an `Arc<[String]>` to share
    /// one token sequence between the contexts of several positions.
    #[must_use]
    pub fn from_tokens(tokens: impl Into<Arc<[String]>>) -> Self {
        Self {
            tokens: tokens.into(),
            index: 0,
            lists: Arc::new(ListRegistry::new()),
            analyzer: Arc::new(NullAnalyzer),
            analysis: OnceCell::new(),
            inline_sets: RefCell::new(HashMap::new()),
            edits: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    #[must_use]
    pub fn with_lists(mut self, lists: Arc<ListRegistry>) -> Self {
        self.lists = lists;
        self
    }

    /// Set the analyzer. An analysis already seeded with
    /// [`with_analysis`](Self::with_analysis) is kept.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Seed the analysis so it is not recomputed for this context.
    #[must_use]
    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = OnceCell::from(analysis);
        self
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The memoized analysis, computed on first call.
    pub fn analysis(&self) -> &Analysis {
        self.analysis
            .get_or_init(|| self.analyzer.analyze(&self.tokens))
    }

    /// The named list, or an empty set. Unknown names match nothing.
    #[must_use]
    pub fn lookup_list(&self, name: &str) -> &BTreeSet<String> {
        self.lists.lookup(name)
    }

    /// The set form of an inline word sequence, cached by exact sequence.
    pub fn inline_set<S: AsRef<str>>(&self, words: &[S]) -> Arc<BTreeSet<String>> {
        let key: Vec<String> = words.iter().map(|w| w.as_ref().to_owned()).collect();
        let mut cache = self.inline_sets.borrow_mut();
        if let Some(set) = cache.get(&key) {
            return Arc::clone(set);
        }
        let set = Arc::new(key.iter().cloned().collect::<BTreeSet<String>>());
        cache.insert(key, Arc::clone(&set));
        set
    }

    /// The token at the current index, if the index is in range.
    #[must_use]
    pub fn current_token(&self) -> Option<&str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    /// The current token after the analyzer's normalization.
    #[must_use]
    pub fn current_token_normalized(&self) -> Option<Cow<'_, str>> {
        self.current_token().map(|t| self.analyzer.normalize(t))
    }

    pub fn record_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Drain the recorded edits, leaving the sink empty.
    pub fn take_edits(&mut self) -> Vec<Edit> {
        std::mem::take(&mut self.edits)
    }

    /// The recorded edits and, if it was computed, the analysis.
    pub(crate) fn into_parts(self) -> (Vec<Edit>, Option<Analysis>) {
        (self.edits, self.analysis.into_inner())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("tokens", &self.tokens)
            .field("index", &self.index)
            .field("lists", &self.lists.len())
            .field("analyzed", &self.analysis.get().is_some())
            .field("edits", &self.edits)
            .finish_non_exhaustive()
    }
}
