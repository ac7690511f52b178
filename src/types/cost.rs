use std::collections::HashMap;

use super::error::CompileError;
use super::node::Node;

/// Maps predicate function names to their declared execution cost.
///
/// Functions without an entry cost `0` and are tried first. The table only
/// steers evaluation order; it never changes a result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTable {
    costs: HashMap<String, f64>,
}

impl CostTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(function, cost)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NegativeCost`] for a negative or NaN cost.
    pub fn from_pairs<K: Into<String>>(
        pairs: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, CompileError> {
        let mut table = Self::new();
        for (function, cost) in pairs {
            table.insert(function, cost)?;
        }
        Ok(table)
    }

    /// Set the cost of one function.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NegativeCost`] for a negative or NaN cost.
    pub fn insert(&mut self, function: impl Into<String>, cost: f64) -> Result<(), CompileError> {
        let function = function.into();
        if cost.is_nan() || cost < 0.0 {
            return Err(CompileError::NegativeCost { function, cost });
        }
        self.costs.insert(function, cost);
        Ok(())
    }

    /// Declared cost of `function`, or `0` if it has none.
    #[must_use]
    pub fn cost(&self, function: &str) -> f64 {
        self.costs.get(function).copied().unwrap_or(0.0)
    }

    /// Estimated cost of evaluating `node`.
    ///
    /// Groups report their cheapest child: the estimate answers "which child
    /// should be tried first", not "how much work is the whole subtree".
    #[must_use]
    pub fn estimate(&self, node: &Node) -> f64 {
        match node {
            Node::Leaf { function, .. } => self.cost(function),
            Node::Not(child) => self.estimate(child),
            Node::All(children) | Node::Any(children) => children
                .iter()
                .map(|c| self.estimate(c))
                .reduce(f64::min)
                .unwrap_or(0.0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::node::leaf;

    fn table() -> CostTable {
        CostTable::from_pairs([("cheap", 1.0), ("mid", 5.0), ("heavy", 50.0)]).unwrap()
    }

    #[test]
    fn missing_entry_is_free() {
        assert_eq!(table().cost("unknown"), 0.0);
        assert_eq!(table().estimate(&leaf("unknown")), 0.0);
    }

    #[test]
    fn leaf_and_not() {
        let t = table();
        assert_eq!(t.estimate(&leaf("heavy")), 50.0);
        assert_eq!(t.estimate(&!leaf("mid")), 5.0);
    }

    #[test]
    fn groups_use_minimum_child() {
        let t = table();
        let node = Node::all([leaf("heavy"), Node::any([leaf("mid"), leaf("cheap")])]);
        assert_eq!(t.estimate(&node), 1.0);
        assert_eq!(t.estimate(&Node::Any(vec![])), 0.0);
        assert_eq!(t.estimate(&Node::All(vec![])), 0.0);
    }

    #[test]
    fn rejects_negative_and_nan() {
        let mut t = CostTable::new();
        assert!(matches!(
            t.insert("f", -0.5),
            Err(CompileError::NegativeCost { .. })
        ));
        assert!(t.insert("f", f64::NAN).is_err());
        assert!(t.insert("f", 0.0).is_ok());
        assert_eq!(t.len(), 1);
    }
}
