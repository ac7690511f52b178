use std::collections::{BTreeSet, HashMap};

static EMPTY: BTreeSet<String> = BTreeSet::new();

/// Named word lists referenced by rules, e.g. `PREFIXES` or `VAV_EXCEPTIONS`.
///
/// Lists with the same name contributed by several sources are unioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRegistry {
    lists: HashMap<String, BTreeSet<String>>,
}

impl ListRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `members` into the list `name`, creating it if needed.
    pub fn extend<I, S>(&mut self, name: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .entry(name.to_owned())
            .or_default()
            .extend(members.into_iter().map(Into::into));
    }

    /// Union every list of `other` into this registry.
    pub fn merge(&mut self, other: ListRegistry) {
        for (name, members) in other.lists {
            self.lists.entry(name).or_default().extend(members);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.lists.get(name)
    }

    /// The list `name`, or an empty set if no source defined it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> &BTreeSet<String> {
        self.lists.get(name).unwrap_or(&EMPTY)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_unions_members() {
        let mut reg = ListRegistry::new();
        reg.extend("LIST_A", ["a", "b"]);
        reg.extend("LIST_A", ["b", "c"]);
        let expected: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(reg.get("LIST_A"), Some(&expected));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn merge_registries() {
        let mut a = ListRegistry::new();
        a.extend("X", ["1"]);
        let mut b = ListRegistry::new();
        b.extend("X", ["2"]);
        b.extend("Y", ["3"]);
        a.merge(b);
        assert_eq!(a.lookup("X").len(), 2);
        assert!(a.lookup("Y").contains("3"));
    }

    #[test]
    fn lookup_missing_is_empty() {
        let reg = ListRegistry::new();
        assert!(reg.lookup("NOPE").is_empty());
        assert_eq!(reg.get("NOPE"), None);
    }
}
