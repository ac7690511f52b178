use std::fmt;
use std::ops::Not;

use super::value::{Args, Value};

/// Compiled condition tree.
///
/// `All([])` is vacuously true and `Any([])` is false.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Call of a named predicate with keyword arguments.
    Leaf {
        function: String,
        args: Args,
        negate: bool,
    },
    Not(Box<Node>),
    All(Vec<Node>),
    Any(Vec<Node>),
}

impl Node {
    #[must_use]
    pub fn all(children: impl IntoIterator<Item = Node>) -> Node {
        Node::All(children.into_iter().collect())
    }

    #[must_use]
    pub fn any(children: impl IntoIterator<Item = Node>) -> Node {
        Node::Any(children.into_iter().collect())
    }

    /// Add a keyword argument to a leaf. Other node kinds are returned unchanged.
    #[must_use]
    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Node {
        if let Node::Leaf { args, .. } = &mut self {
            args.insert(name, value);
        }
        self
    }

    /// Flip the `negate` flag of a leaf; wrap any other node in `Not`.
    #[must_use]
    pub fn negated(self) -> Node {
        match self {
            Node::Leaf {
                function,
                args,
                negate,
            } => Node::Leaf {
                function,
                args,
                negate: !negate,
            },
            other => Node::Not(Box::new(other)),
        }
    }
}

impl Not for Node {
    type Output = Node;

    fn not(self) -> Node {
        Node::Not(Box::new(self))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf {
                function,
                args,
                negate,
            } => {
                if *negate {
                    write!(f, "!")?;
                }
                write!(f, "{function}({args})")
            }
            Node::Not(child) => write!(f, "NOT {child}"),
            Node::All(children) => write_group(f, "ALL", children),
            Node::Any(children) => write_group(f, "ANY", children),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, op: &str, children: &[Node]) -> fmt::Result {
    write!(f, "{op}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

/// A leaf calling `function` with no arguments.
#[must_use]
pub fn leaf(function: &str) -> Node {
    Node::Leaf {
        function: function.to_owned(),
        args: Args::new(),
        negate: false,
    }
}

/// Membership test of the current token against a named list.
#[must_use]
pub fn in_list(list: &str) -> Node {
    leaf(crate::builtins::IN_LIST).arg("list", list)
}

/// Membership test of the current token against an inline word set.
#[must_use]
pub fn in_words<S: AsRef<str>>(words: &[S]) -> Node {
    let words: Vec<Value> = words.iter().map(|w| Value::from(w.as_ref())).collect();
    leaf(crate::builtins::IN_LIST).arg("words", Value::List(words))
}
