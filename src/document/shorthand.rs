use std::fmt::Write as _;

use serde_yaml::{Mapping, Value as Yaml};

const KEYWORDS: [&str; 6] = ["function", "not", "all", "any", "lists", "words"];

/// One recognized shape of a shorthand condition node.
///
/// Every legal shape is a mapping with exactly one keyword key; `function`
/// additionally allows an `args` mapping.
#[derive(Debug, PartialEq)]
pub(crate) enum Shorthand<'a> {
    Call {
        function: &'a str,
        args: Option<&'a Yaml>,
    },
    Not(&'a Yaml),
    All(&'a [Yaml]),
    Any(&'a [Yaml]),
    Lists(Vec<&'a str>),
    Words(Vec<&'a str>),
}

impl<'a> Shorthand<'a> {
    /// Recognize `node`, or explain why it is not a legal shape.
    pub(crate) fn recognize(node: &'a Yaml) -> Result<Self, String> {
        let map = node.as_mapping().ok_or("expected a mapping")?;

        let mut keyword = None;
        for key in map.keys() {
            let key = key.as_str().ok_or("keys must be strings")?;
            if KEYWORDS.contains(&key) {
                if let Some(previous) = keyword {
                    return Err(format!("conflicting keys '{previous}' and '{key}'"));
                }
                keyword = Some(key);
            } else if key != "args" {
                return Err(format!("unexpected key '{key}'"));
            }
        }
        let keyword = keyword.ok_or_else(|| {
            format!("no recognized key, expected one of {}", KEYWORDS.join(", "))
        })?;
        if keyword != "function" && map.contains_key("args") {
            return Err(format!("'args' is only allowed with 'function', not '{keyword}'"));
        }

        let value = &map[keyword];
        match keyword {
            "function" => Ok(Shorthand::Call {
                function: value.as_str().ok_or("'function' must be a string")?,
                args: args_of(map)?,
            }),
            "not" => Ok(Shorthand::Not(value)),
            "all" => Ok(Shorthand::All(sequence(value, "all")?)),
            "any" => Ok(Shorthand::Any(sequence(value, "any")?)),
            "lists" => Ok(Shorthand::Lists(strings(value, "lists")?)),
            _ => Ok(Shorthand::Words(strings(value, "words")?)),
        }
    }
}

fn args_of(map: &Mapping) -> Result<Option<&Yaml>, String> {
    match map.get("args") {
        None | Some(Yaml::Null) => Ok(None),
        Some(args @ Yaml::Mapping(_)) => Ok(Some(args)),
        Some(_) => Err("'args' must be a mapping".to_owned()),
    }
}

fn sequence<'a>(value: &'a Yaml, key: &str) -> Result<&'a [Yaml], String> {
    value
        .as_sequence()
        .map(Vec::as_slice)
        .ok_or_else(|| format!("'{key}' must be a sequence"))
}

fn strings<'a>(value: &'a Yaml, key: &str) -> Result<Vec<&'a str>, String> {
    sequence(value, key)?
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| format!("'{key}' must be a sequence of strings"))
        })
        .collect()
}

/// Render a node on one line, flow style, for error messages.
pub(crate) fn render(node: &Yaml) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &Yaml, out: &mut String) {
    match node {
        Yaml::Null => out.push_str("null"),
        Yaml::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Yaml::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Yaml::String(s) => out.push_str(s),
        Yaml::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(item, out);
            }
            out.push(']');
        }
        Yaml::Mapping(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(k, out);
                out.push_str(": ");
                render_into(v, out);
            }
            out.push('}');
        }
        Yaml::Tagged(tagged) => {
            let _ = write!(out, "{} ", tagged.tag);
            render_into(&tagged.value, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Yaml {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn recognizes_every_shape() {
        let call = yaml("{function: f1, args: {pos: 1}}");
        assert!(matches!(
            Shorthand::recognize(&call),
            Ok(Shorthand::Call { function: "f1", args: Some(_) })
        ));

        let bare = yaml("{function: f1}");
        assert_eq!(
            Shorthand::recognize(&bare),
            Ok(Shorthand::Call { function: "f1", args: None })
        );

        let not = yaml("{not: {function: f}}");
        assert!(matches!(Shorthand::recognize(&not), Ok(Shorthand::Not(_))));

        let all = yaml("{all: [{function: a}, {function: b}]}");
        assert!(matches!(Shorthand::recognize(&all), Ok(Shorthand::All(c)) if c.len() == 2));

        let any = yaml("{any: []}");
        assert!(matches!(Shorthand::recognize(&any), Ok(Shorthand::Any(c)) if c.is_empty()));

        let lists = yaml("{lists: [A, B]}");
        assert_eq!(
            Shorthand::recognize(&lists),
            Ok(Shorthand::Lists(vec!["A", "B"]))
        );

        let words = yaml("{words: [x, y]}");
        assert_eq!(
            Shorthand::recognize(&words),
            Ok(Shorthand::Words(vec!["x", "y"]))
        );
    }

    #[test]
    fn rejects_malformed_shapes() {
        let cases = [
            ("[1, 2]", "expected a mapping"),
            ("{foo: 1}", "unexpected key 'foo'"),
            ("{all: [], any: []}", "conflicting keys 'all' and 'any'"),
            ("{args: {}}", "no recognized key"),
            ("{all: {function: f}}", "'all' must be a sequence"),
            ("{lists: [A, 3]}", "'lists' must be a sequence of strings"),
            ("{function: [f]}", "'function' must be a string"),
            ("{function: f, args: [1]}", "'args' must be a mapping"),
            ("{words: [x], args: {}}", "'args' is only allowed"),
        ];
        for (input, expected) in cases {
            let node = yaml(input);
            let err = Shorthand::recognize(&node).unwrap_err();
            assert!(err.contains(expected), "{input}: {err}");
        }
    }

    #[test]
    fn render_is_single_line() {
        let node = yaml("foo:\n  - 1\n  - bar: true\n");
        assert_eq!(render(&node), "{foo: [1, {bar: true}]}");
    }
}
