use std::collections::HashSet;
use std::sync::Arc;

use serde_yaml::Value as Yaml;

use crate::document::shorthand::{self, Shorthand};
use crate::types::{CostTable, RuleDraft};
use crate::{in_list, in_words, Args, CompileError, Node, Rule, RuleSet, RuleSpec};

pub(crate) fn compile(drafts: Vec<RuleDraft>, costs: CostTable) -> Result<RuleSet, CompileError> {
    check_duplicates(&drafts)?;
    let rules = drafts.into_iter().map(merge).collect();
    Ok(RuleSet {
        rules,
        costs: Arc::new(costs),
    })
}

fn check_duplicates(drafts: &[RuleDraft]) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for draft in drafts {
        if !seen.insert(draft.name.as_str()) {
            return Err(CompileError::DuplicateRule {
                name: draft.name.clone(),
            });
        }
    }
    Ok(())
}

/// `C` alone, or `All([C, Not(E)])` when exceptions are present.
fn merge(draft: RuleDraft) -> Rule {
    let conditions = draft.conditions.unwrap_or_else(|| Node::All(Vec::new()));
    let condition = match draft.exceptions {
        None => conditions,
        Some(exceptions) => Node::All(vec![conditions, Node::Not(Box::new(exceptions))]),
    };
    Rule {
        name: draft.name,
        description: draft.description,
        condition,
        actions: draft.actions,
    }
}

/// Expand the shorthand blocks of an authored rule into condition trees.
pub(crate) fn normalize_spec(spec: RuleSpec) -> Result<RuleDraft, CompileError> {
    let conditions = normalize_block(spec.conditions.as_ref(), &spec.name, "conditions", true)?;
    let exceptions = normalize_block(spec.exceptions.as_ref(), &spec.name, "exceptions", false)?;
    Ok(RuleDraft {
        name: spec.name,
        description: spec.description,
        conditions,
        exceptions,
        actions: spec.actions,
    })
}

/// A missing, null or empty block means "not given". A top-level conditions
/// sequence is read as `all` of its items.
fn normalize_block(
    block: Option<&Yaml>,
    rule: &str,
    path: &str,
    sequence_means_all: bool,
) -> Result<Option<Node>, CompileError> {
    match block {
        None | Some(Yaml::Null) => Ok(None),
        Some(Yaml::Mapping(map)) if map.is_empty() => Ok(None),
        Some(Yaml::Sequence(items)) if items.is_empty() => Ok(None),
        Some(Yaml::Sequence(items)) if sequence_means_all => {
            Ok(Some(Node::All(normalize_children(items, rule, path)?)))
        }
        Some(node) => normalize(node, rule, path).map(Some),
    }
}

fn normalize(node: &Yaml, rule: &str, path: &str) -> Result<Node, CompileError> {
    let shape = Shorthand::recognize(node).map_err(|reason| CompileError::UnsupportedNode {
        rule: rule.to_owned(),
        path: path.to_owned(),
        reason,
        node: shorthand::render(node),
    })?;

    Ok(match shape {
        Shorthand::Call { function, args } => Node::Leaf {
            function: function.to_owned(),
            args: parse_args(args, rule, path)?,
            negate: false,
        },
        Shorthand::Not(inner) => Node::Not(Box::new(normalize(inner, rule, &format!("{path}.not"))?)),
        Shorthand::All(items) => Node::All(normalize_children(items, rule, &format!("{path}.all"))?),
        Shorthand::Any(items) => Node::Any(normalize_children(items, rule, &format!("{path}.any"))?),
        Shorthand::Lists(names) => Node::Any(names.into_iter().map(in_list).collect()),
        Shorthand::Words(words) => Node::Any(vec![in_words(&words)]),
    })
}

fn normalize_children(items: &[Yaml], rule: &str, path: &str) -> Result<Vec<Node>, CompileError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize(item, rule, &format!("{path}[{i}]")))
        .collect()
}

fn parse_args(args: Option<&Yaml>, rule: &str, path: &str) -> Result<Args, CompileError> {
    let Some(args) = args else {
        return Ok(Args::new());
    };
    serde_yaml::from_value(args.clone()).map_err(|e| CompileError::InvalidArgs {
        rule: rule.to_owned(),
        path: format!("{path}.args"),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{leaf, RuleSetBuilder};

    fn yaml(s: &str) -> Option<Yaml> {
        Some(serde_yaml::from_str(s).unwrap())
    }

    fn spec(conditions: &str, exceptions: Option<&str>) -> RuleSpec {
        RuleSpec {
            name: "r".into(),
            conditions: yaml(conditions),
            exceptions: exceptions.and_then(yaml),
            ..RuleSpec::default()
        }
    }

    fn compile_one(spec: RuleSpec) -> Result<Node, CompileError> {
        let ruleset = RuleSetBuilder::new().spec(spec).compile()?;
        Ok(ruleset.rules()[0].condition().clone())
    }

    #[test]
    fn lists_expand_to_any_of_membership_leaves() {
        let node = compile_one(spec(r#"{"lists": ["A", "B"]}"#, None)).unwrap();
        assert_eq!(
            node,
            Node::Any(vec![
                leaf("in_list").arg("list", "A"),
                leaf("in_list").arg("list", "B"),
            ])
        );
    }

    #[test]
    fn exceptions_merge_into_all_not() {
        let node = compile_one(spec(
            r#"{"all": [{"function": "f1"}]}"#,
            Some(r#"{"words": ["x", "y"]}"#),
        ))
        .unwrap();
        assert_eq!(
            node,
            Node::All(vec![
                Node::All(vec![leaf("f1")]),
                Node::Not(Box::new(Node::Any(vec![
                    leaf("in_list").arg("words", vec!["x", "y"])
                ]))),
            ])
        );
    }

    #[test]
    fn missing_conditions_are_vacuously_true() {
        let node = compile_one(RuleSpec {
            name: "r".into(),
            ..RuleSpec::default()
        })
        .unwrap();
        assert_eq!(node, Node::All(vec![]));

        let node = compile_one(spec("{}", Some("{}"))).unwrap();
        assert_eq!(node, Node::All(vec![]));
    }

    #[test]
    fn missing_conditions_with_exceptions() {
        let node = compile_one(RuleSpec {
            name: "r".into(),
            exceptions: yaml("{lists: [X]}"),
            ..RuleSpec::default()
        })
        .unwrap();
        assert_eq!(
            node,
            Node::all([Node::All(vec![]), !Node::any([in_list("X")])])
        );
    }

    #[test]
    fn leaf_args_and_nesting() {
        let node = compile_one(spec(
            "any:\n  - not: {function: is_nikud, args: {pos: 1, nikuds: [a, b]}}\n  - function: g",
            None,
        ))
        .unwrap();
        assert_eq!(
            node,
            Node::any([
                !leaf("is_nikud").arg("pos", 1_i64).arg("nikuds", vec!["a", "b"]),
                leaf("g"),
            ])
        );
    }

    #[test]
    fn top_level_sequence_means_all() {
        let node = compile_one(spec("[{function: a}, {lists: [L]}]", None)).unwrap();
        assert_eq!(node, Node::all([leaf("a"), Node::any([in_list("L")])]));
    }

    #[test]
    fn top_level_function_is_a_leaf() {
        let node = compile_one(spec("{function: a}", None)).unwrap();
        assert_eq!(node, leaf("a"));
    }

    #[test]
    fn unsupported_nested_node_names_path() {
        match compile_one(spec("all:\n  - function: a\n  - foo: bar", None)) {
            Err(CompileError::UnsupportedNode {
                rule, path, node, ..
            }) => {
                assert_eq!(rule, "r");
                assert_eq!(path, "conditions.all[1]");
                assert_eq!(node, "{foo: bar}");
            }
            other => panic!("expected UnsupportedNode, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_exceptions_fail() {
        match compile_one(spec("{function: a}", Some("{function_typo: b}"))) {
            Err(CompileError::UnsupportedNode { path, .. }) => assert_eq!(path, "exceptions"),
            other => panic!("expected UnsupportedNode, got {other:?}"),
        }
        // A bare sequence is only shorthand for conditions.
        assert!(matches!(
            compile_one(spec("{function: a}", Some("[{function: b}]"))),
            Err(CompileError::UnsupportedNode { .. })
        ));
    }

    #[test]
    fn scalar_conditions_fail() {
        assert!(matches!(
            compile_one(spec("just_a_string", None)),
            Err(CompileError::UnsupportedNode { .. })
        ));
    }

    #[test]
    fn invalid_leaf_args_fail() {
        match compile_one(spec("{function: a, args: {nested: {deep: 1}}}", None)) {
            Err(CompileError::InvalidArgs { path, .. }) => assert_eq!(path, "conditions.args"),
            other => panic!("expected InvalidArgs, got {other:?}"),
        }
    }

    #[test]
    fn null_args_read_as_absent() {
        let node = compile_one(spec("{function: in_list, args: {list: null, words: [x]}}", None)).unwrap();
        assert_eq!(node, leaf("in_list").arg("words", vec!["x"]));

        let ruleset = RuleSet::from_yaml(
            "rules:\n  - name: r\n    conditions: {function: in_list, args: {list: null, words: [x]}}\n",
        )
        .unwrap();
        let registry = crate::Registry::with_builtins();
        assert_eq!(ruleset.apply(&registry, &mut crate::Context::new("x")).unwrap(), ["r"]);
        assert!(ruleset.apply(&registry, &mut crate::Context::new("y")).unwrap().is_empty());
    }

    #[test]
    fn duplicate_rule_names_fail() {
        let result = RuleSetBuilder::new()
            .spec(spec("{function: a}", None))
            .rule("r", |r| r.when(leaf("b")))
            .compile();
        assert!(matches!(
            result,
            Err(CompileError::DuplicateRule { name }) if name == "r"
        ));
    }
}
