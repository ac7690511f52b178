//! Built-in predicates and actions.
//!
//! | name                   | kind      | args                         |
//! |------------------------|-----------|------------------------------|
//! | `in_list`              | predicate | `list: str` or `words: [str]` |
//! | `is_syntactic_feature` | predicate | `feature: str`               |
//! | `add_after`            | action    | `letter: str`                |

use crate::{ActionFailure, ArgError, Args, Context, Edit, Registry};

pub const IN_LIST: &str = "in_list";
pub const IS_SYNTACTIC_FEATURE: &str = "is_syntactic_feature";
pub const ADD_AFTER: &str = "add_after";

pub(crate) fn install(registry: &mut Registry) {
    registry.register_predicate(IN_LIST, in_list);
    registry.register_predicate(IS_SYNTACTIC_FEATURE, is_syntactic_feature);
    registry.register_action(ADD_AFTER, add_after);
}

/// Whether the normalized current token is a member of the named list, or of
/// the inline `words`. A named list takes precedence when both are given.
/// False when the context has no current token or neither source is given.
pub fn in_list(ctx: &Context, args: &Args) -> Result<bool, ArgError> {
    let list = args.opt_str("list")?.filter(|name| !name.is_empty());
    let words = args.opt_str_list("words")?;
    let Some(target) = ctx.current_token_normalized() else {
        return Ok(false);
    };
    if let Some(name) = list {
        return Ok(ctx.lookup_list(name).contains(target.as_ref()));
    }
    match words {
        Some(words) if !words.is_empty() => Ok(ctx.inline_set(&words).contains(target.as_ref())),
        _ => Ok(false),
    }
}

/// Whether the analysis of the sentence tags the current token with `feature`.
pub fn is_syntactic_feature(ctx: &Context, args: &Args) -> Result<bool, ArgError> {
    let feature = args.require_str("feature")?;
    Ok(ctx.analysis().has_feature(ctx.index(), feature))
}

/// Record an insertion of `letter` after the current token.
pub fn add_after(ctx: &mut Context, args: &Args) -> Result<(), ActionFailure> {
    let letter = args.require_str("letter")?.to_owned();
    if ctx.current_token().is_none() {
        return Err(ActionFailure::recoverable(format!(
            "no token at position {}",
            ctx.index()
        )));
    }
    let position = ctx.index();
    ctx.record_edit(Edit::InsertAfter {
        position,
        text: letter,
    });
    Ok(())
}
