//! Function dispatch table.
//!
//! Maps a lower-cased function name, synonyms included, to the number of
//! arguments it accepts and to how it is lowered. The table is built once
//! and only read afterwards.

use crate::expression::error::{TranslationError, TranslationResult};
use crate::expression::expr::{Builtin, Direction, Expr, TupleExpr};
use crate::expression::rewrite::RewriteRule;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Permitted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
            Arity::OneOf(allowed) => allowed.contains(&count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowering {
    /// A dedicated builtin node
    Node(Builtin),
    /// A composition of primitive nodes
    Rewrite(RewriteRule),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRule {
    pub arity: Arity,
    pub lowering: Lowering,
}

const fn node(arity: Arity, kind: Builtin) -> FunctionRule {
    FunctionRule {
        arity,
        lowering: Lowering::Node(kind),
    }
}

const fn rewrite(arity: Arity, rule: RewriteRule) -> FunctionRule {
    FunctionRule {
        arity,
        lowering: Lowering::Rewrite(rule),
    }
}

const UNARY: Arity = Arity::Exact(1);
const BINARY: Arity = Arity::Exact(2);
const VARIADIC: Arity = Arity::AtLeast(1);

/// Every function the dispatcher lowers, keyed by lower-cased name
pub const FUNCTION_TABLE: &[(&str, FunctionRule)] = &[
    ("isnull", rewrite(UNARY, RewriteRule::IsNull)),
    ("ifnull", rewrite(BINARY, RewriteRule::IfNull)),
    ("nullif", rewrite(BINARY, RewriteRule::NullIf)),
    ("coalesce", node(VARIADIC, Builtin::Coalesce)),
    ("greatest", node(VARIADIC, Builtin::MultiComparison(Direction::Greatest))),
    ("least", node(VARIADIC, Builtin::MultiComparison(Direction::Least))),
    ("collation", node(UNARY, Builtin::Collation)),
    ("bit_count", node(UNARY, Builtin::BitCount)),
    ("hex", node(UNARY, Builtin::Hex)),
    ("ceil", node(UNARY, Builtin::Ceil)),
    ("ceiling", node(UNARY, Builtin::Ceil)),
    ("lower", node(UNARY, Builtin::ChangeCase { upcase: false })),
    ("lcase", node(UNARY, Builtin::ChangeCase { upcase: false })),
    ("upper", node(UNARY, Builtin::ChangeCase { upcase: true })),
    ("ucase", node(UNARY, Builtin::ChangeCase { upcase: true })),
    ("char_length", node(UNARY, Builtin::CharLength)),
    ("character_length", node(UNARY, Builtin::CharLength)),
    ("length", node(UNARY, Builtin::Length)),
    ("octet_length", node(UNARY, Builtin::Length)),
    ("bit_length", node(UNARY, Builtin::BitLength)),
    ("ascii", node(UNARY, Builtin::Ascii)),
    ("repeat", node(BINARY, Builtin::Repeat)),
    ("from_base64", node(UNARY, Builtin::FromBase64)),
    ("to_base64", node(UNARY, Builtin::ToBase64)),
    ("json_depth", node(UNARY, Builtin::JsonDepth)),
    ("json_length", node(Arity::OneOf(&[1, 2]), Builtin::JsonLength)),
];

static FUNCTIONS: LazyLock<HashMap<&'static str, FunctionRule>> =
    LazyLock::new(|| FUNCTION_TABLE.iter().copied().collect());

/// Look up the rule for an already lower-cased name
pub fn lookup(method: &str) -> Option<FunctionRule> {
    FUNCTIONS.get(method).copied()
}

/// Build the node for `method` from translated arguments.
///
/// `method` must be lower-cased; `written` is the name as the caller spelled
/// it and is what an argument-count error reports. Returns `None` when the
/// name is not in the table, leaving the caller to report the original node.
pub fn dispatch(method: &str, written: &str, args: TupleExpr) -> Option<TranslationResult<Expr>> {
    let rule = lookup(method)?;
    if !rule.arity.accepts(args.len()) {
        log::debug!(
            "{} called with {} arguments, expected {:?}",
            written,
            args.len(),
            rule.arity
        );
        return Some(Err(TranslationError::argument_count(written)));
    }
    log::trace!("lowering {} via {:?}", method, rule.lowering);
    Some(match rule.lowering {
        Lowering::Node(kind) => Ok(Expr::builtin(kind, method, args)),
        Lowering::Rewrite(rule) => rule.apply(written, args),
    })
}
