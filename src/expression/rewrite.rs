//! Functions lowered into compositions of primitive nodes instead of a
//! dedicated builtin node.

use crate::expression::error::{TranslationError, TranslationResult};
use crate::expression::expr::{Builtin, CaseExpr, Expr, WhenThen};

/// `ISNULL(x)` => `x IS NULL`
pub fn is_null(x: Expr) -> Expr {
    Expr::is_null(x)
}

/// `IFNULL(x, y)` => `CASE WHEN x IS NULL THEN y ELSE x END`
pub fn if_null(x: Expr, y: Expr) -> Expr {
    Expr::Case(CaseExpr {
        cases: vec![WhenThen {
            when: Expr::is_null(x.clone()),
            then: y,
        }],
        else_expr: Some(Box::new(x)),
    })
}

/// `NULLIF(x, y)` => `CASE WHEN x = y THEN NULL ELSE x END`
///
/// `x` appears twice in the result.
pub fn null_if(x: Expr, y: Expr) -> Expr {
    Expr::Case(CaseExpr {
        cases: vec![WhenThen {
            when: Expr::eq(x.clone(), y),
            then: Expr::null(),
        }],
        else_expr: Some(Box::new(x)),
    })
}

/// `left->right`; only a column may stand on the left of the operator.
pub fn json_extract(left: Expr, right: Expr) -> TranslationResult<Expr> {
    if !matches!(left, Expr::Column(_)) {
        return Err(TranslationError::invalid_argument(
            "lhs of a JSON extract operator must be a column",
        ));
    }
    Ok(Expr::builtin(
        Builtin::JsonExtract,
        "JSON_EXTRACT",
        vec![left, right],
    ))
}

/// `left->>right` => `JSON_UNQUOTE(left->right)`
pub fn json_extract_unquote(left: Expr, right: Expr) -> TranslationResult<Expr> {
    let extract = json_extract(left, right)?;
    Ok(Expr::builtin(
        Builtin::JsonUnquote,
        "JSON_UNQUOTE",
        vec![extract],
    ))
}

/// Rewrites reachable from the function dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    IsNull,
    IfNull,
    NullIf,
}

impl RewriteRule {
    /// Apply the rewrite to already-translated arguments. `function` is the
    /// name as the caller spelled it, used if the argument count is wrong.
    pub fn apply(self, function: &str, args: Vec<Expr>) -> TranslationResult<Expr> {
        match self {
            RewriteRule::IsNull => {
                let [x] = operands(function, args)?;
                Ok(is_null(x))
            }
            RewriteRule::IfNull => {
                let [x, y] = operands(function, args)?;
                Ok(if_null(x, y))
            }
            RewriteRule::NullIf => {
                let [x, y] = operands(function, args)?;
                Ok(null_if(x, y))
            }
        }
    }
}

fn operands<const N: usize>(function: &str, args: Vec<Expr>) -> TranslationResult<[Expr; N]> {
    args.try_into()
        .map_err(|_: Vec<Expr>| TranslationError::argument_count(function))
}
