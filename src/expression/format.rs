// SQL-like rendering of compiled expressions, used for logging and the CLI

use super::expr::*;
use std::fmt::{self, Display, Formatter};

fn comma_list(f: &mut Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Comparison(_)
            | Expr::Is(_)
            | Expr::Logical(_)
            | Expr::Not(_)
            | Expr::Arithmetic(_) => write!(f, "({})", self.0),
            other => write!(f, "{}", other),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "[COLUMN {}]", self.offset),
        }
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;
        comma_list(f, &self.arguments)?;
        write!(f, ")")
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit.value),
            Expr::Column(col) => write!(f, "{}", col),
            Expr::BindVariable(bind) => write!(f, ":{}", bind.key),
            Expr::Tuple(exprs) => {
                write!(f, "(")?;
                comma_list(f, exprs)?;
                write!(f, ")")
            }
            Expr::Comparison(cmp) => write!(
                f,
                "{} {} {}",
                Operand(&cmp.binary.left),
                cmp.op.as_str(),
                Operand(&cmp.binary.right)
            ),
            Expr::Is(is) => write!(f, "{} {}", Operand(&is.unary.inner), is.predicate.as_str()),
            Expr::Logical(logical) => write!(
                f,
                "{} {} {}",
                Operand(&logical.binary.left),
                logical.op.as_str(),
                Operand(&logical.binary.right)
            ),
            Expr::Not(unary) => write!(f, "NOT {}", Operand(&unary.inner)),
            Expr::Negate(unary) => write!(f, "-{}", Operand(&unary.inner)),
            Expr::Arithmetic(arith) => write!(
                f,
                "{} {} {}",
                Operand(&arith.binary.left),
                arith.op.as_str(),
                Operand(&arith.binary.right)
            ),
            Expr::Case(case) => {
                write!(f, "CASE")?;
                for branch in &case.cases {
                    write!(f, " WHEN {} THEN {}", branch.when, branch.then)?;
                }
                if let Some(else_expr) = &case.else_expr {
                    write!(f, " ELSE {}", else_expr)?;
                }
                write!(f, " END")
            }
            Expr::Convert(convert) => {
                write!(f, "CONVERT({}, {}", convert.inner, convert.type_name)?;
                match (convert.length, convert.scale) {
                    (Some(len), Some(scale)) => write!(f, "({}, {})", len, scale)?,
                    (Some(len), None) => write!(f, "({})", len)?,
                    _ => {}
                }
                if let Some(charset) = &convert.charset {
                    write!(f, " CHARACTER SET {}", charset)?;
                }
                write!(f, ")")
            }
            Expr::ConvertUsing(convert) => {
                write!(f, "CONVERT({} USING {})", convert.inner, convert.charset)
            }
            Expr::WeightString(ws) => {
                write!(f, "WEIGHT_STRING({}", ws.string)?;
                if !ws.cast.is_empty() {
                    write!(f, " AS {}", ws.cast)?;
                    if ws.has_len {
                        write!(f, "({})", ws.len)?;
                    }
                }
                write!(f, ")")
            }
            Expr::Builtin(builtin) => write!(f, "{}", builtin.call),
        }
    }
}
