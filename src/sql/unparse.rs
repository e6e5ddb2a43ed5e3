// Renders AST nodes back to SQL text for diagnostics

use super::ast::*;
use std::fmt::{self, Display, Formatter};

/// Writes `items` separated by ", "
fn comma_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Operands that are themselves operator expressions get parenthesized
struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Comparison { .. }
            | Expr::Is { .. }
            | Expr::And(..)
            | Expr::Or(..)
            | Expr::Not(_)
            | Expr::Arithmetic { .. } => write!(f, "({})", self.0),
            other => write!(f, "{}", other),
        }
    }
}

impl Display for ColName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::NullSafeEqual => "<=>",
        }
    }
}

impl IsOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsOperator::Null => "is null",
            IsOperator::NotNull => "is not null",
            IsOperator::True => "is true",
            IsOperator::NotTrue => "is not true",
            IsOperator::False => "is false",
            IsOperator::NotFalse => "is not false",
        }
    }
}

impl ArithmeticOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOperator::Plus => "+",
            ArithmeticOperator::Minus => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Null => write!(f, "null"),
            Expr::Column(col) => write!(f, "{}", col),
            Expr::Argument(name) => write!(f, ":{}", name),
            Expr::Comparison { left, op, right } => {
                write!(f, "{} {} {}", Operand(left), op.as_str(), Operand(right))
            }
            Expr::Is { expr, op } => write!(f, "{} {}", Operand(expr), op.as_str()),
            Expr::And(left, right) => write!(f, "{} and {}", Operand(left), Operand(right)),
            Expr::Or(left, right) => write!(f, "{} or {}", Operand(left), Operand(right)),
            Expr::Not(inner) => write!(f, "not {}", Operand(inner)),
            Expr::Arithmetic { left, op, right } => {
                write!(f, "{} {} {}", Operand(left), op.as_str(), Operand(right))
            }
            Expr::Negate(inner) => write!(f, "-{}", Operand(inner)),
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                write!(f, "case")?;
                if let Some(operand) = operand {
                    write!(f, " {}", operand)?;
                }
                for when in when_clauses {
                    write!(f, " when {} then {}", when.condition, when.result)?;
                }
                if let Some(else_clause) = else_clause {
                    write!(f, " else {}", else_clause)?;
                }
                write!(f, " end")
            }
            Expr::Tuple(exprs) => {
                write!(f, "(")?;
                comma_list(f, exprs)?;
                write!(f, ")")
            }
            Expr::JsonExtractOp {
                left,
                right,
                unquote,
            } => {
                let op = if *unquote { "->>" } else { "->" };
                write!(f, "{}{}{}", Operand(left), op, Operand(right))
            }
            Expr::Callable(call) => write!(f, "{}", call),
        }
    }
}

impl Display for SelectExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SelectExpr::Aliased(aliased) => match &aliased.alias {
                Some(alias) => write!(f, "{} as {}", aliased.expr, alias),
                None => write!(f, "{}", aliased.expr),
            },
            SelectExpr::Star(star) => match &star.table {
                Some(table) => write!(f, "{}.*", table),
                None => write!(f, "*"),
            },
        }
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Func(func) => {
                write!(f, "{}(", func.name)?;
                if func.distinct {
                    write!(f, "distinct ")?;
                }
                comma_list(f, &func.exprs)?;
                write!(f, ")")
            }
            Callable::Convert(convert) => {
                write!(f, "convert({}, {}", convert.expr, convert.ty.type_name)?;
                match (&convert.ty.length, &convert.ty.scale) {
                    (Some(len), Some(scale)) => write!(f, "({}, {})", len, scale)?,
                    (Some(len), None) => write!(f, "({})", len)?,
                    _ => {}
                }
                if let Some(charset) = &convert.ty.charset {
                    write!(f, " character set {}", charset)?;
                }
                write!(f, ")")
            }
            Callable::ConvertUsing(convert) => {
                write!(f, "convert({} using {})", convert.expr, convert.charset)
            }
            Callable::WeightString(ws) => {
                write!(f, "weight_string({}", ws.expr)?;
                if let Some(cast) = &ws.cast {
                    write!(f, " as {}", cast.type_name)?;
                    if let Some(len) = &cast.length {
                        write!(f, "({})", len)?;
                    }
                }
                write!(f, ")")
            }
            Callable::JsonExtract(call) => {
                write!(f, "json_extract({}", call.doc)?;
                for path in &call.paths {
                    write!(f, ", {}", path)?;
                }
                write!(f, ")")
            }
            Callable::JsonUnquote(call) => write!(f, "json_unquote({})", call.value),
            Callable::JsonObject(call) => {
                write!(f, "json_object(")?;
                for (i, param) in call.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}, {}", param.key, param.value)?;
                }
                write!(f, ")")
            }
            Callable::JsonArray(call) => {
                write!(f, "json_array(")?;
                comma_list(f, &call.params)?;
                write!(f, ")")
            }
            Callable::JsonContainsPath(call) => {
                write!(f, "json_contains_path({}, {}", call.doc, call.one_or_all)?;
                for path in &call.paths {
                    write!(f, ", {}", path)?;
                }
                write!(f, ")")
            }
            Callable::JsonKeys(call) => match &call.path {
                Some(path) => write!(f, "json_keys({}, {})", call.doc, path),
                None => write!(f, "json_keys({})", call.doc),
            },
            Callable::Substr(call) => match &call.len {
                Some(len) => write!(f, "substr({}, {}, {})", call.expr, call.from, len),
                None => write!(f, "substr({}, {})", call.expr, call.from),
            },
            Callable::JsonQuote(call) => write!(f, "json_quote({})", call.value),
            Callable::CurTime(call) => match call.fsp {
                Some(fsp) => write!(f, "{}({})", call.name, fsp),
                None => write!(f, "{}()", call.name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;

    #[test]
    fn test_unparse_function_call() {
        let expr = Expr::func("IFNULL", vec![Expr::column("a"), Expr::int(0)]);
        assert_eq!(expr.to_string(), "IFNULL(a, 0)");
    }

    #[test]
    fn test_unparse_distinct_and_star() {
        let call = Callable::Func(FuncExpr {
            name: "count".to_string(),
            distinct: true,
            exprs: vec![SelectExpr::Star(StarExpr {
                table: Some("t".to_string()),
            })],
        });
        assert_eq!(call.to_string(), "count(distinct t.*)");
    }

    #[test]
    fn test_unparse_nested_operators() {
        let expr = Expr::column("a")
            .eq(Expr::int(1))
            .or(Expr::qualified_column("t", "b").is_null());
        assert_eq!(expr.to_string(), "(a = 1) or (t.b is null)");
    }

    #[test]
    fn test_unparse_special_forms() {
        let convert = Callable::Convert(ConvertExpr {
            expr: Box::new(Expr::column("a")),
            ty: ConvertType {
                type_name: "CHAR".to_string(),
                length: Some(Box::new(Expr::int(10))),
                scale: None,
                charset: Some("utf8mb4".to_string()),
            },
        });
        assert_eq!(convert.to_string(), "convert(a, CHAR(10) character set utf8mb4)");

        let ws = Callable::WeightString(WeightStringFuncExpr {
            expr: Box::new(Expr::column("name")),
            cast: Some(WeightStringCast {
                type_name: "CHAR".to_string(),
                length: Some(Box::new(Expr::int(3))),
            }),
        });
        assert_eq!(ws.to_string(), "weight_string(name as CHAR(3))");

        let keys = Callable::JsonKeys(JsonKeysExpr {
            doc: Box::new(Expr::column("doc")),
            path: Some(Box::new(Expr::string("$.a"))),
        });
        assert_eq!(keys.to_string(), "json_keys(doc, '$.a')");

        let shorthand = Expr::column("doc").json_unquote_extract_op(Expr::string("$.name"));
        assert_eq!(shorthand.to_string(), "doc->>'$.name'");

        let null_lit = Expr::Literal(Value::Null);
        assert_eq!(null_lit.to_string(), "null");
    }
}
