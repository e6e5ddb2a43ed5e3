// SQL expression AST definitions, as handed over by the parser

use crate::access::Value;
use serde::{Deserialize, Serialize};

/// Possibly-qualified column name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColName {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    // Literals
    Literal(Value),
    Null,

    // Column reference
    Column(ColName),

    // Bind parameter, `:name`
    Argument(String),

    // Comparison (`=`, `<`, `<=>`, ...)
    Comparison {
        left: Box<Expr>,
        op: ComparisonOperator,
        right: Box<Expr>,
    },

    // `expr IS [NOT] NULL|TRUE|FALSE`
    Is {
        expr: Box<Expr>,
        op: IsOperator,
    },

    // Logical operations
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),

    // Arithmetic
    Arithmetic {
        left: Box<Expr>,
        op: ArithmeticOperator,
        right: Box<Expr>,
    },
    Negate(Box<Expr>),

    // CASE expression
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<WhenClause>,
        else_clause: Option<Box<Expr>>,
    },

    // Row constructor `(a, b, ...)`
    Tuple(Vec<Expr>),

    // `left->right` and `left->>right`
    JsonExtractOp {
        left: Box<Expr>,
        right: Box<Expr>,
        unquote: bool,
    },

    // Anything that looks like a call
    Callable(Callable),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    NullSafeEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsOperator {
    Null,
    NotNull,
    True,
    NotTrue,
    False,
    NotFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

/// One argument of a plain function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectExpr {
    Aliased(AliasedExpr),
    Star(StarExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasedExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarExpr {
    pub table: Option<String>,
}

/// The closed set of call-like constructs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callable {
    Func(FuncExpr),
    Convert(ConvertExpr),
    ConvertUsing(ConvertUsingExpr),
    WeightString(WeightStringFuncExpr),
    JsonExtract(JsonExtractExpr),
    JsonUnquote(JsonUnquoteExpr),
    JsonObject(JsonObjectExpr),
    JsonArray(JsonArrayExpr),
    JsonContainsPath(JsonContainsPathExpr),
    JsonKeys(JsonKeysExpr),
    Substr(SubstrExpr),
    JsonQuote(JsonQuoteExpr),
    CurTime(CurTimeFuncExpr),
}

/// `name([DISTINCT] arg, ...)`; `name` keeps the spelling used in the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncExpr {
    pub name: String,
    pub distinct: bool,
    pub exprs: Vec<SelectExpr>,
}

/// `CONVERT(expr, type)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertExpr {
    pub expr: Box<Expr>,
    pub ty: ConvertType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertType {
    pub type_name: String,
    pub length: Option<Box<Expr>>,
    pub scale: Option<Box<Expr>>,
    pub charset: Option<String>,
}

/// `CONVERT(expr USING charset)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertUsingExpr {
    pub expr: Box<Expr>,
    pub charset: String,
}

/// `WEIGHT_STRING(expr [AS type(len)])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStringFuncExpr {
    pub expr: Box<Expr>,
    pub cast: Option<WeightStringCast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStringCast {
    pub type_name: String,
    pub length: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExtractExpr {
    pub doc: Box<Expr>,
    pub paths: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonUnquoteExpr {
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonObjectExpr {
    pub params: Vec<JsonObjectParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonObjectParam {
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonArrayExpr {
    pub params: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonContainsPathExpr {
    pub doc: Box<Expr>,
    pub one_or_all: Box<Expr>,
    pub paths: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonKeysExpr {
    pub doc: Box<Expr>,
    pub path: Option<Box<Expr>>,
}

/// `SUBSTR(expr, from [, len])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstrExpr {
    pub expr: Box<Expr>,
    pub from: Box<Expr>,
    pub len: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonQuoteExpr {
    pub value: Box<Expr>,
}

/// `CURTIME([fsp])` and friends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurTimeFuncExpr {
    pub name: String,
    pub fsp: Option<i64>,
}

impl Expr {
    /// Create a literal expression from a value
    pub fn literal(value: Value) -> Self {
        Expr::Literal(value)
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Value::Int64(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Value::String(value.into()))
    }

    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(ColName::new(name))
    }

    /// Create a qualified column reference (table.column)
    pub fn qualified_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column(ColName::qualified(table, column))
    }

    pub fn argument(name: impl Into<String>) -> Self {
        Expr::Argument(name.into())
    }

    /// Create a plain function call with unaliased arguments
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Callable(Callable::Func(FuncExpr::new(name, args)))
    }

    /// Create an equality comparison
    pub fn eq(self, other: Expr) -> Self {
        Expr::Comparison {
            left: Box::new(self),
            op: ComparisonOperator::Equal,
            right: Box::new(other),
        }
    }

    /// Create a greater than comparison
    pub fn gt(self, other: Expr) -> Self {
        Expr::Comparison {
            left: Box::new(self),
            op: ComparisonOperator::Greater,
            right: Box::new(other),
        }
    }

    pub fn is_null(self) -> Self {
        Expr::Is {
            expr: Box::new(self),
            op: IsOperator::Null,
        }
    }

    /// Create an AND expression
    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Create an OR expression
    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// `self->path`
    pub fn json_extract_op(self, path: Expr) -> Self {
        Expr::JsonExtractOp {
            left: Box::new(self),
            right: Box::new(path),
            unquote: false,
        }
    }

    /// `self->>path`
    pub fn json_unquote_extract_op(self, path: Expr) -> Self {
        Expr::JsonExtractOp {
            left: Box::new(self),
            right: Box::new(path),
            unquote: true,
        }
    }
}

impl From<Callable> for Expr {
    fn from(call: Callable) -> Self {
        Expr::Callable(call)
    }
}

impl FuncExpr {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            distinct: false,
            exprs: args
                .into_iter()
                .map(|expr| SelectExpr::Aliased(AliasedExpr { expr, alias: None }))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_builders() {
        let expr = Expr::column("age")
            .gt(Expr::int(18))
            .and(Expr::column("status").eq(Expr::string("active")));

        match expr {
            Expr::And(left, _) => assert!(matches!(*left, Expr::Comparison { .. })),
            _ => panic!("Expected AND expression"),
        }
    }

    #[test]
    fn test_func_builder_aliases_every_argument() {
        let expr = Expr::func("IFNULL", vec![Expr::column("a"), Expr::int(0)]);
        let Expr::Callable(Callable::Func(func)) = expr else {
            panic!("Expected function call");
        };
        assert_eq!(func.name, "IFNULL");
        assert!(!func.distinct);
        assert_eq!(func.exprs.len(), 2);
        assert!(func
            .exprs
            .iter()
            .all(|e| matches!(e, SelectExpr::Aliased(AliasedExpr { alias: None, .. }))));
    }
}
