//! Compiled expression tree definitions.
//!
//! Every node kind the evaluator understands is a variant of [`Expr`], so a
//! dispatch over node kinds is checked for exhaustiveness by the compiler.
//! Trees are built once by the translator and only read afterwards.

use crate::access::Value;
use crate::expression::operator::{ArithmeticOp, ComparisonOp, IsPredicate, LogicalOp};
use serde::{Deserialize, Serialize};

/// Ordered list of expressions: call arguments or a row value
pub type TupleExpr = Vec<Expr>;

/// Column reference in an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Field offset in the row (0-based)
    pub offset: usize,
    /// Optional column name for display
    pub name: Option<String>,
}

impl Column {
    pub fn new(offset: usize) -> Self {
        Self { offset, name: None }
    }

    pub fn with_name(offset: usize, name: impl Into<String>) -> Self {
        Self {
            offset,
            name: Some(name.into()),
        }
    }
}

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }
}

/// Bind variable resolved at evaluation time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindVariable {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub inner: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonExpr {
    pub binary: BinaryExpr,
    pub op: ComparisonOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpr {
    pub binary: BinaryExpr,
    pub op: LogicalOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticExpr {
    pub binary: BinaryExpr,
    pub op: ArithmeticOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsExpr {
    pub unary: UnaryExpr,
    pub predicate: IsPredicate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenThen {
    pub when: Expr,
    pub then: Expr,
}

/// Searched CASE: the first `when` that evaluates true selects its `then`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    pub cases: Vec<WhenThen>,
    pub else_expr: Option<Box<Expr>>,
}

/// `CONVERT(expr, type)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertExpr {
    pub inner: Box<Expr>,
    /// Lower-cased target type
    pub type_name: String,
    pub length: Option<i64>,
    pub scale: Option<i64>,
    pub charset: Option<String>,
}

/// `CONVERT(expr USING charset)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertUsingExpr {
    pub inner: Box<Expr>,
    pub charset: String,
}

/// `WEIGHT_STRING(expr [AS cast(len)])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStringExpr {
    pub string: Box<Expr>,
    /// Lower-cased cast type, empty when no `AS` clause was given
    pub cast: String,
    pub len: i64,
    pub has_len: bool,
}

/// Payload shared by every builtin node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub method: String,
    pub arguments: TupleExpr,
}

impl CallExpr {
    pub fn new(method: impl Into<String>, arguments: TupleExpr) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Ordering direction for GREATEST / LEAST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Greatest,
    Least,
}

impl Direction {
    /// +1 for GREATEST, -1 for LEAST
    pub fn sign(&self) -> i8 {
        match self {
            Direction::Greatest => 1,
            Direction::Least => -1,
        }
    }
}

/// One node kind per builtin operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Coalesce,
    MultiComparison(Direction),
    Collation,
    BitCount,
    Hex,
    Ceil,
    ChangeCase { upcase: bool },
    CharLength,
    Length,
    BitLength,
    Ascii,
    Repeat,
    FromBase64,
    ToBase64,
    JsonDepth,
    JsonLength,
    JsonExtract,
    JsonUnquote,
    JsonObject,
    JsonArray,
    JsonContainsPath,
    JsonKeys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltinExpr {
    pub kind: Builtin,
    pub call: CallExpr,
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Column(Column),
    BindVariable(BindVariable),
    Tuple(TupleExpr),
    Comparison(ComparisonExpr),
    Is(IsExpr),
    Logical(LogicalExpr),
    Not(UnaryExpr),
    Negate(UnaryExpr),
    Arithmetic(ArithmeticExpr),
    Case(CaseExpr),
    Convert(ConvertExpr),
    ConvertUsing(ConvertUsingExpr),
    WeightString(WeightStringExpr),
    Builtin(BuiltinExpr),
}

impl Expr {
    /// Create a literal expression
    pub fn literal(value: Value) -> Self {
        Expr::Literal(Literal::new(value))
    }

    /// The NULL literal
    pub fn null() -> Self {
        Expr::Literal(Literal::null())
    }

    /// Create a column reference expression
    pub fn column(offset: usize) -> Self {
        Expr::Column(Column::new(offset))
    }

    /// Create a column reference with name
    pub fn column_with_name(offset: usize, name: impl Into<String>) -> Self {
        Expr::Column(Column::with_name(offset, name))
    }

    pub fn is(predicate: IsPredicate, operand: Expr) -> Self {
        Expr::Is(IsExpr {
            unary: UnaryExpr {
                inner: Box::new(operand),
            },
            predicate,
        })
    }

    /// Create an IS NULL expression
    pub fn is_null(operand: Expr) -> Self {
        Self::is(IsPredicate::IsNull, operand)
    }

    pub fn comparison(op: ComparisonOp, left: Expr, right: Expr) -> Self {
        Expr::Comparison(ComparisonExpr {
            binary: BinaryExpr::new(left, right),
            op,
        })
    }

    /// Create an equality expression
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::comparison(ComparisonOp::Eq, left, right)
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Expr::Logical(LogicalExpr {
            binary: BinaryExpr::new(left, right),
            op,
        })
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Expr::Arithmetic(ArithmeticExpr {
            binary: BinaryExpr::new(left, right),
            op,
        })
    }

    /// Create a builtin call node
    pub fn builtin(kind: Builtin, method: impl Into<String>, arguments: TupleExpr) -> Self {
        Expr::Builtin(BuiltinExpr {
            kind,
            call: CallExpr::new(method, arguments),
        })
    }
}

impl BinaryExpr {
    pub fn new(left: Expr, right: Expr) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column() {
        let col1 = Column::new(0);
        assert_eq!(col1.offset, 0);
        assert!(col1.name.is_none());

        let col2 = Column::with_name(1, "age");
        assert_eq!(col2.offset, 1);
        assert_eq!(col2.name.as_deref(), Some("age"));
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Greatest.sign(), 1);
        assert_eq!(Direction::Least.sign(), -1);
    }

    #[test]
    fn test_compiled_trees_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expr>();
    }
}
