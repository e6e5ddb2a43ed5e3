//! Operator definitions for compiled expressions.

use crate::access::Value;
use crate::sql::ast;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `<=>`: equality that treats two NULLs as equal
    NullSafeEq,
}

impl ComparisonOp {
    /// Apply the operator to an ordering; `None` means one side was NULL.
    pub fn test(&self, ordering: Option<Ordering>, left_null: bool, right_null: bool) -> Value {
        let ord = match (self, ordering) {
            (ComparisonOp::NullSafeEq, None) => return Value::Boolean(left_null && right_null),
            (_, None) => return Value::Null,
            (_, Some(ord)) => ord,
        };
        Value::Boolean(match self {
            ComparisonOp::Eq | ComparisonOp::NullSafeEq => ord == Ordering::Equal,
            ComparisonOp::Ne => ord != Ordering::Equal,
            ComparisonOp::Lt => ord == Ordering::Less,
            ComparisonOp::Le => ord != Ordering::Greater,
            ComparisonOp::Gt => ord == Ordering::Greater,
            ComparisonOp::Ge => ord != Ordering::Less,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::NullSafeEq => "<=>",
        }
    }
}

impl From<ast::ComparisonOperator> for ComparisonOp {
    fn from(op: ast::ComparisonOperator) -> Self {
        match op {
            ast::ComparisonOperator::Equal => ComparisonOp::Eq,
            ast::ComparisonOperator::NotEqual => ComparisonOp::Ne,
            ast::ComparisonOperator::Less => ComparisonOp::Lt,
            ast::ComparisonOperator::LessEqual => ComparisonOp::Le,
            ast::ComparisonOperator::Greater => ComparisonOp::Gt,
            ast::ComparisonOperator::GreaterEqual => ComparisonOp::Ge,
            ast::ComparisonOperator::NullSafeEqual => ComparisonOp::NullSafeEq,
        }
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }
}

impl From<ast::ArithmeticOperator> for ArithmeticOp {
    fn from(op: ast::ArithmeticOperator) -> Self {
        match op {
            ast::ArithmeticOperator::Plus => ArithmeticOp::Add,
            ast::ArithmeticOperator::Minus => ArithmeticOp::Sub,
            ast::ArithmeticOperator::Multiply => ArithmeticOp::Mul,
            ast::ArithmeticOperator::Divide => ArithmeticOp::Div,
            ast::ArithmeticOperator::Modulo => ArithmeticOp::Mod,
        }
    }
}

/// The check performed by an `IS` node, evaluated against the runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsPredicate {
    IsNull,
    IsNotNull,
    IsTrue,
    IsNotTrue,
    IsFalse,
    IsNotFalse,
}

impl IsPredicate {
    pub fn check(&self, value: &Value) -> bool {
        match self {
            IsPredicate::IsNull => value.is_null(),
            IsPredicate::IsNotNull => !value.is_null(),
            IsPredicate::IsTrue => value.truthy() == Some(true),
            IsPredicate::IsNotTrue => value.truthy() != Some(true),
            IsPredicate::IsFalse => value.truthy() == Some(false),
            IsPredicate::IsNotFalse => value.truthy() != Some(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IsPredicate::IsNull => "IS NULL",
            IsPredicate::IsNotNull => "IS NOT NULL",
            IsPredicate::IsTrue => "IS TRUE",
            IsPredicate::IsNotTrue => "IS NOT TRUE",
            IsPredicate::IsFalse => "IS FALSE",
            IsPredicate::IsNotFalse => "IS NOT FALSE",
        }
    }
}

impl From<ast::IsOperator> for IsPredicate {
    fn from(op: ast::IsOperator) -> Self {
        match op {
            ast::IsOperator::Null => IsPredicate::IsNull,
            ast::IsOperator::NotNull => IsPredicate::IsNotNull,
            ast::IsOperator::True => IsPredicate::IsTrue,
            ast::IsOperator::NotTrue => IsPredicate::IsNotTrue,
            ast::IsOperator::False => IsPredicate::IsFalse,
            ast::IsOperator::NotFalse => IsPredicate::IsNotFalse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_with_null() {
        assert_eq!(ComparisonOp::Eq.test(None, true, false), Value::Null);
        assert_eq!(ComparisonOp::Lt.test(None, true, true), Value::Null);
        assert_eq!(
            ComparisonOp::NullSafeEq.test(None, true, true),
            Value::Boolean(true)
        );
        assert_eq!(
            ComparisonOp::NullSafeEq.test(None, true, false),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_comparison_orderings() {
        let less = Some(Ordering::Less);
        let equal = Some(Ordering::Equal);
        assert_eq!(ComparisonOp::Eq.test(equal, false, false), Value::Boolean(true));
        assert_eq!(ComparisonOp::Ne.test(equal, false, false), Value::Boolean(false));
        assert_eq!(ComparisonOp::Lt.test(less, false, false), Value::Boolean(true));
        assert_eq!(ComparisonOp::Le.test(equal, false, false), Value::Boolean(true));
        assert_eq!(ComparisonOp::Gt.test(less, false, false), Value::Boolean(false));
        assert_eq!(ComparisonOp::Ge.test(less, false, false), Value::Boolean(false));
    }

    #[test]
    fn test_is_predicates() {
        assert!(IsPredicate::IsNull.check(&Value::Null));
        assert!(!IsPredicate::IsNull.check(&Value::Int64(0)));
        assert!(IsPredicate::IsNotNull.check(&Value::String(String::new())));
        assert!(IsPredicate::IsTrue.check(&Value::Int64(7)));
        assert!(IsPredicate::IsNotTrue.check(&Value::Null));
        assert!(IsPredicate::IsFalse.check(&Value::Boolean(false)));
        assert!(IsPredicate::IsNotFalse.check(&Value::Null));
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(ComparisonOp::Eq.as_str(), "=");
        assert_eq!(ComparisonOp::NullSafeEq.as_str(), "<=>");
        assert_eq!(LogicalOp::And.as_str(), "AND");
        assert_eq!(ArithmeticOp::Mod.as_str(), "%");
        assert_eq!(IsPredicate::IsNull.as_str(), "IS NULL");
    }
}
