//! Lowering of parsed SQL expressions into compiled expression trees.
//!
//! This module provides:
//! - The compiled expression tree and its operators
//! - Translation from the SQL AST, including builtin function dispatch
//! - Rewrites of ISNULL/IFNULL/NULLIF and the JSON `->`/`->>` shorthands
//! - A reference evaluator and a binary codec for compiled trees

pub mod call;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod operator;
pub mod rewrite;
pub mod translate;

pub use config::{ColumnResolver, Config};
pub use error::{ErrorCode, ExpressionError, ExpressionResult, TranslationError, TranslationResult};
pub use eval::{evaluate_expression, ExpressionEvaluator};
pub use expr::{Builtin, CallExpr, Expr, TupleExpr};
pub use operator::{ArithmeticOp, ComparisonOp, IsPredicate, LogicalOp};
pub use translate::{translate, AstCompiler};
