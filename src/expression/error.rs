//! Error types for expression translation and evaluation.

use crate::access::DataType;
use crate::sql::ast;
use thiserror::Error;

/// Message prefix for constructs the translator cannot lower
pub const ERR_EVALUATED_EXPR_NOT_SUPPORTED: &str = "expr cannot be translated, not supported";

/// MySQL `ER_WRONG_PARAMCOUNT_TO_NATIVE_FCT`
pub const ER_WRONG_PARAMCOUNT_TO_NATIVE_FCT: u16 = 1582;

/// Category of a translation failure, for callers rendering diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The construct parses but is semantically illegal where it appears
    InvalidArgument,
    /// The construct is not lowered by this translator
    Unimplemented,
}

/// Errors that can occur while lowering an AST into a compiled expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// A known function was called with a disallowed number of arguments
    #[error("Incorrect parameter count in the call to native function '{function}'")]
    ArgumentCount { function: String },

    /// Syntax the translator does not lower; carries the offending node
    #[error("{}: {node}", ERR_EVALUATED_EXPR_NOT_SUPPORTED)]
    Unsupported { node: Box<ast::Expr> },

    /// Parses, but is not legal in this position
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Column access without a resolver, or an unknown column
    #[error("cannot lookup column '{column}' (column access not supported here)")]
    UnresolvedColumn { column: String },
}

impl TranslationError {
    pub fn argument_count(function: impl Into<String>) -> Self {
        TranslationError::ArgumentCount {
            function: function.into(),
        }
    }

    pub fn unsupported(node: impl Into<ast::Expr>) -> Self {
        TranslationError::Unsupported {
            node: Box::new(node.into()),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TranslationError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TranslationError::ArgumentCount { .. } | TranslationError::InvalidArgument { .. } => {
                ErrorCode::InvalidArgument
            }
            TranslationError::Unsupported { .. } | TranslationError::UnresolvedColumn { .. } => {
                ErrorCode::Unimplemented
            }
        }
    }

    /// The MySQL error number, where one applies
    pub fn mysql_errno(&self) -> Option<u16> {
        match self {
            TranslationError::ArgumentCount { .. } => Some(ER_WRONG_PARAMCOUNT_TO_NATIVE_FCT),
            _ => None,
        }
    }
}

/// Result type for translation
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Errors that can occur during expression evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Column offset {offset} out of bounds for row with {row_size} columns")]
    ColumnOffsetOutOfBounds { offset: usize, row_size: usize },

    #[error("Missing bind variable: {key}")]
    MissingBindVariable { key: String },

    #[error("Invalid operand types for operator {operator}: left={left_type:?}, right={right_type:?}")]
    InvalidOperandTypes {
        operator: String,
        left_type: Option<DataType>,
        right_type: Option<DataType>,
    },

    #[error("Builtin {method} cannot be evaluated here")]
    UnsupportedBuiltin { method: String },

    #[error("Cannot convert to {type_name}")]
    UnsupportedConversion { type_name: String },

    #[error("Expression evaluation error: {message}")]
    EvaluationError { message: String },
}

/// Result type for expression evaluation
pub type ExpressionResult<T> = Result<T, ExpressionError>;
