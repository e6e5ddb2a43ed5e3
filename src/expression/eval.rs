//! Reference evaluation of compiled expressions against a row.

use crate::access::Value;
use crate::expression::expr::{
    ArithmeticExpr, Builtin, BuiltinExpr, CaseExpr, Column, ComparisonExpr, ConvertExpr, Direction,
    Expr, LogicalExpr,
};
use crate::expression::operator::{ArithmeticOp, LogicalOp};
use crate::expression::{ExpressionError, ExpressionResult};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Longest string a builtin may produce, MySQL's default `max_allowed_packet`
const MAX_RESULT_LENGTH: usize = 64 * 1024 * 1024;

/// Evaluator for compiled expressions
pub struct ExpressionEvaluator<'a> {
    /// The row values to evaluate against
    row: &'a [Value],
    /// Bind variables referenced by the expression
    bind_vars: Option<&'a HashMap<String, Value>>,
}

impl<'a> ExpressionEvaluator<'a> {
    /// Create a new evaluator over a row
    pub fn new(row: &'a [Value]) -> Self {
        Self {
            row,
            bind_vars: None,
        }
    }

    pub fn with_bind_vars(mut self, bind_vars: &'a HashMap<String, Value>) -> Self {
        self.bind_vars = Some(bind_vars);
        self
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expr) -> ExpressionResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(lit.value.clone()),

            Expr::Column(col) => self.evaluate_column(col),

            Expr::BindVariable(bind) => self
                .bind_vars
                .and_then(|vars| vars.get(&bind.key))
                .cloned()
                .ok_or_else(|| ExpressionError::MissingBindVariable {
                    key: bind.key.clone(),
                }),

            Expr::Tuple(_) => Err(ExpressionError::EvaluationError {
                message: "Operand should contain 1 column(s)".to_string(),
            }),

            Expr::Comparison(ComparisonExpr { binary, op }) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                Ok(op.test(left.sql_cmp(&right), left.is_null(), right.is_null()))
            }

            Expr::Is(is) => {
                let value = self.evaluate(&is.unary.inner)?;
                Ok(Value::Boolean(is.predicate.check(&value)))
            }

            Expr::Logical(logical) => self.evaluate_logical(logical),

            Expr::Not(unary) => Ok(match self.evaluate(&unary.inner)?.truthy() {
                Some(b) => Value::Boolean(!b),
                None => Value::Null,
            }),

            Expr::Negate(unary) => match self.evaluate(&unary.inner)? {
                Value::Null => Ok(Value::Null),
                Value::Int64(n) => n.checked_neg().map(Value::Int64).ok_or_else(out_of_range),
                Value::Float64(f) => Ok(Value::Float64(-f)),
                other => Ok(Value::Float64(-other.as_f64().unwrap_or(0.0))),
            },

            Expr::Arithmetic(arith) => self.evaluate_arithmetic(arith),

            Expr::Case(case) => self.evaluate_case(case),

            Expr::Convert(convert) => self.evaluate_convert(convert),

            Expr::ConvertUsing(convert) => Ok(match self.evaluate(&convert.inner)? {
                Value::Null => Value::Null,
                other => Value::String(to_text(&other)),
            }),

            Expr::WeightString(_) => Err(ExpressionError::UnsupportedBuiltin {
                method: "WEIGHT_STRING".to_string(),
            }),

            Expr::Builtin(builtin) => self.evaluate_builtin(builtin),
        }
    }

    /// Evaluate a column reference
    fn evaluate_column(&self, col: &Column) -> ExpressionResult<Value> {
        self.row
            .get(col.offset)
            .cloned()
            .ok_or(ExpressionError::ColumnOffsetOutOfBounds {
                offset: col.offset,
                row_size: self.row.len(),
            })
    }

    /// AND/OR with three-valued logic
    fn evaluate_logical(&self, logical: &LogicalExpr) -> ExpressionResult<Value> {
        let left = self.evaluate(&logical.binary.left)?.truthy();
        let right = self.evaluate(&logical.binary.right)?.truthy();
        let result = match logical.op {
            // NULL AND false = false, NULL AND true = NULL
            LogicalOp::And => match (left, right) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            // NULL OR true = true, NULL OR false = NULL
            LogicalOp::Or => match (left, right) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        };
        Ok(result.map(Value::Boolean).unwrap_or(Value::Null))
    }

    fn evaluate_arithmetic(&self, arith: &ArithmeticExpr) -> ExpressionResult<Value> {
        let left = self.evaluate(&arith.binary.left)?;
        let right = self.evaluate(&arith.binary.right)?;
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        if let (Value::Int64(a), Value::Int64(b)) = (&left, &right) {
            let (a, b) = (*a, *b);
            return match arith.op {
                ArithmeticOp::Add => a.checked_add(b).map(Value::Int64).ok_or_else(out_of_range),
                ArithmeticOp::Sub => a.checked_sub(b).map(Value::Int64).ok_or_else(out_of_range),
                ArithmeticOp::Mul => a.checked_mul(b).map(Value::Int64).ok_or_else(out_of_range),
                // division by zero yields NULL
                ArithmeticOp::Div if b == 0 => Ok(Value::Null),
                ArithmeticOp::Div => Ok(Value::Float64(a as f64 / b as f64)),
                ArithmeticOp::Mod if b == 0 => Ok(Value::Null),
                ArithmeticOp::Mod => Ok(Value::Int64(a.wrapping_rem(b))),
            };
        }

        let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
            return Err(ExpressionError::InvalidOperandTypes {
                operator: arith.op.as_str().to_string(),
                left_type: left.data_type(),
                right_type: right.data_type(),
            });
        };
        Ok(match arith.op {
            ArithmeticOp::Add => Value::Float64(a + b),
            ArithmeticOp::Sub => Value::Float64(a - b),
            ArithmeticOp::Mul => Value::Float64(a * b),
            ArithmeticOp::Div | ArithmeticOp::Mod if b == 0.0 => Value::Null,
            ArithmeticOp::Div => Value::Float64(a / b),
            ArithmeticOp::Mod => Value::Float64(a % b),
        })
    }

    fn evaluate_case(&self, case: &CaseExpr) -> ExpressionResult<Value> {
        for branch in &case.cases {
            if self.evaluate(&branch.when)?.truthy() == Some(true) {
                return self.evaluate(&branch.then);
            }
        }
        match &case.else_expr {
            Some(else_expr) => self.evaluate(else_expr),
            None => Ok(Value::Null),
        }
    }

    fn evaluate_convert(&self, convert: &ConvertExpr) -> ExpressionResult<Value> {
        let value = self.evaluate(&convert.inner)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        match convert.type_name.as_str() {
            "signed" | "signed integer" => Ok(Value::Int64(match value {
                Value::Float64(f) => f.round() as i64,
                other => other.as_i64().unwrap_or(0),
            })),
            "char" | "nchar" => {
                let text = to_text(&value);
                Ok(Value::String(match convert.length {
                    Some(len) => text.chars().take(len.max(0) as usize).collect(),
                    None => text,
                }))
            }
            "double" | "real" | "float" => Ok(Value::Float64(value.as_f64().unwrap_or(0.0))),
            "decimal" => {
                let f = value.as_f64().unwrap_or(0.0);
                let scale = convert.scale.unwrap_or(0).clamp(0, 30) as i32;
                let factor = 10f64.powi(scale);
                Ok(Value::Float64((f * factor).round() / factor))
            }
            other => Err(ExpressionError::UnsupportedConversion {
                type_name: other.to_string(),
            }),
        }
    }

    fn evaluate_builtin(&self, builtin: &BuiltinExpr) -> ExpressionResult<Value> {
        let args = &builtin.call.arguments;
        match builtin.kind {
            Builtin::Coalesce => {
                for arg in args {
                    let value = self.evaluate(arg)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Ok(Value::Null)
            }

            Builtin::MultiComparison(direction) => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                if values.iter().any(Value::is_null) {
                    return Ok(Value::Null);
                }
                let wanted = match direction {
                    Direction::Greatest => Ordering::Greater,
                    Direction::Least => Ordering::Less,
                };
                let mut best: Option<Value> = None;
                for value in values {
                    best = match best {
                        Some(current) if value.sql_cmp(&current) != Some(wanted) => Some(current),
                        _ => Some(value),
                    };
                }
                Ok(best.unwrap_or(Value::Null))
            }

            Builtin::ChangeCase { upcase } => self.unary_text(builtin, |s| {
                Value::String(if upcase {
                    s.to_uppercase()
                } else {
                    s.to_lowercase()
                })
            }),

            Builtin::Length => self.unary_text(builtin, |s| Value::Int64(s.len() as i64)),

            Builtin::CharLength => {
                self.unary_text(builtin, |s| Value::Int64(s.chars().count() as i64))
            }

            Builtin::BitLength => self.unary_text(builtin, |s| Value::Int64(s.len() as i64 * 8)),

            Builtin::Ascii => self.unary_text(builtin, |s| {
                Value::Int64(s.as_bytes().first().copied().unwrap_or(0) as i64)
            }),

            Builtin::Repeat => {
                let (text, count) = match args.as_slice() {
                    [text, count] => (self.evaluate(text)?, self.evaluate(count)?),
                    _ => return Err(arity_violation(builtin)),
                };
                match (&text, count.as_i64()) {
                    (Value::Null, _) | (_, None) => Ok(Value::Null),
                    (text, Some(n)) => {
                        let text = to_text(text);
                        let times = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
                        // oversized results are NULL, as with max_allowed_packet
                        match text.len().checked_mul(times) {
                            Some(len) if len <= MAX_RESULT_LENGTH => {
                                Ok(Value::String(text.repeat(times)))
                            }
                            _ => Ok(Value::Null),
                        }
                    }
                }
            }

            Builtin::Hex => Ok(match self.unary_value(builtin)? {
                Value::Null => Value::Null,
                Value::String(s) => {
                    Value::String(s.bytes().map(|b| format!("{:02X}", b)).collect())
                }
                Value::Float64(f) => Value::String(format!("{:X}", f.round() as i64 as u64)),
                other => Value::String(format!("{:X}", other.as_i64().unwrap_or(0) as u64)),
            }),

            Builtin::Ceil => Ok(match self.unary_value(builtin)? {
                Value::Null => Value::Null,
                Value::Int64(n) => Value::Int64(n),
                other => Value::Float64(other.as_f64().unwrap_or(0.0).ceil()),
            }),

            Builtin::BitCount => Ok(match self.unary_value(builtin)? {
                Value::Null => Value::Null,
                other => Value::Int64((other.as_i64().unwrap_or(0) as u64).count_ones() as i64),
            }),

            Builtin::Collation
            | Builtin::FromBase64
            | Builtin::ToBase64
            | Builtin::JsonDepth
            | Builtin::JsonLength
            | Builtin::JsonExtract
            | Builtin::JsonUnquote
            | Builtin::JsonObject
            | Builtin::JsonArray
            | Builtin::JsonContainsPath
            | Builtin::JsonKeys => Err(ExpressionError::UnsupportedBuiltin {
                method: builtin.call.method.clone(),
            }),
        }
    }

    fn unary_value(&self, builtin: &BuiltinExpr) -> ExpressionResult<Value> {
        match builtin.call.arguments.as_slice() {
            [arg] => self.evaluate(arg),
            _ => Err(arity_violation(builtin)),
        }
    }

    /// Evaluate a single-argument string function; NULL in, NULL out.
    fn unary_text<F>(&self, builtin: &BuiltinExpr, f: F) -> ExpressionResult<Value>
    where
        F: FnOnce(&str) -> Value,
    {
        Ok(match self.unary_value(builtin)? {
            Value::Null => Value::Null,
            other => f(&to_text(&other)),
        })
    }
}

/// Text form of a non-NULL value, as string functions see it
fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Boolean(b) => (*b as i64).to_string(),
        Value::Int64(n) => n.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::String(s) => s.clone(),
    }
}

fn out_of_range() -> ExpressionError {
    ExpressionError::EvaluationError {
        message: "BIGINT value is out of range".to_string(),
    }
}

fn arity_violation(builtin: &BuiltinExpr) -> ExpressionError {
    ExpressionError::EvaluationError {
        message: format!(
            "{} built with {} arguments",
            builtin.call.method,
            builtin.call.arguments.len()
        ),
    }
}

/// Helper function to evaluate an expression against a row
pub fn evaluate_expression(expr: &Expr, row: &[Value]) -> ExpressionResult<Value> {
    ExpressionEvaluator::new(row).evaluate(expr)
}
