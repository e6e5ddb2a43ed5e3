//! Lowering of AST expressions into compiled expression trees.
//!
//! [`AstCompiler::translate_expr`] recurses over operator and value shapes
//! and hands every call-like node to the call-form translation in
//! [`crate::expression::call`].

use crate::access::Value;
use crate::expression::config::Config;
use crate::expression::error::{TranslationError, TranslationResult};
use crate::expression::expr::{
    BindVariable, CaseExpr, ConvertExpr, ConvertUsingExpr, Expr, UnaryExpr, WhenThen,
};
use crate::expression::operator::LogicalOp;
use crate::expression::rewrite;
use crate::sql::ast;

/// Target types accepted by `CONVERT(expr, type)`
const CONVERT_TYPES: &[&str] = &[
    "binary",
    "char",
    "nchar",
    "date",
    "datetime",
    "decimal",
    "double",
    "float",
    "json",
    "real",
    "signed",
    "signed integer",
    "time",
    "unsigned",
    "unsigned integer",
    "year",
];

/// Translates AST expressions using the settings in a [`Config`]
pub struct AstCompiler<'a> {
    config: &'a Config,
}

impl<'a> AstCompiler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Translate one AST expression
    pub fn translate_expr(&self, expr: &ast::Expr) -> TranslationResult<Expr> {
        match expr {
            ast::Expr::Literal(value) => Ok(Expr::literal(value.clone())),

            ast::Expr::Null => Ok(Expr::null()),

            ast::Expr::Column(col) => self.translate_column(col),

            ast::Expr::Argument(key) => Ok(Expr::BindVariable(BindVariable { key: key.clone() })),

            ast::Expr::Comparison { left, op, right } => Ok(Expr::comparison(
                (*op).into(),
                self.translate_expr(left)?,
                self.translate_expr(right)?,
            )),

            ast::Expr::Is { expr, op } => Ok(Expr::is((*op).into(), self.translate_expr(expr)?)),

            ast::Expr::And(left, right) => Ok(Expr::logical(
                LogicalOp::And,
                self.translate_expr(left)?,
                self.translate_expr(right)?,
            )),

            ast::Expr::Or(left, right) => Ok(Expr::logical(
                LogicalOp::Or,
                self.translate_expr(left)?,
                self.translate_expr(right)?,
            )),

            ast::Expr::Not(inner) => Ok(Expr::Not(self.translate_unary(inner)?)),

            ast::Expr::Arithmetic { left, op, right } => Ok(Expr::arithmetic(
                (*op).into(),
                self.translate_expr(left)?,
                self.translate_expr(right)?,
            )),

            ast::Expr::Negate(inner) => Ok(Expr::Negate(self.translate_unary(inner)?)),

            ast::Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => self.translate_case(operand.as_deref(), when_clauses, else_clause.as_deref()),

            ast::Expr::Tuple(exprs) => Ok(Expr::Tuple(self.translate_func_args(exprs)?)),

            ast::Expr::JsonExtractOp {
                left,
                right,
                unquote,
            } => {
                let left = self.translate_expr(left)?;
                let right = self.translate_expr(right)?;
                if *unquote {
                    rewrite::json_extract_unquote(left, right)
                } else {
                    rewrite::json_extract(left, right)
                }
            }

            ast::Expr::Callable(call) => self.translate_callable(call),
        }
    }

    fn translate_unary(&self, inner: &ast::Expr) -> TranslationResult<UnaryExpr> {
        Ok(UnaryExpr {
            inner: Box::new(self.translate_expr(inner)?),
        })
    }

    fn translate_column(&self, col: &ast::ColName) -> TranslationResult<Expr> {
        let offset = self
            .config
            .resolve_column
            .as_ref()
            .and_then(|resolve| resolve(col));
        match offset {
            Some(offset) => Ok(Expr::column_with_name(offset, col.name.clone())),
            None => {
                log::debug!("cannot resolve column {}", col);
                Err(TranslationError::UnresolvedColumn {
                    column: col.to_string(),
                })
            }
        }
    }

    /// `CASE x WHEN v ...` becomes `CASE WHEN x = v ...`
    fn translate_case(
        &self,
        operand: Option<&ast::Expr>,
        when_clauses: &[ast::WhenClause],
        else_clause: Option<&ast::Expr>,
    ) -> TranslationResult<Expr> {
        let operand = operand.map(|e| self.translate_expr(e)).transpose()?;

        let mut cases = Vec::with_capacity(when_clauses.len());
        for clause in when_clauses {
            let mut when = self.translate_expr(&clause.condition)?;
            if let Some(operand) = &operand {
                when = Expr::eq(operand.clone(), when);
            }
            cases.push(WhenThen {
                when,
                then: self.translate_expr(&clause.result)?,
            });
        }

        let else_expr = match else_clause {
            Some(e) => Some(Box::new(self.translate_expr(e)?)),
            None => None,
        };
        Ok(Expr::Case(CaseExpr { cases, else_expr }))
    }

    /// Translate a declared length into `(length, has_length)`.
    ///
    /// Accepts an integer literal or a bind argument known to the config.
    pub fn translate_integral(&self, expr: Option<&ast::Expr>) -> TranslationResult<(i64, bool)> {
        let Some(expr) = expr else {
            return Ok((0, false));
        };
        let value = match expr {
            ast::Expr::Literal(value) => Some(value),
            ast::Expr::Argument(key) => self.config.bind_vars.get(key),
            _ => None,
        };
        match value.and_then(integral) {
            Some(n) => Ok((n, true)),
            None => {
                log::debug!("{} is not an integral length", expr);
                Err(TranslationError::unsupported(expr.clone()))
            }
        }
    }

    /// Translate `CONVERT(expr, type)`
    pub fn translate_convert_expr(
        &self,
        expr: &ast::Expr,
        ty: &ast::ConvertType,
    ) -> TranslationResult<Expr> {
        let type_name = ty.type_name.to_ascii_lowercase();
        if !CONVERT_TYPES.contains(&type_name.as_str()) {
            log::debug!("unsupported CONVERT target type {}", ty.type_name);
            return Err(TranslationError::unsupported(ast::Callable::Convert(
                ast::ConvertExpr {
                    expr: Box::new(expr.clone()),
                    ty: ty.clone(),
                },
            )));
        }

        let inner = self.translate_expr(expr)?;
        let (length, has_length) = self.translate_integral(ty.length.as_deref())?;
        let (scale, has_scale) = self.translate_integral(ty.scale.as_deref())?;
        Ok(Expr::Convert(ConvertExpr {
            inner: Box::new(inner),
            type_name,
            length: has_length.then_some(length),
            scale: has_scale.then_some(scale),
            charset: ty.charset.as_ref().map(|cs| cs.to_ascii_lowercase()),
        }))
    }

    /// Translate `CONVERT(expr USING charset)`
    pub fn translate_convert_using_expr(
        &self,
        convert: &ast::ConvertUsingExpr,
    ) -> TranslationResult<Expr> {
        Ok(Expr::ConvertUsing(ConvertUsingExpr {
            inner: Box::new(self.translate_expr(&convert.expr)?),
            charset: convert.charset.to_ascii_lowercase(),
        }))
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int64(n) => Some(*n),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Helper function to translate an expression with the given config
pub fn translate(expr: &ast::Expr, config: &Config) -> TranslationResult<Expr> {
    AstCompiler::new(config).translate_expr(expr)
}
