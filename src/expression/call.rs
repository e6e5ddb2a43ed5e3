//! Translation of call-like AST nodes.
//!
//! Each callable shape is normalized into an ordered argument list and
//! either dispatched by name (plain function calls) or turned into its
//! fixed builtin node (the JSON special forms).

use crate::expression::dispatch;
use crate::expression::error::{TranslationError, TranslationResult};
use crate::expression::expr::{Builtin, Expr, TupleExpr, WeightStringExpr};
use crate::expression::translate::AstCompiler;
use crate::sql::ast;

impl AstCompiler<'_> {
    /// Translate each argument in order, stopping at the first failure
    pub fn translate_func_args(&self, exprs: &[ast::Expr]) -> TranslationResult<TupleExpr> {
        exprs.iter().map(|expr| self.translate_expr(expr)).collect()
    }

    /// Translate a plain function call through the dispatch table
    pub fn translate_func_expr(&self, func: &ast::FuncExpr) -> TranslationResult<Expr> {
        let not_supported = || {
            log::debug!("function call not supported: {}", ast::Callable::Func(func.clone()));
            TranslationError::unsupported(ast::Callable::Func(func.clone()))
        };

        if func.distinct {
            return Err(not_supported());
        }

        let mut args = TupleExpr::with_capacity(func.exprs.len());
        for expr in &func.exprs {
            let ast::SelectExpr::Aliased(aliased) = expr else {
                return Err(not_supported());
            };
            args.push(self.translate_expr(&aliased.expr)?);
        }

        let method = func.name.to_ascii_lowercase();
        dispatch::dispatch(&method, &func.name, args).unwrap_or_else(|| Err(not_supported()))
    }

    /// Translate any call-like node
    pub fn translate_callable(&self, call: &ast::Callable) -> TranslationResult<Expr> {
        match call {
            ast::Callable::Func(func) => self.translate_func_expr(func),

            ast::Callable::Convert(convert) => self.translate_convert_expr(&convert.expr, &convert.ty),

            ast::Callable::ConvertUsing(convert) => self.translate_convert_using_expr(convert),

            ast::Callable::WeightString(ws) => self.translate_weight_string(ws),

            ast::Callable::JsonExtract(call) => {
                let mut args = vec![self.translate_expr(&call.doc)?];
                args.extend(self.translate_func_args(&call.paths)?);
                Ok(Expr::builtin(Builtin::JsonExtract, "JSON_EXTRACT", args))
            }

            ast::Callable::JsonUnquote(call) => {
                let arg = self.translate_expr(&call.value)?;
                Ok(Expr::builtin(Builtin::JsonUnquote, "JSON_UNQUOTE", vec![arg]))
            }

            ast::Callable::JsonObject(call) => {
                let mut args = TupleExpr::with_capacity(call.params.len() * 2);
                for param in &call.params {
                    args.push(self.translate_expr(&param.key)?);
                    args.push(self.translate_expr(&param.value)?);
                }
                Ok(Expr::builtin(Builtin::JsonObject, "JSON_OBJECT", args))
            }

            ast::Callable::JsonArray(call) => {
                let args = self.translate_func_args(&call.params)?;
                Ok(Expr::builtin(Builtin::JsonArray, "JSON_ARRAY", args))
            }

            ast::Callable::JsonContainsPath(call) => {
                let mut args = vec![
                    self.translate_expr(&call.doc)?,
                    self.translate_expr(&call.one_or_all)?,
                ];
                args.extend(self.translate_func_args(&call.paths)?);
                Ok(Expr::builtin(
                    Builtin::JsonContainsPath,
                    "JSON_CONTAINS_PATH",
                    args,
                ))
            }

            ast::Callable::JsonKeys(call) => {
                let mut args = vec![self.translate_expr(&call.doc)?];
                if let Some(path) = &call.path {
                    args.push(self.translate_expr(path)?);
                }
                Ok(Expr::builtin(Builtin::JsonKeys, "JSON_KEYS", args))
            }

            ast::Callable::Substr(_) | ast::Callable::JsonQuote(_) | ast::Callable::CurTime(_) => {
                log::debug!("callable not supported: {}", call);
                Err(TranslationError::unsupported(call.clone()))
            }
        }
    }

    fn translate_weight_string(
        &self,
        ws: &ast::WeightStringFuncExpr,
    ) -> TranslationResult<Expr> {
        let string = self.translate_expr(&ws.expr)?;
        let (cast, len, has_len) = match &ws.cast {
            Some(cast) => {
                let (len, has_len) = self.translate_integral(cast.length.as_deref())?;
                (cast.type_name.to_ascii_lowercase(), len, has_len)
            }
            None => (String::new(), 0, false),
        };
        Ok(Expr::WeightString(WeightStringExpr {
            string: Box::new(string),
            cast,
            len,
            has_len,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::expression::config::Config;
    use crate::expression::error::ErrorCode;

    fn config() -> Config {
        Config::new().with_columns(["doc", "name"])
    }

    fn translate(call: ast::Callable) -> TranslationResult<Expr> {
        let config = config();
        AstCompiler::new(&config).translate_callable(&call)
    }

    fn lit(s: &str) -> Expr {
        Expr::literal(Value::String(s.to_string()))
    }

    fn builtin(expr: Expr) -> (Builtin, String, TupleExpr) {
        match expr {
            Expr::Builtin(b) => (b.kind, b.call.method, b.call.arguments),
            other => panic!("Expected builtin node, got {:?}", other),
        }
    }

    #[test]
    fn test_func_args_stop_at_first_error() {
        let config = config();
        let compiler = AstCompiler::new(&config);
        let args = [
            ast::Expr::int(1),
            ast::Expr::column("missing"),
            ast::Expr::func("nope", vec![]),
        ];
        let err = compiler.translate_func_args(&args).unwrap_err();
        assert!(matches!(err, TranslationError::UnresolvedColumn { .. }));

        let ok = compiler
            .translate_func_args(&[ast::Expr::int(1), ast::Expr::column("name")])
            .unwrap();
        assert_eq!(
            ok,
            vec![Expr::literal(Value::Int64(1)), Expr::column_with_name(1, "name")]
        );
    }

    #[test]
    fn test_star_and_distinct_arguments_are_unsupported() {
        let star = ast::FuncExpr {
            name: "coalesce".to_string(),
            distinct: false,
            exprs: vec![ast::SelectExpr::Star(ast::StarExpr { table: None })],
        };
        let err = translate(ast::Callable::Func(star)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unimplemented);
        assert_eq!(
            err.to_string(),
            "expr cannot be translated, not supported: coalesce(*)"
        );

        let mut distinct = ast::FuncExpr::new("coalesce", vec![ast::Expr::int(1)]);
        distinct.distinct = true;
        let err = translate(ast::Callable::Func(distinct)).unwrap_err();
        assert!(matches!(err, TranslationError::Unsupported { .. }));
    }

    #[test]
    fn test_unknown_function_reports_original_node() {
        let func = ast::FuncExpr::new("Frobnicate", vec![ast::Expr::column("name")]);
        let err = translate(ast::Callable::Func(func.clone())).unwrap_err();
        assert_eq!(
            err,
            TranslationError::Unsupported {
                node: Box::new(ast::Expr::Callable(ast::Callable::Func(func)))
            }
        );
    }

    #[test]
    fn test_argument_count_names_function_as_written() {
        let func = ast::FuncExpr::new("CharACTER_Length", vec![]);
        let err = translate(ast::Callable::Func(func)).unwrap_err();
        assert_eq!(err, TranslationError::argument_count("CharACTER_Length"));
    }

    #[test]
    fn test_json_extract_form() {
        let call = ast::Callable::JsonExtract(ast::JsonExtractExpr {
            doc: Box::new(ast::Expr::column("doc")),
            paths: vec![ast::Expr::string("$.a"), ast::Expr::string("$.b")],
        });
        let (kind, method, args) = builtin(translate(call).unwrap());
        assert_eq!(kind, Builtin::JsonExtract);
        assert_eq!(method, "JSON_EXTRACT");
        assert_eq!(
            args,
            vec![Expr::column_with_name(0, "doc"), lit("$.a"), lit("$.b")]
        );
    }

    #[test]
    fn test_json_extract_function_form_allows_any_doc() {
        // only the `->` shorthand restricts its left operand
        let call = ast::Callable::JsonExtract(ast::JsonExtractExpr {
            doc: Box::new(ast::Expr::string("{\"a\": 1}")),
            paths: vec![ast::Expr::string("$.a")],
        });
        assert!(translate(call).is_ok());
    }

    #[test]
    fn test_json_unquote_form() {
        let call = ast::Callable::JsonUnquote(ast::JsonUnquoteExpr {
            value: Box::new(ast::Expr::string("\"x\"")),
        });
        let (kind, method, args) = builtin(translate(call).unwrap());
        assert_eq!(kind, Builtin::JsonUnquote);
        assert_eq!(method, "JSON_UNQUOTE");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_json_object_flattens_pairs_in_order() {
        let call = ast::Callable::JsonObject(ast::JsonObjectExpr {
            params: vec![
                ast::JsonObjectParam {
                    key: ast::Expr::string("a"),
                    value: ast::Expr::int(1),
                },
                ast::JsonObjectParam {
                    key: ast::Expr::string("b"),
                    value: ast::Expr::int(2),
                },
            ],
        });
        let (kind, method, args) = builtin(translate(call).unwrap());
        assert_eq!(kind, Builtin::JsonObject);
        assert_eq!(method, "JSON_OBJECT");
        assert_eq!(
            args,
            vec![
                lit("a"),
                Expr::literal(Value::Int64(1)),
                lit("b"),
                Expr::literal(Value::Int64(2)),
            ]
        );
    }

    #[test]
    fn test_json_array_form() {
        let call = ast::Callable::JsonArray(ast::JsonArrayExpr {
            params: vec![ast::Expr::int(1), ast::Expr::Null, ast::Expr::column("name")],
        });
        let (kind, method, args) = builtin(translate(call).unwrap());
        assert_eq!(kind, Builtin::JsonArray);
        assert_eq!(method, "JSON_ARRAY");
        assert_eq!(args.len(), 3);
        assert_eq!(args[1], Expr::null());
    }

    #[test]
    fn test_json_contains_path_form() {
        let call = ast::Callable::JsonContainsPath(ast::JsonContainsPathExpr {
            doc: Box::new(ast::Expr::column("doc")),
            one_or_all: Box::new(ast::Expr::string("one")),
            paths: vec![ast::Expr::string("$.a"), ast::Expr::string("$.e")],
        });
        let (kind, method, args) = builtin(translate(call).unwrap());
        assert_eq!(kind, Builtin::JsonContainsPath);
        assert_eq!(method, "JSON_CONTAINS_PATH");
        assert_eq!(
            args,
            vec![
                Expr::column_with_name(0, "doc"),
                lit("one"),
                lit("$.a"),
                lit("$.e"),
            ]
        );
    }

    #[test]
    fn test_json_keys_optional_path() {
        let without = ast::Callable::JsonKeys(ast::JsonKeysExpr {
            doc: Box::new(ast::Expr::column("doc")),
            path: None,
        });
        let (_, method, args) = builtin(translate(without).unwrap());
        assert_eq!(method, "JSON_KEYS");
        assert_eq!(args.len(), 1);

        let with = ast::Callable::JsonKeys(ast::JsonKeysExpr {
            doc: Box::new(ast::Expr::column("doc")),
            path: Some(Box::new(ast::Expr::string("$.a"))),
        });
        let (kind, _, args) = builtin(translate(with).unwrap());
        assert_eq!(kind, Builtin::JsonKeys);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_weight_string_without_cast() {
        let call = ast::Callable::WeightString(ast::WeightStringFuncExpr {
            expr: Box::new(ast::Expr::column("name")),
            cast: None,
        });
        assert_eq!(
            translate(call).unwrap(),
            Expr::WeightString(WeightStringExpr {
                string: Box::new(Expr::column_with_name(1, "name")),
                cast: String::new(),
                len: 0,
                has_len: false,
            })
        );
    }

    #[test]
    fn test_weight_string_with_cast() {
        let call = ast::Callable::WeightString(ast::WeightStringFuncExpr {
            expr: Box::new(ast::Expr::column("name")),
            cast: Some(ast::WeightStringCast {
                type_name: "BINARY".to_string(),
                length: Some(Box::new(ast::Expr::int(16))),
            }),
        });
        let Expr::WeightString(ws) = translate(call).unwrap() else {
            panic!("Expected WEIGHT_STRING node");
        };
        assert_eq!(ws.cast, "binary");
        assert_eq!((ws.len, ws.has_len), (16, true));

        let call = ast::Callable::WeightString(ast::WeightStringFuncExpr {
            expr: Box::new(ast::Expr::column("name")),
            cast: Some(ast::WeightStringCast {
                type_name: "Char".to_string(),
                length: None,
            }),
        });
        let Expr::WeightString(ws) = translate(call).unwrap() else {
            panic!("Expected WEIGHT_STRING node");
        };
        assert_eq!(ws.cast, "char");
        assert!(!ws.has_len);
    }

    #[test]
    fn test_convert_using_form() {
        let call = ast::Callable::ConvertUsing(ast::ConvertUsingExpr {
            expr: Box::new(ast::Expr::column("name")),
            charset: "UTF8MB4".to_string(),
        });
        let Expr::ConvertUsing(convert) = translate(call).unwrap() else {
            panic!("Expected CONVERT USING node");
        };
        assert_eq!(convert.charset, "utf8mb4");
    }

    #[test]
    fn test_other_callables_are_unsupported() {
        let calls = [
            ast::Callable::Substr(ast::SubstrExpr {
                expr: Box::new(ast::Expr::column("name")),
                from: Box::new(ast::Expr::int(1)),
                len: None,
            }),
            ast::Callable::JsonQuote(ast::JsonQuoteExpr {
                value: Box::new(ast::Expr::string("x")),
            }),
            ast::Callable::CurTime(ast::CurTimeFuncExpr {
                name: "curtime".to_string(),
                fsp: Some(3),
            }),
        ];
        for call in calls {
            let err = translate(call.clone()).unwrap_err();
            assert_eq!(err, TranslationError::unsupported(call));
        }
    }
}
