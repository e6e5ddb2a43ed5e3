//! Binary encoding of compiled expression trees.

use crate::expression::expr::Expr;
use anyhow::{Context, Result};

/// Serialize a compiled tree with bincode
pub fn encode(expr: &Expr) -> Result<Vec<u8>> {
    bincode::serialize(expr).context("failed to encode compiled expression")
}

/// Deserialize a tree produced by [`encode`]
pub fn decode(data: &[u8]) -> Result<Expr> {
    bincode::deserialize(data)
        .with_context(|| format!("failed to decode compiled expression ({} bytes)", data.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::expression::expr::{Builtin, ConvertExpr, Direction};
    use crate::expression::rewrite;

    #[test]
    fn test_round_trip_preserves_tree() -> Result<()> {
        let expr = rewrite::if_null(
            Expr::builtin(
                Builtin::MultiComparison(Direction::Least),
                "least",
                vec![Expr::column_with_name(0, "a"), Expr::literal(Value::Int64(3))],
            ),
            Expr::Convert(ConvertExpr {
                inner: Box::new(Expr::literal(Value::String("1.5".to_string()))),
                type_name: "decimal".to_string(),
                length: Some(10),
                scale: Some(2),
                charset: None,
            }),
        );

        let bytes = encode(&expr)?;
        assert_eq!(decode(&bytes)?, expr);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_truncated_input() -> Result<()> {
        let bytes = encode(&Expr::literal(Value::String("hello".to_string())))?;
        let err = decode(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(err.to_string().contains("failed to decode"));
        Ok(())
    }
}
