//! vibedb-evalc - compile a SQL expression AST and inspect the result

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use std::io::Read;
use std::path::PathBuf;
use vibedb_evalengine::access::Value;
use vibedb_evalengine::expression::{self, codec, Config, ExpressionEvaluator};
use vibedb_evalengine::sql::ast;

/// Compile a JSON-encoded SQL expression into an evaluable tree
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the AST; reads stdin when omitted
    file: Option<PathBuf>,

    /// Row to evaluate against, as a JSON array
    #[arg(short, long)]
    row: Option<String>,

    /// Comma-separated column names, in row order
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Print the bincode encoding of the compiled tree
    #[arg(short, long)]
    encode: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    let ast: ast::Expr = serde_json::from_str(&input).context("Failed to parse AST")?;
    log::debug!("input: {}", ast);

    let config = Config::new().with_columns(args.columns.iter().cloned());
    let compiled = expression::translate(&ast, &config)?;
    println!("{}", compiled);

    if args.encode {
        let bytes = codec::encode(&compiled)?;
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{} bytes: {}", bytes.len(), hex);
    }

    if let Some(row) = &args.row {
        let row = parse_row(row)?;
        let result = ExpressionEvaluator::new(&row)
            .with_bind_vars(&config.bind_vars)
            .evaluate(&compiled)?;
        println!("{}", result);
    }

    Ok(())
}

/// Parses a row given as a plain JSON array, e.g. `[1, "a", null]`
fn parse_row(text: &str) -> Result<Vec<Value>> {
    let json: serde_json::Value = serde_json::from_str(text).context("Failed to parse row")?;
    let serde_json::Value::Array(items) = json else {
        bail!("row must be a JSON array");
    };
    items.into_iter().map(json_to_value).collect()
}

fn json_to_value(json: serde_json::Value) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Float64(n.as_f64().context("number out of range")?),
        },
        serde_json::Value::String(s) => Value::String(s),
        other => bail!("unsupported row value: {}", other),
    })
}
