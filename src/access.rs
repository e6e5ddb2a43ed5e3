//! Row values consumed by the evaluator.
//!
//! - **Value**: a single column value, literal, or evaluation result
//! - **DataType**: the static type a value belongs to

pub mod value;

pub use value::{DataType, Value};
