// SQL module - expression AST handed over by the parser, and its unparser

pub mod ast;
pub mod unparse;

pub use ast::*;
