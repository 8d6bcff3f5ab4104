pub mod lexer;
pub mod parser;
pub mod environment;
pub mod analyzer;
pub mod eval;
pub mod runtime;
pub mod utils;
