// Library entry exposing assembler modules.
pub mod assembler;
pub mod cursor;
pub mod error;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod token;
