//! The Assembler module is in charge of taking a Hack
//! assembly file and producing the binary words of the
//! `.hack` format.
//!
//! It does this in three strictly ordered passes over the
//! classified source lines: label resolution, variable
//! allocation, and finally encoding.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
