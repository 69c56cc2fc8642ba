//! # semtree
//!
//! semtree is a tree-walking interpreter for a small Pascal-like teaching
//! language written in Rust.
//! A program is one module with module-level variables, functions and
//! procedures, and an entry block. The source is parsed in a single pass into
//! an arena-backed program tree whose identifiers are already resolved to
//! scope-qualified ids; the tree is then executed statement by statement.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        console::Console,
        evaluator::core::Context,
        lexer::tokenize,
        parser::core::parse_program,
        program::Program,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the expression, type and declaration types that the
/// parser stores in the program tree and the evaluator reads back.
///
/// # Responsibilities
/// - Defines scalar and array types, parameters and callable declarations.
/// - Defines expressions with their source lines for error reporting.
/// - Builds and splits scope-qualified ids.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing or
/// executing a program. Every error carries the source line it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (parser, tree, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Wraps both phases in a single crate-level error.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, the program tree, evaluation and
/// value representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, tree and evaluator.
/// - Provides the symbol tables and the console collaborator.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines used by the values and the
/// evaluator, such as checked narrowing to 32-bit integers and array index
/// validation.
pub mod util;

/// Lexes and parses a complete program.
///
/// # Errors
/// Returns the first lexical, syntax, resolution, redeclaration or arity
/// error. Nothing has been executed at that point.
///
/// # Examples
/// ```
/// use semtree::parse_source;
///
/// let program = parse_source("module Demo; beginning output 1; end Demo.").unwrap();
/// assert_eq!(program.module_name(), "Demo");
///
/// assert!(parse_source("module Demo; beginning output y; end Demo.").is_err());
/// ```
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    parse_program(&tokens)
}

/// Executes a parsed program against `console`.
///
/// # Errors
/// The first runtime error aborts the run. Output written before the error
/// stays on the console.
pub fn run_program(program: &Program, console: &mut dyn Console) -> Result<(), RuntimeError> {
    Context::new(program, console).run()
}

/// Parses and then executes `source`.
///
/// Parsing finishes completely before the first statement runs, so a program
/// with a parse error produces no output at all.
///
/// # Errors
/// Returns an error if parsing or execution fails.
///
/// # Examples
/// ```
/// use semtree::{interpreter::console::BufferConsole, run_source};
///
/// let mut console = BufferConsole::new();
/// run_source("module M;
///             variable integer x := 5;
///             variable integer y := 10;
///             beginning
///               let x := x + y;
///               output x;
///             end M.",
///            &mut console).unwrap();
/// assert_eq!(console.output(), ["15"]);
///
/// // 'y' is never declared.
/// let mut console = BufferConsole::new();
/// assert!(run_source("module M; beginning output y; end M.", &mut console).is_err());
/// ```
pub fn run_source(source: &str, console: &mut dyn Console) -> Result<(), Error> {
    let program = parse_source(source)?;
    run_program(&program, console)?;
    Ok(())
}
