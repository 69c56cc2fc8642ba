/// The console collaborator used by `input` and `output`.
///
/// Programs never touch stdin or stdout directly; the runner hands the
/// evaluator a [`console::Console`], which is either the process streams or an
/// in-memory buffer.
pub mod console;
/// The evaluator module executes the program tree.
///
/// The evaluator walks the tree built by the parser, executes statements in
/// order, evaluates expressions, manages variable storage and activation
/// frames, and performs calls.
///
/// # Responsibilities
/// - Executes statements and propagates `return` through enclosing blocks.
/// - Binds `in` and `var` parameters and runs callable bodies.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// paired with the line it appears on. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source lines.
/// - Handles numeric, character and string literals, keywords and
///   identifiers.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the program tree from tokens.
///
/// The parser processes the token stream in a single pass. It resolves every
/// identifier to a scope-qualified id, registers callables and variables, and
/// inserts one tree node per statement.
///
/// # Responsibilities
/// - Validates the grammar, reporting errors with the offending line.
/// - Tracks nested scopes and assigns block ids.
/// - Checks call sites against callable declarations.
pub mod parser;
/// The result of parsing: the program tree and its symbol tables.
pub mod program;
/// Function and variable tables.
pub mod symbols;
/// The program tree.
///
/// An arena of nodes linked by parent, sibling and first-child ids. Nodes are
/// inserted as the first child of a block or as the next sibling of a
/// statement, and can be rendered back to text.
pub mod tree;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with: integers, reals,
/// booleans, characters, strings and fixed-size arrays. It also provides the
/// conversions and type checks used when values are stored or read from the
/// console.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Checks values against declared slot types, widening integers to reals.
/// - Builds deep-copied array templates.
pub mod value;
