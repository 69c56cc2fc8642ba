/// Dispatch of binary operators to their handlers.
pub mod core;

/// Arithmetic on integers and reals, and string concatenation.
pub mod scalar;

/// Relational and equality comparisons.
pub mod comparison;

/// Logical `and` and `or`.
pub mod logic;
