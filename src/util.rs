/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between the language's
/// 32-bit integers, host `i64`/`usize` values and `f64` without risking silent
/// data loss. Truncating conversions are explicit and range-checked.
///
/// All fallible functions return a `Result`, which is `Ok` if the conversion is
/// valid, or an error if the value is out of range.
pub mod num;
