use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Safely narrows an `i64` to the language's 32-bit integer.
///
/// Integer literals are lexed as `i64` so that a literal like `2147483648`
/// produces a clean diagnostic instead of a lexer failure.
///
/// ## Errors
/// Returns `Err(error)` if the value does not fit in an `i32`.
///
/// ## Example
/// ```
/// use semtree::util::num::i64_to_i32_checked;
///
/// assert_eq!(i64_to_i32_checked(42, "too big!"), Ok(42));
/// assert!(i64_to_i32_checked(i64::from(i32::MAX) + 1, "too big!").is_err());
/// ```
pub fn i64_to_i32_checked<E>(value: i64, error: E) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| error)
}

/// Converts an `f64` to `i32` by truncating toward zero.
///
/// This is the lossy `as_integer` coercion of a real value: the fractional
/// part is dropped, but values outside the `i32` range and non-finite values
/// are rejected rather than saturated.
///
/// ## Errors
/// - `RuntimeError::TypeError` for `NaN` and infinities.
/// - `RuntimeError::Overflow` if the truncated value does not fit in an `i32`.
///
/// ## Example
/// ```
/// use semtree::{error::RuntimeError, util::num::f64_to_i32_truncated};
///
/// assert_eq!(f64_to_i32_truncated(7.9, 1).unwrap(), 7);
/// assert_eq!(f64_to_i32_truncated(-7.9, 1).unwrap(), -7);
///
/// let err = f64_to_i32_truncated(1e12, 3).unwrap_err();
/// assert!(matches!(err, RuntimeError::Overflow { line: 3 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i32_truncated(value: f64, line: usize) -> EvalResult<i32> {
    if !value.is_finite() {
        return Err(RuntimeError::TypeError { details: format!("Cannot convert non-finite value {value} to integer"),
                                             line });
    }
    let truncated = value.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return Err(RuntimeError::Overflow { line });
    }
    Ok(truncated as i32)
}

/// Converts a language-level index into a position within a dimension.
///
/// Indices are zero-based. Negative indices and indices at or past `len` are
/// out of bounds.
///
/// ## Errors
/// Returns `RuntimeError::IndexOutOfBounds` when the index does not address an
/// element.
///
/// ## Example
/// ```
/// use semtree::util::num::i32_to_index_checked;
///
/// assert_eq!(i32_to_index_checked(2, 3, 1).unwrap(), 2);
/// assert!(i32_to_index_checked(3, 3, 1).is_err());
/// assert!(i32_to_index_checked(-1, 3, 1).is_err());
/// ```
pub fn i32_to_index_checked(index: i32, len: usize, line: usize) -> EvalResult<usize> {
    usize::try_from(index).ok()
                          .filter(|position| *position < len)
                          .ok_or(RuntimeError::IndexOutOfBounds { len,
                                                                  found: index,
                                                                  line })
}

/// Converts a character to its code point as a language integer.
///
/// Every Unicode scalar value is below `0x11_0000`, so the conversion cannot
/// fail.
#[must_use]
pub fn char_to_i32(c: char) -> i32 {
    i32::try_from(u32::from(c)).unwrap_or(i32::MAX)
}
