use std::fmt;

use crate::{
    ast::{ScalarType, VariableType},
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::array::ArrayValue},
    util::num::{char_to_i32, f64_to_i32_truncated},
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// variable slots, parameters and function results.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer.
    Integer(i32),
    /// A double precision real.
    Real(f64),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison operators and logical operations. Required by
    /// `if` and `while` conditions.
    Boolean(bool),
    /// A single character.
    Char(char),
    /// Text.
    String(String),
    /// A fixed-size array of values.
    Array(ArrayValue),
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ArrayValue> for Value {
    fn from(v: ArrayValue) -> Self {
        Self::Array(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(array) => write!(f, "{array}"),
        }
    }
}

impl Value {
    /// Returns the default value a slot of the given type starts with.
    ///
    /// ## Example
    /// ```
    /// use semtree::{ast::ScalarType, interpreter::value::core::Value};
    ///
    /// assert_eq!(Value::default_for(ScalarType::Integer), Value::Integer(0));
    /// assert_eq!(Value::default_for(ScalarType::String), Value::String(String::new()));
    /// ```
    #[must_use]
    pub const fn default_for(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Integer => Self::Integer(0),
            ScalarType::Real => Self::Real(0.0),
            ScalarType::Boolean => Self::Boolean(false),
            ScalarType::Char => Self::Char(' '),
            ScalarType::String => Self::String(String::new()),
        }
    }

    /// Returns the type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(_) => "boolean",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Coerces the value to an integer.
    ///
    /// Reals are truncated toward zero, booleans become `1`/`0`, characters
    /// become their code point and strings are parsed after trimming.
    ///
    /// # Errors
    /// - `RuntimeError::Overflow` for reals outside the integer range.
    /// - `RuntimeError::TypeError` for strings that are not integers.
    /// - `RuntimeError::ExpectedNumber` for arrays.
    ///
    /// # Example
    /// ```
    /// use semtree::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Real(7.9).as_integer(1).unwrap(), 7);
    /// assert_eq!(Value::Boolean(true).as_integer(1).unwrap(), 1);
    /// assert_eq!(Value::from(" 12 ").as_integer(1).unwrap(), 12);
    /// ```
    pub fn as_integer(&self, line: usize) -> EvalResult<i32> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Real(r) => f64_to_i32_truncated(*r, line),
            Self::Boolean(b) => Ok(i32::from(*b)),
            Self::Char(c) => Ok(char_to_i32(*c)),
            Self::String(s) => {
                s.trim()
                 .parse()
                 .map_err(|_| RuntimeError::TypeError { details: format!("'{s}' is not an integer"),
                                                        line })
            },
            Self::Array(_) => Err(RuntimeError::ExpectedNumber { line }),
        }
    }

    /// Coerces the value to a real.
    ///
    /// Integers widen losslessly, booleans become `1.0`/`0.0` and strings are
    /// parsed after trimming.
    ///
    /// # Errors
    /// - `RuntimeError::TypeError` for strings that are not numbers.
    /// - `RuntimeError::ExpectedNumber` for characters and arrays.
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Integer(n) => Ok(f64::from(*n)),
            Self::Real(r) => Ok(*r),
            Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => {
                s.trim()
                 .parse()
                 .map_err(|_| RuntimeError::TypeError { details: format!("'{s}' is not a number"),
                                                        line })
            },
            Self::Char(_) | Self::Array(_) => Err(RuntimeError::ExpectedNumber { line }),
        }
    }

    /// Coerces the value to a boolean.
    ///
    /// Numbers are `true` when non-zero; the strings `true` and `false` are
    /// accepted.
    ///
    /// # Errors
    /// Returns `RuntimeError::ExpectedBoolean` for anything else.
    pub fn as_boolean(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Integer(n) => Ok(*n != 0),
            Self::Real(r) => Ok(*r != 0.0),
            Self::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(RuntimeError::ExpectedBoolean { line }),
            },
            Self::Char(_) | Self::Array(_) => Err(RuntimeError::ExpectedBoolean { line }),
        }
    }

    /// Returns the textual form of the value, as written by `output`.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Returns the boolean without coercion.
    ///
    /// Conditions and logical operators accept only real booleans.
    ///
    /// # Errors
    /// Returns `RuntimeError::ExpectedBoolean` for every other variant.
    pub const fn expect_boolean(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            _ => Err(RuntimeError::ExpectedBoolean { line }),
        }
    }

    /// Returns the inner array, or an error if the value is not an array.
    pub const fn as_array(&self, line: usize) -> EvalResult<&ArrayValue> {
        match self {
            Self::Array(array) => Ok(array),
            _ => Err(RuntimeError::ExpectedArray { line }),
        }
    }

    /// Returns the inner array mutably, or an error if the value is not an
    /// array.
    pub const fn as_array_mut(&mut self, line: usize) -> EvalResult<&mut ArrayValue> {
        match self {
            Self::Array(array) => Ok(array),
            _ => Err(RuntimeError::ExpectedArray { line }),
        }
    }

    /// Checks the value against a scalar slot type, widening where allowed.
    ///
    /// A `string` slot accepts only strings, `boolean` only booleans, `char`
    /// only characters and `integer` only integers. A `real` slot accepts reals
    /// and integers; integers are widened to reals.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeError` for any other combination.
    ///
    /// # Example
    /// ```
    /// use semtree::{ast::ScalarType, interpreter::value::core::Value};
    ///
    /// let widened = Value::Integer(2).coerce_to_scalar(ScalarType::Real, 1).unwrap();
    /// assert_eq!(widened, Value::Real(2.0));
    ///
    /// assert!(Value::Real(2.5).coerce_to_scalar(ScalarType::Integer, 1).is_err());
    /// ```
    pub fn coerce_to_scalar(self, slot: ScalarType, line: usize) -> EvalResult<Self> {
        match (slot, self) {
            (ScalarType::Integer, value @ Self::Integer(_))
            | (ScalarType::Real, value @ Self::Real(_))
            | (ScalarType::Boolean, value @ Self::Boolean(_))
            | (ScalarType::Char, value @ Self::Char(_))
            | (ScalarType::String, value @ Self::String(_)) => Ok(value),
            (ScalarType::Real, Self::Integer(n)) => Ok(Self::Real(f64::from(n))),
            (slot, value) => {
                Err(RuntimeError::TypeError { details: format!("cannot store {} value '{value}' in a {slot} slot",
                                                               value.type_name()),
                                              line })
            },
        }
    }

    /// Checks the value against a declared variable type.
    ///
    /// Scalars follow [`Value::coerce_to_scalar`]. An array slot accepts only
    /// an array with the same element type and the same dimensions.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeError` when the value does not fit.
    pub fn coerce_to(self, slot: &VariableType, line: usize) -> EvalResult<Self> {
        match slot {
            VariableType::Scalar(scalar) => self.coerce_to_scalar(*scalar, line),
            VariableType::Array { element, dimensions } => match self {
                Self::Array(array)
                    if array.element_type() == *element && array.shape() == *dimensions =>
                {
                    Ok(Self::Array(array))
                },
                value => Err(RuntimeError::TypeError { details: format!("cannot store {} value '{value}' in an {slot} slot",
                                                                        value.type_name()),
                                                       line }),
            },
        }
    }

    /// Converts one line of console input into a value of the given type.
    ///
    /// The trailing line break is removed. Numbers and booleans are also
    /// trimmed; a `char` must be exactly one character and a `string` takes the
    /// line verbatim.
    ///
    /// # Errors
    /// Returns `RuntimeError::InvalidInput` when the text does not denote a
    /// value of the requested type.
    ///
    /// # Example
    /// ```
    /// use semtree::{ast::ScalarType, interpreter::value::core::Value};
    ///
    /// assert_eq!(Value::from_input("42\n", ScalarType::Integer, 1).unwrap(), Value::Integer(42));
    /// assert_eq!(Value::from_input("hi there", ScalarType::String, 1).unwrap(),
    ///            Value::from("hi there"));
    /// assert!(Value::from_input("abc", ScalarType::Real, 1).is_err());
    /// ```
    pub fn from_input(text: &str, expected: ScalarType, line: usize) -> EvalResult<Self> {
        let raw = text.trim_end_matches(['\r', '\n']);
        let invalid = || RuntimeError::InvalidInput { input: raw.to_string(),
                                                      expected: expected.to_string(),
                                                      line };
        match expected {
            ScalarType::Integer => raw.trim().parse().map(Self::Integer).map_err(|_| invalid()),
            ScalarType::Real => raw.trim().parse().map(Self::Real).map_err(|_| invalid()),
            ScalarType::Boolean => match raw.trim() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(invalid()),
            },
            ScalarType::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(invalid()),
                }
            },
            ScalarType::String => Ok(Self::String(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn real_slot_widens_integers_only() {
        assert_eq!(Value::Integer(3).coerce_to_scalar(ScalarType::Real, 1).unwrap(),
                   Value::Real(3.0));
        assert!(Value::Boolean(true).coerce_to_scalar(ScalarType::Real, 1).is_err());
        assert!(Value::Char('a').coerce_to_scalar(ScalarType::String, 1).is_err());
        assert!(Value::from("a").coerce_to_scalar(ScalarType::Char, 1).is_err());
    }

    #[test]
    fn lossy_coercions() {
        assert_eq!(Value::Real(-2.9).as_integer(1).unwrap(), -2);
        assert_eq!(Value::Char('A').as_integer(1).unwrap(), 65);
        assert!(!Value::Integer(0).as_boolean(1).unwrap());
        assert_eq!(Value::from("2.5").as_real(1).unwrap(), 2.5);
        assert!(Value::from("x").as_integer(1).is_err());
        assert!(Value::Char('x').as_real(1).is_err());
    }

    #[test]
    fn array_slot_requires_same_shape() {
        let slot = VariableType::Array { element:    ScalarType::Integer,
                                         dimensions: vec![2, 3], };
        let matching = Value::Array(ArrayValue::template(ScalarType::Integer, &[2, 3]));
        let wrong_shape = Value::Array(ArrayValue::template(ScalarType::Integer, &[3, 2]));
        let wrong_element = Value::Array(ArrayValue::template(ScalarType::Real, &[2, 3]));

        assert!(matching.coerce_to(&slot, 1).is_ok());
        assert!(wrong_shape.coerce_to(&slot, 1).is_err());
        assert!(wrong_element.coerce_to(&slot, 1).is_err());
    }

    #[test]
    fn char_input_must_be_single_character() {
        assert_eq!(Value::from_input("x\r\n", ScalarType::Char, 1).unwrap(), Value::Char('x'));
        assert!(Value::from_input("xy", ScalarType::Char, 1).is_err());
        assert!(Value::from_input("", ScalarType::Char, 1).is_err());
    }
}
