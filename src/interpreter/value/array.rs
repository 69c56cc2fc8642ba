use std::fmt;

use crate::{
    ast::{ScalarType, VariableType},
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::i32_to_index_checked,
};

/// A fixed-size array of values.
///
/// Every leaf element has the same scalar type. Multi-dimensional arrays hold
/// one nested `ArrayValue` per slot; all nested arrays are independent copies,
/// so writing through one slot never affects another.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    element:  ScalarType,
    elements: Vec<Value>,
}

impl ArrayValue {
    /// Builds the initial value of an `array[d1]...[dn] of element` declaration.
    ///
    /// The innermost dimension `dn` is built first, filled with the element
    /// type's default. Each outer dimension is then built by deep-copying the
    /// previous template into every slot.
    ///
    /// # Parameters
    /// - `element`: Type of the leaf elements.
    /// - `dimensions`: Dimension sizes, outermost first.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::ScalarType,
    ///     interpreter::value::{array::ArrayValue, core::Value},
    /// };
    ///
    /// let matrix = ArrayValue::template(ScalarType::Integer, &[2, 3]);
    ///
    /// assert_eq!(matrix.len(), 2);
    /// assert_eq!(matrix.shape(), vec![2, 3]);
    /// assert_eq!(matrix.element_at(&[1, 2], 1).unwrap(), &Value::Integer(0));
    /// ```
    #[must_use]
    pub fn template(element: ScalarType, dimensions: &[usize]) -> Self {
        let Some((&innermost, outer)) = dimensions.split_last() else {
            return Self { element,
                          elements: Vec::new() };
        };

        let mut current = Self::filled(element, innermost, &Value::default_for(element));
        for &size in outer.iter().rev() {
            current = Self::filled(element, size, &Value::Array(current));
        }
        current
    }

    /// Builds an array of `size` deep copies of `template`.
    fn filled(element: ScalarType, size: usize, template: &Value) -> Self {
        Self { element,
               elements: (0..size).map(|_| template.clone()).collect() }
    }

    /// Returns the type of the leaf elements.
    #[must_use]
    pub const fn element_type(&self) -> ScalarType {
        self.element
    }

    /// Returns the number of slots in the outermost dimension.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the outermost dimension has no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the dimension sizes, outermost first.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = vec![self.elements.len()];
        if let Some(Value::Array(inner)) = self.elements.first() {
            shape.extend(inner.shape());
        }
        shape
    }

    /// Iterates over the slots of the outermost dimension.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    /// Returns the slot at `index` in the outermost dimension.
    ///
    /// # Errors
    /// Returns `RuntimeError::IndexOutOfBounds` for negative or too large
    /// indices.
    pub fn get(&self, index: i32, line: usize) -> EvalResult<&Value> {
        let position = i32_to_index_checked(index, self.elements.len(), line)?;
        Ok(&self.elements[position])
    }

    /// Returns the slot at `index` in the outermost dimension mutably.
    ///
    /// # Errors
    /// Returns `RuntimeError::IndexOutOfBounds` for negative or too large
    /// indices.
    pub fn get_mut(&mut self, index: i32, line: usize) -> EvalResult<&mut Value> {
        let position = i32_to_index_checked(index, self.elements.len(), line)?;
        Ok(&mut self.elements[position])
    }

    /// Follows one index per dimension, left to right.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` if any index is out of range.
    /// - `RuntimeError::ExpectedArray` if more indices are given than the
    ///   array has dimensions.
    pub fn element_at(&self, indices: &[i32], line: usize) -> EvalResult<&Value> {
        let Some((&first, rest)) = indices.split_first() else {
            return Err(RuntimeError::ExpectedArray { line });
        };
        let slot = self.get(first, line)?;
        if rest.is_empty() {
            Ok(slot)
        } else {
            slot.as_array(line)?.element_at(rest, line)
        }
    }

    /// Writes `value` into the slot addressed by `indices`.
    ///
    /// A leaf slot is checked against the element type (integers widen into
    /// real arrays). Addressing an inner dimension replaces that whole inner
    /// array, which requires a value of identical shape.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` if any index is out of range.
    /// - `RuntimeError::ExpectedArray` for too many indices.
    /// - `RuntimeError::TypeError` if the value does not fit the slot.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::ScalarType,
    ///     interpreter::value::{array::ArrayValue, core::Value},
    /// };
    ///
    /// let mut grid = ArrayValue::template(ScalarType::Real, &[2, 2]);
    /// grid.store(&[0, 1], Value::Integer(4), 1).unwrap();
    ///
    /// assert_eq!(grid.element_at(&[0, 1], 1).unwrap(), &Value::Real(4.0));
    /// assert_eq!(grid.element_at(&[1, 1], 1).unwrap(), &Value::Real(0.0));
    /// ```
    pub fn store(&mut self, indices: &[i32], value: Value, line: usize) -> EvalResult<()> {
        let Some((&first, rest)) = indices.split_first() else {
            return Err(RuntimeError::ExpectedArray { line });
        };
        let element = self.element;
        let slot = self.get_mut(first, line)?;

        if !rest.is_empty() {
            return slot.as_array_mut(line)?.store(rest, value, line);
        }

        let replacement = match &*slot {
            Value::Array(existing) => {
                let slot_type = VariableType::Array { element,
                                                      dimensions: existing.shape() };
                value.coerce_to(&slot_type, line)?
            },
            _ => value.coerce_to_scalar(element, line)?,
        };
        *slot = replacement;
        Ok(())
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn inner_arrays_are_independent_copies() {
        let mut matrix = ArrayValue::template(ScalarType::Integer, &[2, 3]);
        matrix.store(&[0, 1], Value::Integer(7), 1).unwrap();

        assert_eq!(matrix.element_at(&[0, 1], 1).unwrap(), &Value::Integer(7));
        assert_eq!(matrix.element_at(&[1, 1], 1).unwrap(), &Value::Integer(0));
        assert_eq!(matrix.to_string(), "[[0, 7, 0], [0, 0, 0]]");
    }

    #[test]
    fn out_of_range_indices_fail() {
        let mut row = ArrayValue::template(ScalarType::Boolean, &[3]);

        assert!(row.get(3, 1).is_err());
        assert!(row.get(-1, 1).is_err());
        assert!(row.store(&[5], Value::Boolean(true), 1).is_err());
        assert!(row.element_at(&[0, 0], 1).is_err());
    }

    #[test]
    fn element_type_is_enforced_on_store() {
        let mut row = ArrayValue::template(ScalarType::Char, &[2]);

        assert!(row.store(&[0], Value::Integer(1), 1).is_err());
        assert!(row.store(&[0], Value::Char('z'), 1).is_ok());
        assert_eq!(row.get(0, 1).unwrap(), &Value::Char('z'));
    }

    #[test]
    fn whole_rows_can_be_replaced_by_same_shape() {
        let mut matrix = ArrayValue::template(ScalarType::Integer, &[2, 2]);
        let mut row = ArrayValue::template(ScalarType::Integer, &[2]);
        row.store(&[1], Value::Integer(9), 1).unwrap();

        matrix.store(&[1], Value::Array(row), 1).unwrap();
        assert_eq!(matrix.element_at(&[1, 1], 1).unwrap(), &Value::Integer(9));

        let wide = ArrayValue::template(ScalarType::Integer, &[3]);
        assert!(matrix.store(&[0], Value::Array(wide), 1).is_err());
    }
}
