use std::collections::HashMap;

use crate::{
    ast::{SCOPE_SEPARATOR, ScalarType, VariableType},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        symbols::{Variable, VariableTable},
        value::core::Value,
    },
};

/// A storage slot a `var` parameter can alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A module or entry-block variable.
    Global(String),
    /// A local variable of the activation frame at `frame`.
    Local {
        /// Index into the frame stack.
        frame: usize,
        /// The variable id.
        id:    String,
    },
    /// A by-value parameter of the activation frame at `frame`.
    Parameter {
        /// Index into the frame stack.
        frame: usize,
        /// The parameter name.
        name:  String,
    },
}

/// How a parameter is bound inside one activation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamBinding {
    /// An `in` parameter: a private copy of the argument.
    Value {
        /// The parameter's declared type.
        declared_type: ScalarType,
        /// The bound value.
        value:         Value,
    },
    /// A `var` parameter: reads and writes go to the caller's slot.
    Alias(Location),
}

/// Storage of one call: parameter bindings and local variables.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Parameter bindings by name.
    pub params: HashMap<String, ParamBinding>,
    /// Variables declared while the body runs.
    pub locals: VariableTable,
}

impl Context<'_> {
    /// Registers a variable in the innermost activation frame, or in the
    /// global table outside any call.
    pub(crate) fn declare(&mut self, variable: Variable) {
        match self.frames.last_mut() {
            Some(frame) => frame.locals.declare(variable),
            None => self.globals.declare(variable),
        }
    }

    /// Finds the storage slot an id refers to right now.
    ///
    /// Bare ids are parameters of the innermost frame; aliases are followed
    /// to the caller's slot. Qualified ids are looked up in the innermost
    /// frame's locals first, then in the global table.
    ///
    /// # Errors
    /// `UnknownVariable` if nothing holds the id.
    pub(crate) fn locate(&self, id: &str, line: usize) -> EvalResult<Location> {
        let unknown = || RuntimeError::UnknownVariable { name: id.to_string(),
                                                         line };
        let innermost = self.frames.len().checked_sub(1);

        if !id.contains(SCOPE_SEPARATOR) {
            let frame = innermost.ok_or_else(unknown)?;
            return match self.frames[frame].params.get(id) {
                Some(ParamBinding::Alias(location)) => Ok(location.clone()),
                Some(ParamBinding::Value { .. }) => Ok(Location::Parameter { frame,
                                                                             name: id.to_string() }),
                None => Err(unknown()),
            };
        }

        if let Some(frame) = innermost
           && self.frames[frame].locals.contains(id)
        {
            return Ok(Location::Local { frame,
                                        id: id.to_string() });
        }
        if self.globals.contains(id) {
            return Ok(Location::Global(id.to_string()));
        }
        Err(unknown())
    }

    /// Returns the value and declared type stored at `location`.
    pub(crate) fn slot(&self, location: &Location, line: usize) -> EvalResult<(&Value, VariableType)> {
        let unknown = |name: &str| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                   line };
        let variable = match location {
            Location::Global(id) => self.globals.get(id).ok_or_else(|| unknown(id.as_str()))?,
            Location::Local { frame, id } => {
                self.frames[*frame].locals.get(id).ok_or_else(|| unknown(id.as_str()))?
            },
            Location::Parameter { frame, name } => {
                return match self.frames[*frame].params.get(name) {
                    Some(ParamBinding::Value { declared_type, value }) => {
                        Ok((value, VariableType::Scalar(*declared_type)))
                    },
                    _ => Err(unknown(name.as_str())),
                };
            },
        };
        Ok((&variable.value, variable.declared_type.clone()))
    }

    /// Returns the value stored at `location` mutably, with its declared type.
    fn slot_mut(&mut self, location: &Location, line: usize) -> EvalResult<(&mut Value, VariableType)> {
        let unknown = |name: &str| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                   line };
        let variable = match location {
            Location::Global(id) => self.globals.get_mut(id).ok_or_else(|| unknown(id.as_str()))?,
            Location::Local { frame, id } => {
                self.frames[*frame].locals.get_mut(id).ok_or_else(|| unknown(id.as_str()))?
            },
            Location::Parameter { frame, name } => {
                return match self.frames[*frame].params.get_mut(name) {
                    Some(ParamBinding::Value { declared_type, value }) => {
                        Ok((value, VariableType::Scalar(*declared_type)))
                    },
                    _ => Err(unknown(name.as_str())),
                };
            },
        };
        Ok((&mut variable.value, variable.declared_type.clone()))
    }

    /// Reads the current value of a variable or parameter.
    pub(crate) fn load(&self, id: &str, line: usize) -> EvalResult<&Value> {
        let location = self.locate(id, line)?;
        self.slot(&location, line).map(|(value, _)| value)
    }

    /// Writes `value` to a variable, parameter or array slot.
    ///
    /// Whole-variable writes are checked against the declared type; indexed
    /// writes against the array's element type.
    pub(crate) fn store(&mut self, id: &str, indices: &[i32], value: Value, line: usize) -> EvalResult<()> {
        let location = self.locate(id, line)?;
        let (slot, declared_type) = self.slot_mut(&location, line)?;
        if indices.is_empty() {
            *slot = value.coerce_to(&declared_type, line)?;
            Ok(())
        } else {
            slot.as_array_mut(line)?.store(indices, value, line)
        }
    }

    /// Returns the declared type of what `id` with `depth` indices
    /// addresses.
    pub(crate) fn addressed_type(&self, id: &str, depth: usize, line: usize) -> EvalResult<VariableType> {
        let location = self.locate(id, line)?;
        let (_, declared_type) = self.slot(&location, line)?;
        declared_type.indexed(depth)
                     .ok_or(RuntimeError::ExpectedArray { line })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{interpreter::console::BufferConsole, parse_source};

    #[test]
    fn aliases_resolve_to_the_callers_slot() {
        let program = parse_source("module M; beginning end M.").unwrap();
        let mut console = BufferConsole::new();
        let mut context = Context::new(&program, &mut console);
        context.declare(Variable { declared_type: VariableType::Scalar(ScalarType::Integer),
                                   name:          "x".to_string(),
                                   id:            "M^x".to_string(),
                                   value:         Value::Integer(1), });

        let mut params = HashMap::new();
        params.insert("n".to_string(), ParamBinding::Alias(Location::Global("M^x".to_string())));
        context.frames.push(Frame { params,
                                    locals: VariableTable::new() });

        context.store("n", &[], Value::Integer(9), 1).unwrap();
        context.frames.pop();

        assert_eq!(context.load("M^x", 1).unwrap(), &Value::Integer(9));
        assert!(context.load("n", 1).is_err());
    }

    #[test]
    fn whole_writes_are_type_checked() {
        let program = parse_source("module M; beginning end M.").unwrap();
        let mut console = BufferConsole::new();
        let mut context = Context::new(&program, &mut console);
        context.declare(Variable { declared_type: VariableType::Scalar(ScalarType::Real),
                                   name:          "r".to_string(),
                                   id:            "M^r".to_string(),
                                   value:         Value::Real(0.0), });

        context.store("M^r", &[], Value::Integer(2), 1).unwrap();
        assert_eq!(context.load("M^r", 1).unwrap(), &Value::Real(2.0));
        assert!(context.store("M^r", &[], Value::from("two"), 1).is_err());
        assert!(context.store("M^r", &[0], Value::Integer(1), 1).is_err());
    }
}
