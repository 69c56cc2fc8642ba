use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{Argument, CallableKind, VariableType},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, ExecOutcome},
            storage::{Frame, ParamBinding},
        },
        symbols::VariableTable,
        value::core::Value,
    },
};

impl Context<'_> {
    /// Invokes a function or procedure and returns its result.
    ///
    /// Arguments are evaluated left to right in the caller's context. `in`
    /// parameters receive a type-checked copy (integers widen into `real`
    /// parameters); `var` parameters are bound to the caller's storage slot,
    /// which must have exactly the parameter's type. The body then runs in a
    /// fresh activation frame.
    ///
    /// # Returns
    /// The value of the `return` that ended the body, or integer `0` if the
    /// body completed. Returned function values are checked against the
    /// declared return type; the completion `0` is not.
    ///
    /// # Errors
    /// - `UnknownFunction` if `name` is not registered.
    /// - `ArgumentCountMismatch` for a wrong number of arguments.
    /// - `TypeError` for arguments or results of the wrong type.
    /// - Any error raised by the body.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::{Argument, Expr},
    ///     interpreter::{console::BufferConsole, evaluator::core::Context, value::core::Value},
    ///     parse_source,
    /// };
    ///
    /// let program = parse_source("module M;
    ///                             function public add(in integer a, in integer b) : integer
    ///                               return a + b;
    ///                             end add;
    ///                             beginning end M.").unwrap();
    /// let mut console = BufferConsole::new();
    /// let mut context = Context::new(&program, &mut console);
    ///
    /// let literal = |n| Argument::In(Expr::Literal { value: Value::Integer(n), line: 1 });
    /// let sum = context.call("add", &[literal(5), literal(10)], 1).unwrap();
    ///
    /// assert_eq!(sum, Value::Integer(15));
    /// ```
    pub fn call(&mut self, name: &str, arguments: &[Argument], line: usize) -> EvalResult<Value> {
        let functions = self.functions;
        let entry = functions.get(name)
                             .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                            line })?;
        let declaration = &entry.declaration;
        if arguments.len() != declaration.parameters.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             expected: declaration.parameters.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let mut params = HashMap::with_capacity(arguments.len());
        for (parameter, argument) in declaration.parameters.iter().zip(arguments) {
            let binding = match argument {
                Argument::In(expr) => {
                    let value = self.eval(expr)?
                                    .coerce_to_scalar(parameter.declared_type, expr.line_number())?;
                    ParamBinding::Value { declared_type: parameter.declared_type,
                                          value }
                },
                Argument::Var { id, line } => {
                    let location = self.locate(id, *line)?;
                    let (_, declared_type) = self.slot(&location, *line)?;
                    if declared_type != VariableType::Scalar(parameter.declared_type) {
                        return Err(RuntimeError::TypeError { details: format!("var parameter '{}' of '{name}' needs a {} variable, found {declared_type}",
                                                                              parameter.name,
                                                                              parameter.declared_type),
                                                             line:    *line, });
                    }
                    ParamBinding::Alias(location)
                },
            };
            params.insert(parameter.name.clone(), binding);
        }

        self.frames.push(Frame { params,
                                 locals: VariableTable::new() });
        debug!(callable = name, depth = self.frames.len(), "entering call");
        let outcome = self.exec_block(entry.node);
        self.frames.pop();
        debug!(callable = name, depth = self.frames.len(), "left call");

        match (outcome?, declaration.kind) {
            (ExecOutcome::Completed, _) => Ok(Value::Integer(0)),
            (ExecOutcome::Returned(value), CallableKind::Function(return_type)) => {
                value.coerce_to_scalar(return_type, line)
            },
            (ExecOutcome::Returned(value), CallableKind::Procedure) => Ok(value),
        }
    }
}
