use std::collections::HashMap;

use crate::{
    ast::{CallableDeclaration, VariableType},
    error::ParseError,
    interpreter::{tree::node::NodeId, value::core::Value},
};

/// A variable slot: its declaration data plus its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The declared type every stored value is checked against.
    pub declared_type: VariableType,
    /// The bare name.
    pub name:          String,
    /// The scope-qualified id.
    pub id:            String,
    /// The current value.
    pub value:         Value,
}

/// Variables keyed by scope-qualified id.
///
/// The parser fills one table with every declaration it sees; at run time the
/// executor keeps one table for module and entry-block storage and one per
/// activation frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    variables: HashMap<String, Variable>,
}

impl VariableTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a variable under its id.
    pub fn declare(&mut self, variable: Variable) {
        self.variables.insert(variable.id.clone(), variable);
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.variables.contains_key(id)
    }

    /// Looks a variable up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Looks a variable up by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Variable> {
        self.variables.get_mut(id)
    }

    /// Returns the number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns every id sharing the bare `name`, sorted.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::{ScalarType, VariableType},
    ///     interpreter::{
    ///         symbols::{Variable, VariableTable},
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let mut table = VariableTable::new();
    /// for id in ["M^beginning^while1^i", "M^beginning^while2^i", "M^n"] {
    ///     table.declare(Variable { declared_type: VariableType::Scalar(ScalarType::Integer),
    ///                              name:          id.rsplit('^').next().unwrap().to_string(),
    ///                              id:            id.to_string(),
    ///                              value:         Value::Integer(0), });
    /// }
    ///
    /// assert_eq!(table.ids_named("i"), vec!["M^beginning^while1^i", "M^beginning^while2^i"]);
    /// ```
    #[must_use]
    pub fn ids_named(&self, name: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self.variables
                                     .values()
                                     .filter(|variable| variable.name == name)
                                     .map(|variable| variable.id.as_str())
                                     .collect();
        ids.sort_unstable();
        ids
    }
}

/// A registered callable: the node owning its body plus its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    /// The `Callable` node whose child chain is the body.
    pub node:        NodeId,
    /// Signature data.
    pub declaration: CallableDeclaration,
}

/// Functions and procedures keyed by name. Names are unique per module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionTable {
    functions: HashMap<String, FunctionEntry>,
}

impl FunctionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callable.
    ///
    /// # Errors
    /// Returns `ParseError::FunctionAlreadyDefined` if the name is taken.
    pub fn define(&mut self, entry: FunctionEntry, line: usize) -> Result<(), ParseError> {
        let name = entry.declaration.name.clone();
        if self.functions.contains_key(&name) {
            return Err(ParseError::FunctionAlreadyDefined { name, line });
        }
        self.functions.insert(name, entry);
        Ok(())
    }

    /// Looks a callable up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    /// Returns the number of registered callables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{CallableKind, Visibility};

    fn entry(name: &str, node: usize) -> FunctionEntry {
        FunctionEntry { node:        NodeId(node),
                        declaration: CallableDeclaration { kind:       CallableKind::Procedure,
                                                           visibility: Visibility::Public,
                                                           name:       name.to_string(),
                                                           parameters: Vec::new(),
                                                           scope_id:   format!("M^{name}"), }, }
    }

    #[test]
    fn duplicate_callables_are_rejected() {
        let mut functions = FunctionTable::new();
        functions.define(entry("show", 1), 3).unwrap();

        let err = functions.define(entry("show", 7), 9).unwrap_err();
        assert_eq!(err,
                   ParseError::FunctionAlreadyDefined { name: "show".to_string(),
                                                        line: 9, });
        assert_eq!(functions.get("show").map(|entry| entry.node), Some(NodeId(1)));
        assert_eq!(functions.len(), 1);
    }
}
