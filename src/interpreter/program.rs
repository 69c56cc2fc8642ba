use crate::interpreter::{
    symbols::{FunctionTable, VariableTable},
    tree::{
        core::Tree,
        node::{NodeId, Operator},
    },
};

/// Everything the parser produces: the tree plus the symbol tables built
/// alongside it.
#[derive(Debug, Clone)]
pub struct Program {
    /// The program tree.
    pub tree:      Tree,
    /// Every declared callable.
    pub functions: FunctionTable,
    /// Every declared variable, with its declared type and initial value.
    pub variables: VariableTable,
    /// The `Module` node.
    pub root:      NodeId,
}

impl Program {
    /// Returns the module name.
    #[must_use]
    pub fn module_name(&self) -> &str {
        match self.tree.operator(self.root) {
            Operator::Module { name, .. } => name,
            _ => "",
        }
    }

    /// Returns the entry block, if attached.
    #[must_use]
    pub fn beginning(&self) -> Option<NodeId> {
        match self.tree.operator(self.root) {
            Operator::Module { beginning, .. } => *beginning,
            _ => None,
        }
    }

    /// Returns the module-level statements followed by the entry block.
    #[must_use]
    pub fn top_level(&self) -> Vec<NodeId> {
        self.tree.children(self.root).chain(self.beginning()).collect()
    }

    /// Renders each top-level statement with its nested body.
    ///
    /// # Example
    /// ```
    /// use semtree::parse_source;
    ///
    /// let program = parse_source("module M;\nvariable integer x := 5;\nbeginning\noutput x;\nend M.")
    ///     .unwrap();
    ///
    /// assert_eq!(program.render_top_level(),
    ///            vec!["variable integer x := 5".to_string(), "beginning\n  output x".to_string()]);
    /// ```
    #[must_use]
    pub fn render_top_level(&self) -> Vec<String> {
        self.top_level()
            .into_iter()
            .map(|id| self.tree.render(id))
            .collect()
    }
}
