use crate::ast::{Argument, CallableDeclaration, Expr, VariableDeclaration};

/// Index of a node inside its [`Tree`](crate::interpreter::tree::core::Tree)
/// arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Where a node is linked relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// The new node becomes the head of the anchor's child chain.
    AsFirstChildOf,
    /// The new node is spliced directly after the anchor.
    AsNextSiblingOf,
}

/// A statement-like construct of the program.
///
/// Block-bearing variants carry the scope id their body contributes to the
/// ids of nested declarations. Their statements hang off the node's child
/// chain; `If` additionally keeps its `elseif` and `else` branches in ordered
/// slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// The program unit and tree root.
    Module {
        /// The module name.
        name:      String,
        /// The module's scope id (its name).
        scope_id:  String,
        /// The entry block, attached once.
        beginning: Option<NodeId>,
    },
    /// The entry block executed after module-level declarations.
    Beginning {
        /// Always `<module>^beginning`.
        scope_id: String,
    },
    /// A function or procedure declaration; its body is the child chain.
    Callable(CallableDeclaration),
    /// A variable declaration.
    Variable(VariableDeclaration),
    /// Assignment to a variable, parameter or array slot.
    Let {
        /// Resolved id of the target.
        target:  String,
        /// Indices addressing an array slot, empty for a plain assignment.
        indices: Vec<Expr>,
        /// The assigned expression.
        value:   Expr,
    },
    /// A pre-tested loop.
    While {
        /// The loop's scope id.
        scope_id:  String,
        /// Checked before every iteration.
        condition: Expr,
    },
    /// A conditional with optional `elseif` and `else` branches.
    If {
        /// The `then` body's scope id.
        scope_id:    String,
        /// The `if` condition.
        condition:   Expr,
        /// `ElseIf` nodes in source order.
        else_ifs:    Vec<NodeId>,
        /// The `Else` node, if any.
        else_branch: Option<NodeId>,
    },
    /// One `elseif` branch of an `If`.
    ElseIf {
        /// The branch's scope id.
        scope_id:  String,
        /// The branch condition.
        condition: Expr,
    },
    /// The `else` branch of an `If`.
    Else {
        /// The branch's scope id.
        scope_id: String,
    },
    /// A procedure or function call whose result is discarded.
    Call {
        /// The callable name.
        name:      String,
        /// Arguments matched against the parameters.
        arguments: Vec<Argument>,
    },
    /// Reads one console line into a variable, parameter or array slot.
    Input {
        /// Resolved id of the target.
        target:  String,
        /// Indices addressing an array slot.
        indices: Vec<Expr>,
    },
    /// Writes a value as one console line.
    Output {
        /// The printed expression.
        value: Expr,
    },
    /// Leaves the enclosing callable.
    Return {
        /// The result, required in functions and absent in procedures.
        value: Option<Expr>,
    },
}

impl Operator {
    /// Returns the scope id of block-bearing operators.
    ///
    /// # Example
    /// ```
    /// use semtree::interpreter::tree::node::Operator;
    ///
    /// let block = Operator::Else { scope_id: "Main^beginning^else3".to_string() };
    /// assert_eq!(block.scope_id(), Some("Main^beginning^else3"));
    ///
    /// let output = Operator::Return { value: None };
    /// assert_eq!(output.scope_id(), None);
    /// ```
    #[must_use]
    pub fn scope_id(&self) -> Option<&str> {
        match self {
            Self::Module { scope_id, .. }
            | Self::Beginning { scope_id }
            | Self::While { scope_id, .. }
            | Self::If { scope_id, .. }
            | Self::ElseIf { scope_id, .. }
            | Self::Else { scope_id } => Some(scope_id),
            Self::Callable(declaration) => Some(&declaration.scope_id),
            Self::Variable(_)
            | Self::Let { .. }
            | Self::Call { .. }
            | Self::Input { .. }
            | Self::Output { .. }
            | Self::Return { .. } => None,
        }
    }

    /// Returns the variable id if this is a declaration.
    #[must_use]
    pub fn declared_id(&self) -> Option<&str> {
        match self {
            Self::Variable(declaration) => Some(&declaration.id),
            _ => None,
        }
    }
}

/// One arena slot: an operator plus its links.
///
/// `parent` is only guaranteed on the head of a child chain; later siblings
/// may have it cleared and recover it through `previous`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What the node does.
    pub operator:    Operator,
    /// Line the construct started on.
    pub line:        usize,
    pub(crate) parent:      Option<NodeId>,
    pub(crate) previous:    Option<NodeId>,
    pub(crate) next:        Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
}

impl Node {
    pub(crate) const fn detached(operator: Operator, line: usize) -> Self {
        Self { operator,
               line,
               parent: None,
               previous: None,
               next: None,
               first_child: None }
    }

    /// The next sibling, if any.
    #[must_use]
    pub const fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// The previous sibling, if any.
    #[must_use]
    pub const fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    /// The head of the child chain, if any.
    #[must_use]
    pub const fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }
}
