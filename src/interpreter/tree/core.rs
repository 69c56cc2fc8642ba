use crate::{
    error::TreeError,
    interpreter::tree::node::{InsertMode, Node, NodeId, Operator},
};

/// The program tree.
///
/// An arena of [`Node`]s linked as first-child/next-sibling chains with
/// back-links. Nodes are allocated detached and linked afterwards, so a block
/// can collect its body before it is placed under its parent.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root:  Option<NodeId>,
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new, unlinked node and returns its id.
    pub fn allocate(&mut self, operator: Operator, line: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(operator, line));
        id
    }

    /// Returns the number of allocated nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node was allocated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the module root, once set.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node behind `id`.
    ///
    /// Ids are only handed out by [`Tree::allocate`], so they always address
    /// a slot of the tree that produced them.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the operator behind `id`.
    #[must_use]
    pub fn operator(&self, id: NodeId) -> &Operator {
        &self.nodes[id.0].operator
    }

    /// Returns the operator behind `id` mutably.
    pub fn operator_mut(&mut self, id: NodeId) -> &mut Operator {
        &mut self.nodes[id.0].operator
    }

    /// Makes a `Module` node the root of the tree.
    ///
    /// # Errors
    /// Returns `TreeError::RootAlreadySet` if the tree already has a root.
    pub fn insert_root(&mut self, module: NodeId) -> Result<(), TreeError> {
        if self.root.is_some() {
            return Err(TreeError::RootAlreadySet);
        }
        self.root = Some(module);
        Ok(())
    }

    /// Links `new` relative to `anchor`.
    ///
    /// `AsNextSiblingOf` splices `new` right after `anchor` and gives it
    /// `anchor`'s parent. `AsFirstChildOf` makes `new` the head of `anchor`'s
    /// child chain; the previous head moves behind it and loses its parent
    /// link, which [`Tree::parent`] still recovers by walking back.
    ///
    /// # Example
    /// ```
    /// use semtree::interpreter::tree::{
    ///     core::Tree,
    ///     node::{InsertMode, Operator},
    /// };
    ///
    /// let mut tree = Tree::new();
    /// let block = tree.allocate(Operator::Else { scope_id: "M^else1".to_string() }, 1);
    /// let first = tree.allocate(Operator::Return { value: None }, 2);
    /// let second = tree.allocate(Operator::Return { value: None }, 3);
    ///
    /// tree.insert(block, first, InsertMode::AsFirstChildOf);
    /// tree.insert(first, second, InsertMode::AsNextSiblingOf);
    ///
    /// assert_eq!(tree.children(block).collect::<Vec<_>>(), vec![first, second]);
    /// assert_eq!(tree.parent(second), Some(block));
    /// ```
    pub fn insert(&mut self, anchor: NodeId, new: NodeId, mode: InsertMode) {
        match mode {
            InsertMode::AsFirstChildOf => {
                let old_head = self.nodes[anchor.0].first_child;
                if let Some(old) = old_head {
                    let demoted = &mut self.nodes[old.0];
                    demoted.previous = Some(new);
                    demoted.parent = None;
                }
                let node = &mut self.nodes[new.0];
                node.parent = Some(anchor);
                node.previous = None;
                node.next = old_head;
                self.nodes[anchor.0].first_child = Some(new);
            },
            InsertMode::AsNextSiblingOf => {
                let parent = self.parent(anchor);
                let old_next = self.nodes[anchor.0].next;
                if let Some(next) = old_next {
                    self.nodes[next.0].previous = Some(new);
                }
                let node = &mut self.nodes[new.0];
                node.parent = parent;
                node.previous = Some(anchor);
                node.next = old_next;
                self.nodes[anchor.0].next = Some(new);
            },
        }
    }

    /// Attaches the entry block to the module that owns the tree.
    ///
    /// The module is located by a walk bounded by the node count.
    ///
    /// # Errors
    /// - `TreeError::ModuleNotFound` if no module is reachable from the root.
    /// - `TreeError::BeginningAlreadySet` on a second entry block.
    pub fn set_beginning(&mut self, beginning: NodeId) -> Result<(), TreeError> {
        let module = self.find_operator(|operator| matches!(operator, Operator::Module { .. }))
                         .ok_or(TreeError::ModuleNotFound)?;
        match &mut self.nodes[module.0].operator {
            Operator::Module { beginning: slot @ None, .. } => *slot = Some(beginning),
            Operator::Module { .. } => return Err(TreeError::BeginningAlreadySet),
            _ => return Err(TreeError::ModuleNotFound),
        }
        self.nodes[beginning.0].parent = Some(module);
        Ok(())
    }

    /// Appends an `ElseIf` or `Else` node to an `If` node's branch slots.
    ///
    /// # Errors
    /// Returns `TreeError::NotAnIf` if `if_node` is not an `If`, or if
    /// `branch` is neither an `ElseIf` nor an `Else`.
    pub fn attach_branch(&mut self, if_node: NodeId, branch: NodeId) -> Result<(), TreeError> {
        let is_else_if = match self.nodes[branch.0].operator {
            Operator::ElseIf { .. } => true,
            Operator::Else { .. } => false,
            _ => return Err(TreeError::NotAnIf),
        };
        match &mut self.nodes[if_node.0].operator {
            Operator::If { else_ifs, .. } if is_else_if => else_ifs.push(branch),
            Operator::If { else_branch, .. } => *else_branch = Some(branch),
            _ => return Err(TreeError::NotAnIf),
        }
        self.nodes[branch.0].parent = Some(if_node);
        Ok(())
    }

    /// Iterates over the child chain of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { tree:      self,
                   next:      self.nodes[id.0].first_child,
                   remaining: self.nodes.len(), }
    }

    /// Returns the syntactic parent of `id`.
    ///
    /// Walks back to the head of the sibling chain, whose parent link is
    /// authoritative.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[current.0];
            if node.parent.is_some() {
                return node.parent;
            }
            current = node.previous?;
        }
        None
    }

    /// Finds the first node reachable from the root whose operator matches.
    ///
    /// The walk visits at most as many nodes as the arena holds.
    pub fn find_operator(&self, predicate: impl Fn(&Operator) -> bool) -> Option<NodeId> {
        self.reachable().into_iter().find(|id| predicate(&self.nodes[id.0].operator))
    }

    /// Returns `true` if a declaration with `variable_id` is reachable from
    /// the root.
    #[must_use]
    pub fn declares(&self, variable_id: &str) -> bool {
        self.find_operator(|operator| operator.declared_id() == Some(variable_id))
            .is_some()
    }

    /// Lists the nodes reachable from the root in pre-order: each node, its
    /// entry block or branches, then its child chain.
    #[must_use]
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut pending: Vec<NodeId> = self.root.into_iter().collect();

        while let Some(id) = pending.pop() {
            if visited.len() >= self.nodes.len() {
                break;
            }
            visited.push(id);

            let mut successors: Vec<NodeId> = self.children(id).collect();
            match &self.nodes[id.0].operator {
                Operator::Module { beginning, .. } => successors.extend(beginning),
                Operator::If { else_ifs, else_branch, .. } => {
                    successors.extend(else_ifs);
                    successors.extend(else_branch);
                },
                _ => {},
            }
            pending.extend(successors.into_iter().rev());
        }
        visited
    }
}

/// Iterator over a child chain, bounded by the arena size.
pub struct Children<'a> {
    tree:      &'a Tree,
    next:      Option<NodeId>,
    remaining: usize,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.tree.nodes[current.0].next;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn block(tree: &mut Tree, scope_id: &str) -> NodeId {
        tree.allocate(Operator::Else { scope_id: scope_id.to_string() }, 1)
    }

    fn leaf(tree: &mut Tree) -> NodeId {
        tree.allocate(Operator::Return { value: None }, 1)
    }

    fn module(tree: &mut Tree) -> NodeId {
        tree.allocate(Operator::Module { name:      "Main".to_string(),
                                         scope_id:  "Main".to_string(),
                                         beginning: None, },
                      1)
    }

    #[test]
    fn first_child_insert_demotes_previous_head() {
        let mut tree = Tree::new();
        let parent = block(&mut tree, "A");
        let old = leaf(&mut tree);
        let new = leaf(&mut tree);

        tree.insert(parent, old, InsertMode::AsFirstChildOf);
        tree.insert(parent, new, InsertMode::AsFirstChildOf);

        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![new, old]);
        assert_eq!(tree.node(old).parent, None);
        assert_eq!(tree.node(old).previous(), Some(new));
        assert_eq!(tree.parent(old), Some(parent));
    }

    #[test]
    fn sibling_insert_splices_and_rewires_back_links() {
        let mut tree = Tree::new();
        let parent = block(&mut tree, "A");
        let a = leaf(&mut tree);
        let c = leaf(&mut tree);
        let b = leaf(&mut tree);

        tree.insert(parent, a, InsertMode::AsFirstChildOf);
        tree.insert(a, c, InsertMode::AsNextSiblingOf);
        tree.insert(a, b, InsertMode::AsNextSiblingOf);

        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.node(c).previous(), Some(b));
        assert_eq!(tree.node(b).next(), Some(c));
        assert_eq!(tree.parent(c), Some(parent));
    }

    #[test]
    fn root_and_beginning_are_set_once() {
        let mut tree = Tree::new();
        let root = module(&mut tree);
        let beginning = tree.allocate(Operator::Beginning { scope_id: "Main^beginning".to_string() },
                                      2);
        let second = tree.allocate(Operator::Beginning { scope_id: "Main^beginning".to_string() },
                                   3);

        assert_eq!(tree.set_beginning(beginning), Err(TreeError::ModuleNotFound));

        tree.insert_root(root).unwrap();
        assert_eq!(tree.insert_root(root), Err(TreeError::RootAlreadySet));

        tree.set_beginning(beginning).unwrap();
        assert_eq!(tree.parent(beginning), Some(root));
        assert_eq!(tree.set_beginning(second), Err(TreeError::BeginningAlreadySet));
    }

    #[test]
    fn declarations_are_found_only_when_reachable() {
        use crate::{
            ast::{Initializer, ScalarType, VariableDeclaration, VariableType},
            interpreter::value::core::Value,
        };

        let mut tree = Tree::new();
        let root = module(&mut tree);
        tree.insert_root(root).unwrap();

        let declaration = VariableDeclaration { declared_type: VariableType::Scalar(ScalarType::Integer),
                                                name:          "x".to_string(),
                                                id:            "Main^x".to_string(),
                                                initializer:   Initializer::Template(Value::Integer(0)), };
        let variable = tree.allocate(Operator::Variable(declaration), 2);

        assert!(!tree.declares("Main^x"));
        tree.insert(root, variable, InsertMode::AsFirstChildOf);
        assert!(tree.declares("Main^x"));
        assert!(!tree.declares("Main^y"));
    }

    #[test]
    fn branches_attach_only_to_if() {
        use crate::ast::Expr;
        use crate::interpreter::value::core::Value;

        let mut tree = Tree::new();
        let condition = Expr::Literal { value: Value::Boolean(true),
                                        line:  1, };
        let if_node = tree.allocate(Operator::If { scope_id:    "M^if1".to_string(),
                                                   condition:   condition.clone(),
                                                   else_ifs:    Vec::new(),
                                                   else_branch: None, },
                                    1);
        let else_if = tree.allocate(Operator::ElseIf { scope_id: "M^elseif2".to_string(),
                                                       condition },
                                    2);
        let otherwise = block(&mut tree, "M^else3");
        let stray = leaf(&mut tree);

        tree.attach_branch(if_node, else_if).unwrap();
        tree.attach_branch(if_node, otherwise).unwrap();
        assert_eq!(tree.attach_branch(if_node, stray), Err(TreeError::NotAnIf));
        assert_eq!(tree.attach_branch(stray, otherwise), Err(TreeError::NotAnIf));

        let Operator::If { else_ifs, else_branch, .. } = tree.operator(if_node) else {
            panic!("expected if");
        };
        assert_eq!(else_ifs, &vec![else_if]);
        assert_eq!(*else_branch, Some(otherwise));
        assert_eq!(tree.parent(otherwise), Some(if_node));
    }
}
