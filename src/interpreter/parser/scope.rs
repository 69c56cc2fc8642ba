use tracing::{debug, trace};

use crate::{
    ast::{CallableDeclaration, PassMode, qualify},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        tree::node::{InsertMode, NodeId, Operator},
    },
};

/// One open block on the parser's scope stack.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    /// The block-bearing node that owns the body being parsed.
    pub node:       NodeId,
    /// The scope id this block contributes.
    pub scope_id:   String,
    /// Statements already linked under `node`, in source order.
    pub statements: Vec<NodeId>,
}

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Opens a block.
    pub(in crate::interpreter::parser) fn push_scope(&mut self, node: NodeId, scope_id: String) {
        self.scopes.push(ScopeFrame { node,
                                      scope_id,
                                      statements: Vec::new() });
    }

    /// Closes the innermost block.
    pub(in crate::interpreter::parser) fn pop_scope(&mut self) -> Option<ScopeFrame> {
        self.scopes.pop()
    }

    /// Returns the scope id of the innermost open block.
    pub(in crate::interpreter::parser) fn current_scope_id(&self) -> &str {
        self.scopes.last().map_or("", |frame| frame.scope_id.as_str())
    }

    /// Derives the scope id of a new anonymous block, such as `while3`,
    /// nested in the innermost open block.
    pub(in crate::interpreter::parser) fn block_scope_id(&mut self, label: &str) -> String {
        self.block_counter += 1;
        qualify(self.current_scope_id(), &format!("{label}{}", self.block_counter))
    }

    /// Links a finished statement under the innermost open block.
    ///
    /// The first statement of a block becomes its first child; later ones are
    /// spliced after the most recent statement.
    pub(in crate::interpreter::parser) fn attach(&mut self, node: NodeId) {
        let depth = self.scopes.len();
        let Some(frame) = self.scopes.last_mut() else {
            return;
        };
        match frame.statements.last() {
            Some(&previous) => self.tree.insert(previous, node, InsertMode::AsNextSiblingOf),
            None => self.tree.insert(frame.node, node, InsertMode::AsFirstChildOf),
        }
        frame.statements.push(node);
        if depth == 1 {
            debug!(node = node.index(), "attached top-level statement");
        } else {
            trace!(depth, node = node.index(), "attached statement");
        }
    }

    /// Returns the innermost open callable, if any.
    pub(in crate::interpreter::parser) fn enclosing_callable(&self) -> Option<&CallableDeclaration> {
        self.scopes
            .iter()
            .rev()
            .find_map(|frame| match self.tree.operator(frame.node) {
                Operator::Callable(declaration) => Some(declaration),
                _ => None,
            })
    }

    /// Finds a callable by name: a registered one, or one whose body is
    /// being parsed right now.
    pub(in crate::interpreter::parser) fn lookup_callable(&self,
                                                          name: &str,
                                                          line: usize)
                                                          -> ParseResult<CallableDeclaration> {
        if let Some(entry) = self.functions.get(name) {
            return Ok(entry.declaration.clone());
        }
        self.enclosing_callable()
            .filter(|declaration| declaration.name == name)
            .cloned()
            .ok_or_else(|| ParseError::UnknownFunction { name: name.to_string(),
                                                         line })
    }

    /// Resolves a bare identifier to the id of the binding it names.
    ///
    /// Parameters of any open callable win and resolve to their bare name.
    /// Otherwise each open block is tried from the innermost outwards: the
    /// candidate `<scope id>^<name>` is accepted if the variable table holds
    /// it. Only when no block matches are the blocks' statements so far and
    /// the tree reachable from the root searched.
    ///
    /// # Errors
    /// `UnknownIdentifier` when no open block declares the name.
    pub(in crate::interpreter::parser) fn resolve(&self, name: &str, line: usize) -> ParseResult<String> {
        let is_parameter = self.scopes
                               .iter()
                               .rev()
                               .any(|frame| match self.tree.operator(frame.node) {
                                   Operator::Callable(declaration) => declaration.parameter(name).is_some(),
                                   _ => false,
                               });
        if is_parameter {
            return Ok(name.to_string());
        }

        let candidates: Vec<String> = self.scopes
                                          .iter()
                                          .rev()
                                          .map(|frame| qualify(&frame.scope_id, name))
                                          .collect();
        if let Some(candidate) = candidates.iter().find(|candidate| self.variables.contains(candidate)) {
            return Ok(candidate.clone());
        }

        // Declarations register in the variable table as they are parsed, so
        // the tree walk below only runs for names that are about to fail.
        for (frame, candidate) in self.scopes.iter().rev().zip(candidates) {
            let in_progress = frame.statements
                                   .iter()
                                   .any(|&id| self.tree.operator(id).declared_id() == Some(candidate.as_str()));
            if in_progress || self.tree.declares(&candidate) {
                return Ok(candidate);
            }
        }

        Err(ParseError::UnknownIdentifier { name: name.to_string(),
                                            line })
    }

    /// Resolves the target of `let` or `input`, rejecting `in` parameters.
    ///
    /// # Errors
    /// `ReadOnlyParameter` for `in` parameters, or any resolution error.
    pub(in crate::interpreter::parser) fn resolve_writable(&self,
                                                           name: &str,
                                                           line: usize)
                                                           -> ParseResult<String> {
        let id = self.resolve(name, line)?;
        if self.is_read_only(&id) {
            return Err(ParseError::ReadOnlyParameter { name: name.to_string(),
                                                       line });
        }
        Ok(id)
    }

    /// Returns `true` if `id` names an `in` parameter of the innermost
    /// callable.
    pub(in crate::interpreter::parser) fn is_read_only(&self, id: &str) -> bool {
        self.enclosing_callable()
            .and_then(|declaration| declaration.parameter(id))
            .is_some_and(|parameter| parameter.pass_mode == PassMode::In)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{error::ParseError, parse_source};

    #[test]
    fn same_name_in_sibling_blocks_gets_distinct_ids() {
        let source = "module M;
                      beginning
                        while false repeat variable integer i := 1; end while;
                        while false repeat variable integer i := 2; end while;
                      end M.";
        let program = parse_source(source).unwrap();

        assert_eq!(program.variables.ids_named("i"),
                   vec!["M^beginning^while1^i", "M^beginning^while2^i"]);
    }

    #[test]
    fn inner_blocks_see_outer_declarations() {
        let source = "module M;
                      variable integer total;
                      beginning
                        variable integer step := 2;
                        if true then
                          while false repeat
                            let total := total + step;
                          end while;
                        end if;
                      end M.";
        let program = parse_source(source).unwrap();

        let rendered = program.render_top_level();
        assert!(rendered[1].contains("let total := (total + step)"));
    }

    #[test]
    fn closed_blocks_hide_their_declarations() {
        let source = "module M;
                      beginning
                        if true then variable integer hidden; end if;
                        output hidden;
                      end M.";

        assert_eq!(parse_source(source).unwrap_err(),
                   ParseError::UnknownIdentifier { name: "hidden".to_string(),
                                                   line: 4, });
    }

    #[test]
    fn parameters_shadow_module_variables() {
        let source = "module M;
                      variable integer a := 1;
                      function public f(in integer a) : integer
                        return a;
                      end f;
                      beginning output f(2); end M.";
        let program = parse_source(source).unwrap();

        let rendered = program.render_top_level();
        assert_eq!(rendered[1],
                   "function public f(in integer a) : integer\n  return a\nend f");
    }

    #[test]
    fn in_parameters_are_read_only() {
        let source = "module M;
                      procedure public p(in integer a)
                        let a := 3;
                      end p;
                      beginning end M.";

        assert_eq!(parse_source(source).unwrap_err(),
                   ParseError::ReadOnlyParameter { name: "a".to_string(),
                                                   line: 3, });
    }

    #[test]
    fn use_before_declaration_is_rejected() {
        let source = "module M; beginning output x; variable integer x; end M.";

        assert!(matches!(parse_source(source),
                         Err(ParseError::UnknownIdentifier { .. })));
    }

    #[test]
    fn long_programs_resolve_outer_variables() {
        let body = "let total := total + 1;\n".repeat(5000);
        let source = format!("module M;
                              variable integer total;
                              beginning
                                while false repeat
                                  if true then
                                    {body}
                                  end if;
                                end while;
                              end M.");
        let program = parse_source(&source).unwrap();

        assert_eq!(program.variables.len(), 1);
        assert!(program.render_top_level()[1].contains("let total := (total + 1)"));
    }
}
