use crate::{
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        tree::node::{NodeId, Operator},
    },
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses a pre-tested loop.
    ///
    /// Grammar: `while := "while" expression "repeat" statement* "end" "while"
    /// ";"`
    ///
    /// # Returns
    /// The `While` node with its body linked, ready to be attached to the
    /// enclosing block.
    pub(in crate::interpreter::parser) fn parse_while(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::While, "'while'")?;
        let condition = self.parse_expression()?;
        self.expect(&Token::Repeat, "'repeat'")?;

        let scope_id = self.block_scope_id("while");
        let node = self.tree.allocate(Operator::While { scope_id: scope_id.clone(),
                                                        condition },
                                      line);
        self.push_scope(node, scope_id);
        self.parse_block_body(&[Token::End])?;
        self.pop_scope();

        self.expect_end(&Token::While, "while")?;
        Ok(node)
    }

    /// Parses a conditional with its branches.
    ///
    /// Grammar:
    /// ```text
    ///     if := "if" expression "then" statement*
    ///           ("elseif" expression "then" statement*)*
    ///           ["else" statement*]
    ///           "end" "if" ";"
    /// ```
    /// Each branch is its own block with its own scope id. `elseif` and
    /// `else` nodes are stored in the `If` node's branch slots rather than in
    /// a child chain.
    pub(in crate::interpreter::parser) fn parse_if(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::If, "'if'")?;
        let condition = self.parse_expression()?;
        self.expect(&Token::Then, "'then'")?;

        let scope_id = self.block_scope_id("if");
        let if_node = self.tree.allocate(Operator::If { scope_id: scope_id.clone(),
                                                        condition,
                                                        else_ifs: Vec::new(),
                                                        else_branch: None },
                                         line);
        self.parse_branch_body(if_node, scope_id)?;

        while self.peek_token() == Some(&Token::ElseIf) {
            let line = self.expect(&Token::ElseIf, "'elseif'")?;
            let condition = self.parse_expression()?;
            self.expect(&Token::Then, "'then'")?;

            let scope_id = self.block_scope_id("elseif");
            let branch = self.tree.allocate(Operator::ElseIf { scope_id: scope_id.clone(),
                                                               condition },
                                            line);
            self.attach_branch(if_node, branch, line)?;
            self.parse_branch_body(branch, scope_id)?;
        }

        if self.peek_token() == Some(&Token::Else) {
            let line = self.expect(&Token::Else, "'else'")?;
            let scope_id = self.block_scope_id("else");
            let branch = self.tree.allocate(Operator::Else { scope_id: scope_id.clone() }, line);
            self.attach_branch(if_node, branch, line)?;
            self.parse_block_into(branch, scope_id, &[Token::End])?;
        }

        self.expect_end(&Token::If, "if")?;
        Ok(if_node)
    }

    /// Parses the body of an `if` or `elseif` branch, which ends at the next
    /// `elseif`, `else` or `end`.
    fn parse_branch_body(&mut self, node: NodeId, scope_id: String) -> ParseResult<()> {
        self.parse_block_into(node, scope_id, &[Token::ElseIf, Token::Else, Token::End])
    }

    fn parse_block_into(&mut self,
                        node: NodeId,
                        scope_id: String,
                        terminators: &[Token])
                        -> ParseResult<()> {
        self.push_scope(node, scope_id);
        self.parse_block_body(terminators)?;
        self.pop_scope();
        Ok(())
    }

    fn attach_branch(&mut self, if_node: NodeId, branch: NodeId, line: usize) -> ParseResult<()> {
        self.tree
            .attach_branch(if_node, branch)
            .map_err(|source| ParseError::Tree { source, line })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{error::ParseError, interpreter::tree::node::Operator, parse_source};

    #[test]
    fn branches_get_their_own_scope_ids() {
        let source = "module M;
                      beginning
                        if true then
                          output 1;
                        elseif false then
                          output 2;
                        elseif false then
                          output 3;
                        else
                          output 4;
                        end if;
                      end M.";
        let program = parse_source(source).unwrap();
        let beginning = program.beginning().unwrap();
        let if_node = program.tree.children(beginning).next().unwrap();

        let Operator::If { scope_id, else_ifs, else_branch, .. } = program.tree.operator(if_node) else {
            panic!("expected if");
        };
        assert_eq!(scope_id, "M^beginning^if1");
        assert_eq!(else_ifs.len(), 2);

        let scope_ids: Vec<_> = else_ifs.iter()
                                        .chain(else_branch)
                                        .map(|branch| program.tree.operator(*branch).scope_id().unwrap())
                                        .collect();
        assert_eq!(scope_ids,
                   vec!["M^beginning^elseif2", "M^beginning^elseif3", "M^beginning^else4"]);
    }

    #[test]
    fn nested_blocks_extend_the_scope_chain() {
        let source = "module M;
                      beginning
                        while true repeat
                          if false then variable integer deep; end if;
                        end while;
                      end M.";
        let program = parse_source(source).unwrap();

        assert!(program.variables.contains("M^beginning^while1^if2^deep"));
    }

    #[test]
    fn closing_keyword_must_match() {
        let source = "module M; beginning while true repeat end if; end M.";

        assert_eq!(parse_source(source).unwrap_err(),
                   ParseError::MismatchedEnd { expected: "while".to_string(),
                                               found:    "if".to_string(),
                                               line:     1, });
    }
}
