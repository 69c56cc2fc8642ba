use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, Parser},
            utils::token_to_binary_operator,
        },
    },
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// lowest-precedence level, logical OR, and recursively descends through
    /// the precedence hierarchy.
    ///
    /// Grammar: `expression := logical_or`
    pub(in crate::interpreter::parser) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_logical_or()
    }

    /// Parses logical OR expressions.
    ///
    /// The rule is: `logical_or := logical_and ("or" logical_and)*`
    fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_logical_and, &[BinaryOperator::Or])
    }

    /// Parses logical AND expressions.
    ///
    /// The rule is: `logical_and := equality ("and" equality)*`
    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_equality, &[BinaryOperator::And])
    }

    /// Parses `=` and `<>`.
    ///
    /// The rule is: `equality := relational (("=" | "<>") relational)*`
    fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_relational,
                                    &[BinaryOperator::Equal, BinaryOperator::NotEqual])
    }

    /// Parses `<`, `<=`, `>` and `>=`.
    ///
    /// The rule is: `relational := additive (("<" | "<=" | ">" | ">=")
    /// additive)*`
    fn parse_relational(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_additive,
                                    &[BinaryOperator::Less,
                                      BinaryOperator::LessEqual,
                                      BinaryOperator::Greater,
                                      BinaryOperator::GreaterEqual])
    }

    /// Parses addition and subtraction expressions.
    ///
    /// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_multiplicative,
                                    &[BinaryOperator::Add, BinaryOperator::Sub])
    }

    /// Parses multiplication and division.
    ///
    /// The rule is: `multiplicative := unary (("*" | "/") unary)*`
    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        self.parse_left_associative(Self::parse_unary, &[BinaryOperator::Mul, BinaryOperator::Div])
    }

    /// Folds `operand (op operand)*` to the left for the given operators.
    ///
    /// # Parameters
    /// - `operand`: Parser for the next-higher precedence level.
    /// - `operators`: The operators accepted at this level.
    ///
    /// # Returns
    /// An `Expr::BinaryOp` tree, or the single operand if no operator
    /// follows.
    fn parse_left_associative(&mut self,
                              operand: fn(&mut Self) -> ParseResult<Expr>,
                              operators: &[BinaryOperator])
                              -> ParseResult<Expr> {
        let mut left = operand(self)?;
        loop {
            if let Some((token, line)) = self.tokens.peek().copied()
               && let Some(op) = token_to_binary_operator(token)
               && operators.contains(&op)
            {
                self.advance()?;
                let right = operand(self)?;
                left = Expr::BinaryOp { left: Box::new(left),
                                        op,
                                        right: Box::new(right),
                                        line: *line };
                continue;
            }
            break;
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parse_source;

    fn rendered(expression: &str) -> String {
        let source = format!("module M; variable integer a; variable integer b; variable integer c;
                              beginning output {expression}; end M.");
        let program = parse_source(&source).unwrap();
        let beginning = program.beginning().unwrap();
        let output = program.tree.children(beginning).next().unwrap();
        program.tree.operator(output).to_string()
    }

    #[test]
    fn precedence_climbs_from_or_to_unary() {
        assert_eq!(rendered("a + b * c"), "output (a + (b * c))");
        assert_eq!(rendered("a - b - c"), "output ((a - b) - c)");
        assert_eq!(rendered("a < b = b < c"), "output ((a < b) = (b < c))");
        assert_eq!(rendered("a = 1 or b = 2 and c = 3"),
                   "output ((a = 1) or ((b = 2) and (c = 3)))");
        assert_eq!(rendered("not a = b"), "output (not a = b)");
        assert_eq!(rendered("not (a = b)"), "output not (a = b)");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(rendered("(a + b) * c"), "output ((a + b) * c)");
        assert_eq!(rendered("-(a / b)"), "output -(a / b)");
    }
}
