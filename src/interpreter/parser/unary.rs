use crate::{
    ast::{Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        value::core::Value,
    },
    util::num::i64_to_i32_checked,
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses a unary expression.
    ///
    /// Supports prefix operators:
    /// - `-`  (numeric negation)
    /// - `not`  (logical not)
    ///
    /// Unary operators are right-associative, so `not -x` is parsed as
    /// `not (-x)`. A minus directly before an integer literal is folded into
    /// the literal, which makes `-2147483648` writable.
    ///
    /// Grammar:
    /// ```text
    ///     unary := ("-" | "not") unary
    ///            | primary
    /// ```
    pub(in crate::interpreter::parser) fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_token() {
            Some(Token::Minus) => UnaryOperator::Negate,
            Some(Token::Not) => UnaryOperator::Not,
            _ => return self.parse_primary(),
        };
        let (_, line) = self.advance()?;
        if let (UnaryOperator::Negate, Some(&Token::Integer(n))) = (op, self.peek_token()) {
            let (_, literal_line) = self.advance()?;
            let value = i64_to_i32_checked(-n, ParseError::LiteralTooLarge { line: *literal_line })?;
            return Ok(Expr::Literal { value: Value::Integer(value),
                                      line:  *line, });
        }
        let expr = self.parse_unary()?;
        Ok(Expr::UnaryOp { op,
                           expr: Box::new(expr),
                           line: *line })
    }

    /// Parses a primary (atomic) expression.
    ///
    /// Grammar:
    /// ```text
    ///     primary := literal
    ///              | IDENT "(" arguments ")"
    ///              | IDENT ("[" expression "]")*
    ///              | "(" expression ")"
    /// ```
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let (token, line) = self.advance()?;
        let line = *line;
        let value = match token {
            Token::Integer(n) => Value::Integer(i64_to_i32_checked(*n, ParseError::LiteralTooLarge { line })?),
            Token::Real(r) if r.is_finite() => Value::Real(*r),
            Token::Real(_) => return Err(ParseError::LiteralTooLarge { line }),
            Token::Bool(b) => Value::Boolean(*b),
            Token::Char(c) => Value::Char(*c),
            Token::Str(s) => Value::String(s.clone()),
            Token::Identifier(name) => return self.parse_identifier_or_call(name, line),
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                return Ok(expr);
            },
            other => {
                return Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                         line });
            },
        };
        Ok(Expr::Literal { value, line })
    }

    /// Parses what follows an identifier inside an expression: a call when a
    /// `(` comes next, otherwise a variable or array access.
    fn parse_identifier_or_call(&mut self, name: &str, line: usize) -> ParseResult<Expr> {
        if self.peek_token() == Some(&Token::LParen) {
            let arguments = self.parse_call_arguments(name, line)?;
            return Ok(Expr::FunctionCall { name: name.to_string(),
                                           arguments,
                                           line });
        }

        let id = self.resolve(name, line)?;
        let indices = self.parse_indices()?;
        if indices.is_empty() {
            Ok(Expr::Variable { id, line })
        } else {
            Ok(Expr::ArrayIndex { id, indices, line })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ParseError, parse_source};

    #[test]
    fn oversized_literals_are_rejected() {
        let source = "module M; beginning output 2147483648; end M.";
        assert_eq!(parse_source(source).unwrap_err(), ParseError::LiteralTooLarge { line: 1 });

        let source = "module M; beginning output 2147483647; end M.";
        assert!(parse_source(source).is_ok());

        let source = "module M; beginning output 1e400; end M.";
        assert_eq!(parse_source(source).unwrap_err(), ParseError::LiteralTooLarge { line: 1 });
    }

    #[test]
    fn minus_folds_into_integer_literals() {
        let source = "module M; beginning output -2147483648; end M.";
        assert!(parse_source(source).is_ok());

        let source = "module M; beginning output -2147483649; end M.";
        assert_eq!(parse_source(source).unwrap_err(), ParseError::LiteralTooLarge { line: 1 });
    }

    #[test]
    fn unclosed_group_reports_expected_token() {
        let source = "module M; beginning output (1 + 2; end M.";
        assert!(matches!(parse_source(source),
                         Err(ParseError::ExpectedToken { ref expected, .. }) if expected == "')'"));
    }
}
