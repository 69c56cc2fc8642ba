use crate::{
    ast::{BinaryOperator, Expr, ScalarType, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        value::core::Value,
    },
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses a comma-separated list of items until a closing token.
    ///
    /// Shared by parameter lists and call arguments. `parse_item` receives the
    /// zero-based position of the item it parses. An immediately encountered
    /// closing token produces an empty list.
    ///
    /// Grammar (simplified): `list := item ("," item)*`
    ///
    /// # Parameters
    /// - `parse_item`: Parses one element.
    /// - `closing`: The token that terminates the list.
    ///
    /// # Errors
    /// Returns a `ParseError` if an item fails to parse, if a token other
    /// than `,` or `closing` follows an item, or if the stream ends early.
    pub(in crate::interpreter::parser) fn parse_comma_separated<T>(
        &mut self,
        mut parse_item: impl FnMut(&mut Self, usize) -> ParseResult<T>,
        closing: &Token)
        -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        if self.eat(closing) {
            return Ok(items);
        }
        loop {
            items.push(parse_item(self, items.len())?);
            let (token, line) = self.advance()?;
            if token == closing {
                break;
            }
            if token != &Token::Comma {
                return Err(ParseError::ExpectedToken { expected: format!("',' or {closing}"),
                                                       found:    token.to_string(),
                                                       line:     *line, });
            }
        }
        Ok(items)
    }

    /// Parses one of the scalar type keywords.
    pub(in crate::interpreter::parser) fn parse_scalar_type(&mut self) -> ParseResult<ScalarType> {
        match self.advance()? {
            (Token::IntegerType, _) => Ok(ScalarType::Integer),
            (Token::RealType, _) => Ok(ScalarType::Real),
            (Token::BooleanType, _) => Ok(ScalarType::Boolean),
            (Token::CharType, _) => Ok(ScalarType::Char),
            (Token::StringType, _) => Ok(ScalarType::String),
            (token, line) => Err(ParseError::ExpectedToken { expected: "a type".to_string(),
                                                             found:    token.to_string(),
                                                             line:     *line, }),
        }
    }

    /// Parses `"[" expr "]"` repeated, as long as a `[` follows.
    pub(in crate::interpreter::parser) fn parse_indices(&mut self) -> ParseResult<Vec<Expr>> {
        let mut indices = Vec::new();
        while self.eat(&Token::LBracket) {
            indices.push(self.parse_expression()?);
            self.expect(&Token::RBracket, "']'")?;
        }
        Ok(indices)
    }
}

/// Evaluates an array dimension at parse time.
///
/// Only literals combined with `+`, `-`, `*`, `/` and unary minus are
/// allowed; the result must be an integer of at least 1.
///
/// # Errors
/// `InvalidArraySize` for identifiers, calls, non-integer operands, overflow,
/// division by zero and sizes below 1.
pub(in crate::interpreter::parser) fn array_size(expr: &Expr) -> ParseResult<usize> {
    let line = expr.line_number();
    let size = constant_integer(expr)?;
    if size < 1 {
        return Err(ParseError::InvalidArraySize { details: format!("{size} is not a positive size"),
                                                  line });
    }
    usize::try_from(size).map_err(|_| ParseError::InvalidArraySize { details: format!("{size} is too large"),
                                                                     line })
}

fn constant_integer(expr: &Expr) -> ParseResult<i64> {
    let invalid = |details: String| ParseError::InvalidArraySize { details,
                                                                   line: expr.line_number() };
    match expr {
        Expr::Literal { value: Value::Integer(n), .. } => Ok(i64::from(*n)),
        Expr::Literal { value, .. } => Err(invalid(format!("{} '{value}' is not an integer", value.type_name()))),
        Expr::UnaryOp { op: UnaryOperator::Negate, expr: operand, .. } => {
            constant_integer(operand)?.checked_neg()
                                      .ok_or_else(|| invalid("overflow".to_string()))
        },
        Expr::BinaryOp { left, op, right, .. } => {
            let (left, right) = (constant_integer(left)?, constant_integer(right)?);
            let result = match op {
                BinaryOperator::Add => left.checked_add(right),
                BinaryOperator::Sub => left.checked_sub(right),
                BinaryOperator::Mul => left.checked_mul(right),
                BinaryOperator::Div if right == 0 => return Err(invalid("division by zero".to_string())),
                BinaryOperator::Div => left.checked_div(right),
                other => return Err(invalid(format!("operator '{other}' is not allowed"))),
            };
            result.ok_or_else(|| invalid("overflow".to_string()))
        },
        _ => Err(invalid(format!("'{expr}' is not a constant"))),
    }
}

/// Maps a token to its binary operator, if any.
pub(in crate::interpreter::parser) const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::Equals => Some(BinaryOperator::Equal),
        Token::NotEqual => Some(BinaryOperator::NotEqual),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{error::ParseError, parse_source};

    fn declare(size: &str) -> Result<(), ParseError> {
        let source = format!("module M; variable array[{size}] of integer a; beginning end M.");
        parse_source(&source).map(|_| ())
    }

    #[test]
    fn constant_sizes_are_folded() {
        assert_eq!(declare("2 * 3 - 1"), Ok(()));
        assert_eq!(declare("(7 / 2)"), Ok(()));
    }

    #[test]
    fn bad_sizes_are_rejected() {
        for size in ["0", "-4", "2.5", "1 / 0", "true", "'c'"] {
            assert!(matches!(declare(size), Err(ParseError::InvalidArraySize { .. })),
                    "size {size} should be rejected");
        }
    }

    #[test]
    fn identifiers_are_not_constants() {
        let source = "module M;
                      variable integer n := 3;
                      variable array[n] of integer a;
                      beginning end M.";

        assert!(matches!(parse_source(source), Err(ParseError::InvalidArraySize { line: 3, .. })));
    }
}
