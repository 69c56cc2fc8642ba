use tracing::debug;

use crate::{
    ast::{Argument, CallableDeclaration, CallableKind, Parameter, PassMode, Visibility, qualify},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        symbols::FunctionEntry,
        tree::node::{NodeId, Operator},
    },
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses a function or procedure declaration and registers it.
    ///
    /// Grammar:
    /// ```text
    ///     callable := ("function" | "procedure") ("public" | "private") IDENT
    ///                 "(" [param ("," param)*] ")" [":" type]
    ///                 statement* "end" IDENT ";"
    /// ```
    /// Functions require the `: type` return clause; procedures must not
    /// have one. The body is collected while the node is detached; the node
    /// is linked under the module once `end <name>;` is read.
    ///
    /// # Errors
    /// - `NestedCallable` outside module level.
    /// - `DuplicateParameter` for a repeated parameter name.
    /// - `MismatchedEnd` if the closing name differs.
    /// - `FunctionAlreadyDefined` if the name is taken.
    pub(in crate::interpreter::parser) fn parse_callable(&mut self) -> ParseResult<()> {
        let (keyword, line) = self.advance()?;
        let line = *line;
        let visibility = match self.advance()? {
            (Token::Public, _) => Visibility::Public,
            (Token::Private, _) => Visibility::Private,
            (token, line) => {
                return Err(ParseError::ExpectedToken { expected: "'public' or 'private'".to_string(),
                                                       found:    token.to_string(),
                                                       line:     *line, });
            },
        };
        let name = self.expect_identifier()?;
        if self.scopes.len() != 1 {
            return Err(ParseError::NestedCallable { name, line });
        }

        self.expect(&Token::LParen, "'('")?;
        let parameters = self.parse_comma_separated(|parser, _| parser.parse_parameter(), &Token::RParen)?;
        for (i, parameter) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|earlier| earlier.name == parameter.name) {
                return Err(ParseError::DuplicateParameter { name: parameter.name.clone(),
                                                            line });
            }
        }

        let kind = if keyword == &Token::Function {
            self.expect(&Token::Colon, "':'")?;
            CallableKind::Function(self.parse_scalar_type()?)
        } else {
            CallableKind::Procedure
        };

        let declaration = CallableDeclaration { kind,
                                                visibility,
                                                scope_id: qualify(self.current_scope_id(), &name),
                                                name: name.clone(),
                                                parameters };
        let node = self.tree
                       .allocate(Operator::Callable(declaration.clone()), line);

        self.push_scope(node, declaration.scope_id.clone());
        self.parse_block_body(&[Token::End])?;
        self.pop_scope();

        let end_line = self.expect(&Token::End, "'end'")?;
        let closing = self.expect_identifier()?;
        if closing != name {
            return Err(ParseError::MismatchedEnd { expected: name,
                                                   found: closing,
                                                   line: end_line });
        }
        self.expect(&Token::Semicolon, "';'")?;

        self.functions.define(FunctionEntry { node, declaration }, line)?;
        self.attach(node);
        debug!(callable = %name, line, "registered callable");
        Ok(())
    }

    /// Parses `("in" | "var") type IDENT`.
    fn parse_parameter(&mut self) -> ParseResult<Parameter> {
        let pass_mode = match self.advance()? {
            (Token::In, _) => PassMode::In,
            (Token::Var, _) => PassMode::Var,
            (token, line) => {
                return Err(ParseError::ExpectedToken { expected: "'in' or 'var'".to_string(),
                                                       found:    token.to_string(),
                                                       line:     *line, });
            },
        };
        let declared_type = self.parse_scalar_type()?;
        let name = self.expect_identifier()?;
        Ok(Parameter { name,
                       declared_type,
                       pass_mode })
    }

    /// Parses `call IDENT "(" arguments ")" ";"`.
    pub(in crate::interpreter::parser) fn parse_call_statement(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Call, "'call'")?;
        let name = self.expect_identifier()?;
        let arguments = self.parse_call_arguments(&name, line)?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(self.tree.allocate(Operator::Call { name, arguments }, line))
    }

    /// Parses a parenthesized argument list and binds it to the callee's
    /// parameters.
    ///
    /// Every argument is parsed and resolved before the count is checked. An
    /// argument in a `var` position must be a bare identifier naming a
    /// writable variable or parameter.
    ///
    /// # Errors
    /// - `UnknownFunction` if no such callable is visible.
    /// - `ExpectedVariableArgument` for a non-variable in a `var` position.
    /// - `ReadOnlyParameter` when an `in` parameter is passed as `var`.
    /// - `ArgumentCountMismatch`, listing every trailing parameter left
    ///   unbound.
    pub(in crate::interpreter::parser) fn parse_call_arguments(&mut self,
                                                               name: &str,
                                                               line: usize)
                                                               -> ParseResult<Vec<Argument>> {
        let declaration = self.lookup_callable(name, line)?;
        self.expect(&Token::LParen, "'('")?;
        let arguments = self.parse_comma_separated(|parser, position| {
                                                       match declaration.parameters.get(position) {
                                                           Some(parameter) if parameter.pass_mode == PassMode::Var => {
                                                               parser.parse_var_argument(&declaration.name,
                                                                                         &parameter.name)
                                                           },
                                                           _ => parser.parse_expression().map(Argument::In),
                                                       }
                                                   },
                                                   &Token::RParen)?;

        let expected = declaration.parameters.len();
        if arguments.len() != expected {
            let missing = declaration.parameters
                                     .iter()
                                     .skip(arguments.len())
                                     .map(|parameter| parameter.name.clone())
                                     .collect();
            return Err(ParseError::ArgumentCountMismatch { name: name.to_string(),
                                                           expected,
                                                           found: arguments.len(),
                                                           missing,
                                                           line });
        }
        Ok(arguments)
    }

    /// Parses the argument for a `var` parameter: an identifier directly
    /// followed by `,` or `)`.
    fn parse_var_argument(&mut self, callable: &str, parameter: &str) -> ParseResult<Argument> {
        let line = self.peek_line();
        let mut lookahead = self.tokens.clone();
        let is_bare_identifier = matches!(lookahead.next(), Some((Token::Identifier(_), _)))
                                 && matches!(lookahead.peek(), Some((Token::Comma | Token::RParen, _)));
        if !is_bare_identifier {
            return Err(ParseError::ExpectedVariableArgument { name: callable.to_string(),
                                                              parameter: parameter.to_string(),
                                                              line });
        }

        let name = self.expect_identifier()?;
        let id = self.resolve(&name, line)?;
        if self.is_read_only(&id) {
            return Err(ParseError::ReadOnlyParameter { name, line });
        }
        Ok(Argument::Var { id, line })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{error::ParseError, parse_source};

    #[test]
    fn arity_error_names_every_missing_parameter() {
        let source = "module M;
                      function public clamp(in integer value, in integer low, in integer high) : integer
                        return value;
                      end clamp;
                      beginning output clamp(1); end M.";

        assert_eq!(parse_source(source).unwrap_err(),
                   ParseError::ArgumentCountMismatch { name:     "clamp".to_string(),
                                                       expected: 3,
                                                       found:    1,
                                                       missing:  vec!["low".to_string(), "high".to_string()],
                                                       line:     5, });
    }

    #[test]
    fn too_many_arguments_is_reported() {
        let source = "module M;
                      procedure public p()
                      end p;
                      beginning call p(1, 2); end M.";
        let err = parse_source(source).unwrap_err();

        assert_eq!(err.to_string(),
                   "Error on line 4: 'p' expects 0 argument(s), but 2 were given.");
    }

    #[test]
    fn arguments_are_resolved_before_arity_is_checked() {
        let source = "module M;
                      procedure public p(in integer a)
                      end p;
                      beginning call p(1, nothing); end M.";

        assert!(matches!(parse_source(source), Err(ParseError::UnknownIdentifier { .. })));
    }

    #[test]
    fn duplicate_callables_fail_at_parse_time() {
        let source = "module M;
                      procedure public p() end p;
                      procedure private p() end p;
                      beginning end M.";

        assert_eq!(parse_source(source).unwrap_err(),
                   ParseError::FunctionAlreadyDefined { name: "p".to_string(),
                                                        line: 3, });
    }

    #[test]
    fn var_arguments_must_be_plain_variables() {
        let source = "module M;
                      variable integer x;
                      procedure public bump(var integer n) let n := n + 1; end bump;
                      beginning call bump(x + 1); end M.";

        assert!(matches!(parse_source(source),
                         Err(ParseError::ExpectedVariableArgument { .. })));
    }

    #[test]
    fn callables_cannot_nest() {
        let source = "module M;
                      procedure public outer()
                        procedure public inner() end inner;
                      end outer;
                      beginning end M.";

        assert!(matches!(parse_source(source), Err(ParseError::NestedCallable { .. })));
    }

    #[test]
    fn direct_recursion_is_visible_while_parsing_the_body() {
        let source = "module M;
                      function public fact(in integer n) : integer
                        if n <= 1 then return 1; end if;
                        return n * fact(n - 1);
                      end fact;
                      beginning output fact(5); end M.";

        assert!(parse_source(source).is_ok());
    }
}
