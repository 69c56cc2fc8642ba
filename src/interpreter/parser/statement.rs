use crate::{
    ast::{CallableKind, Initializer, VariableDeclaration, VariableType, qualify},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, Parser},
            utils::array_size,
        },
        symbols::Variable,
        tree::node::{NodeId, Operator},
        value::{array::ArrayValue, core::Value},
    },
};

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Parses statements into the innermost open block until one of
    /// `terminators` is next. The terminator is not consumed.
    pub(in crate::interpreter::parser) fn parse_block_body(&mut self, terminators: &[Token]) -> ParseResult<()> {
        loop {
            match self.peek_token() {
                Some(token) if terminators.contains(token) => return Ok(()),
                Some(Token::Function | Token::Procedure) => self.parse_callable()?,
                Some(_) => {
                    let statement = self.parse_statement()?;
                    self.attach(statement);
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line: self.last_line }),
            }
        }
    }

    /// Parses a single statement and returns its (not yet linked) node.
    ///
    /// Grammar:
    /// ```text
    ///     statement := variable | let | if | while | call | input | output | return
    /// ```
    fn parse_statement(&mut self) -> ParseResult<NodeId> {
        match self.peek_token() {
            Some(Token::Variable) => self.parse_variable_declaration(),
            Some(Token::Let) => self.parse_let(),
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::Call) => self.parse_call_statement(),
            Some(Token::Input) => self.parse_input(),
            Some(Token::Output) => self.parse_output(),
            Some(Token::Return) => self.parse_return(),
            Some(token) => Err(ParseError::UnexpectedToken { token: token.to_string(),
                                                             line:  self.peek_line(), }),
            None => Err(ParseError::UnexpectedEndOfInput { line: self.last_line }),
        }
    }

    /// Parses a variable declaration and registers it in the variable table.
    ///
    /// Grammar:
    /// ```text
    ///     variable := "variable" type IDENT [":=" expression] ";"
    ///               | "variable" "array" ("[" size "]")+ "of" type IDENT ";"
    /// ```
    /// The id is the innermost block's scope id joined with the name. Scalars
    /// without an initializer start at their type's default; arrays start as
    /// a template of defaults.
    ///
    /// # Errors
    /// - `InvalidArraySize` for a size that is not a positive constant.
    /// - `VariableAlreadyDeclared` if the block already declares the name.
    pub(in crate::interpreter::parser) fn parse_variable_declaration(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Variable, "'variable'")?;

        let (declared_type, name, initializer) = if self.eat(&Token::Array) {
            let mut dimensions = Vec::new();
            while self.eat(&Token::LBracket) {
                dimensions.push(array_size(&self.parse_expression()?)?);
                self.expect(&Token::RBracket, "']'")?;
            }
            if dimensions.is_empty() {
                return Err(ParseError::ExpectedToken { expected: "'['".to_string(),
                                                       found:    self.peek_token()
                                                                     .map_or_else(String::new, ToString::to_string),
                                                       line, });
            }
            self.expect(&Token::Of, "'of'")?;
            let element = self.parse_scalar_type()?;
            let name = self.expect_identifier()?;
            let template = Value::Array(ArrayValue::template(element, &dimensions));
            (VariableType::Array { element, dimensions }, name, Initializer::Template(template))
        } else {
            let scalar = self.parse_scalar_type()?;
            let name = self.expect_identifier()?;
            let initializer = if self.eat(&Token::Assign) {
                Initializer::Expression(self.parse_expression()?)
            } else {
                Initializer::Template(Value::default_for(scalar))
            };
            (VariableType::Scalar(scalar), name, initializer)
        };
        self.expect(&Token::Semicolon, "';'")?;

        let id = qualify(self.current_scope_id(), &name);
        if self.variables.contains(&id) {
            return Err(ParseError::VariableAlreadyDeclared { name, line });
        }

        let value = match (&initializer, &declared_type) {
            (Initializer::Template(value), _) => value.clone(),
            (Initializer::Expression(_), VariableType::Scalar(scalar)) => Value::default_for(*scalar),
            (Initializer::Expression(_), VariableType::Array { element, dimensions }) => {
                Value::Array(ArrayValue::template(*element, dimensions))
            },
        };
        self.variables.declare(Variable { declared_type: declared_type.clone(),
                                          name:          name.clone(),
                                          id:            id.clone(),
                                          value, });

        let declaration = VariableDeclaration { declared_type,
                                                name,
                                                id,
                                                initializer };
        Ok(self.tree.allocate(Operator::Variable(declaration), line))
    }

    /// Parses `let IDENT ("[" expression "]")* ":=" expression ";"`.
    fn parse_let(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Let, "'let'")?;
        let name = self.expect_identifier()?;
        let target = self.resolve_writable(&name, line)?;
        let indices = self.parse_indices()?;
        self.expect(&Token::Assign, "':='")?;
        let value = self.parse_expression()?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(self.tree.allocate(Operator::Let { target,
                                              indices,
                                              value },
                              line))
    }

    /// Parses `input IDENT ("[" expression "]")* ";"`.
    fn parse_input(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Input, "'input'")?;
        let name = self.expect_identifier()?;
        let target = self.resolve_writable(&name, line)?;
        let indices = self.parse_indices()?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(self.tree.allocate(Operator::Input { target, indices }, line))
    }

    /// Parses `output expression ";"`.
    fn parse_output(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Output, "'output'")?;
        let value = self.parse_expression()?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(self.tree.allocate(Operator::Output { value }, line))
    }

    /// Parses `return [expression] ";"`.
    ///
    /// # Errors
    /// - `ReturnOutsideCallable` outside any function or procedure.
    /// - `MissingReturnValue` for a bare `return` in a function.
    /// - `UnexpectedReturnValue` for `return <value>` in a procedure.
    fn parse_return(&mut self) -> ParseResult<NodeId> {
        let line = self.expect(&Token::Return, "'return'")?;
        let (kind, name) = self.enclosing_callable()
                               .map(|declaration| (declaration.kind, declaration.name.clone()))
                               .ok_or(ParseError::ReturnOutsideCallable { line })?;

        let has_value = self.peek_token() != Some(&Token::Semicolon);
        let value = match (kind, has_value) {
            (CallableKind::Function(_), true) => Some(self.parse_expression()?),
            (CallableKind::Function(_), false) => return Err(ParseError::MissingReturnValue { name, line }),
            (CallableKind::Procedure, false) => None,
            (CallableKind::Procedure, true) => return Err(ParseError::UnexpectedReturnValue { name, line }),
        };
        self.expect(&Token::Semicolon, "';'")?;
        Ok(self.tree.allocate(Operator::Return { value }, line))
    }
}
