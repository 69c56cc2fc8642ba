use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::qualify,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::scope::ScopeFrame,
        program::Program,
        symbols::{FunctionTable, VariableTable},
        tree::{core::Tree, node::Operator},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Single-pass recursive-descent parser that builds the program tree and
/// the symbol tables while it reads tokens.
///
/// Block-bearing constructs are tracked on an explicit scope stack. Every
/// statement is attached under the innermost open block as soon as it is
/// complete, and every identifier is resolved against that stack when it is
/// read.
pub struct Parser<'a, I>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    pub(in crate::interpreter::parser) tokens:        Peekable<I>,
    pub(in crate::interpreter::parser) tree:          Tree,
    pub(in crate::interpreter::parser) functions:     FunctionTable,
    pub(in crate::interpreter::parser) variables:     VariableTable,
    pub(in crate::interpreter::parser) scopes:        Vec<ScopeFrame>,
    pub(in crate::interpreter::parser) block_counter: usize,
    pub(in crate::interpreter::parser) last_line:     usize,
}

/// Parses a complete module.
///
/// Grammar:
/// ```text
///     program := "module" IDENT ";" item* "beginning" statement* "end" IDENT "." EOF
/// ```
///
/// # Parameters
/// - `tokens`: The `(Token, line)` pairs produced by the lexer.
///
/// # Returns
/// The finished [`Program`]: tree, function table and variable table.
///
/// # Errors
/// The first syntax, resolution, redeclaration or arity error aborts the
/// parse.
///
/// # Example
/// ```
/// use semtree::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("module M; variable integer x := 1; beginning output x; end M.").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.module_name(), "M");
/// assert!(program.variables.contains("M^x"));
/// ```
pub fn parse_program(tokens: &[(Token, usize)]) -> ParseResult<Program> {
    Parser::new(tokens.iter()).parse_module()
}

impl<'a, I> Parser<'a, I> where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    /// Creates a parser over a token stream.
    pub fn new(tokens: I) -> Self {
        Self { tokens:        tokens.peekable(),
               tree:          Tree::new(),
               functions:     FunctionTable::new(),
               variables:     VariableTable::new(),
               scopes:        Vec::new(),
               block_counter: 0,
               last_line:     1, }
    }

    /// Parses the module header, the module-level items, the entry block and
    /// the closing `end <name>.`, then hands out the finished program.
    fn parse_module(mut self) -> ParseResult<Program> {
        let line = self.expect(&Token::Module, "'module'")?;
        let name = self.expect_identifier()?;
        self.expect(&Token::Semicolon, "';'")?;

        let root = self.tree.allocate(Operator::Module { name:      name.clone(),
                                                         scope_id:  name.clone(),
                                                         beginning: None, },
                                      line);
        self.tree
            .insert_root(root)
            .map_err(|source| ParseError::Tree { source, line })?;
        self.push_scope(root, name.clone());
        debug!(module = %name, "opened module");

        loop {
            match self.peek_token() {
                Some(Token::Variable) => {
                    let variable = self.parse_variable_declaration()?;
                    self.attach(variable);
                },
                Some(Token::Function | Token::Procedure) => self.parse_callable()?,
                Some(Token::Beginning) => break,
                Some(token) => {
                    return Err(ParseError::ExpectedToken { expected: "'variable', 'function', 'procedure' or 'beginning'".to_string(),
                                                           found:    token.to_string(),
                                                           line:     self.peek_line(), });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line: self.last_line }),
            }
        }

        let line = self.expect(&Token::Beginning, "'beginning'")?;
        let scope_id = qualify(&name, "beginning");
        let beginning = self.tree.allocate(Operator::Beginning { scope_id: scope_id.clone() }, line);
        self.tree
            .set_beginning(beginning)
            .map_err(|source| ParseError::Tree { source, line })?;

        self.push_scope(beginning, scope_id);
        self.parse_block_body(&[Token::End])?;
        self.pop_scope();

        let line = self.expect(&Token::End, "'end'")?;
        let closing = self.expect_identifier()?;
        if closing != name {
            return Err(ParseError::MismatchedEnd { expected: name,
                                                   found: closing,
                                                   line });
        }
        self.expect(&Token::Dot, "'.'")?;
        self.pop_scope();

        if let Some((token, line)) = self.tokens.next() {
            return Err(ParseError::UnexpectedTrailingTokens { token: token.to_string(),
                                                              line:  *line, });
        }

        debug!(module = %name,
               nodes = self.tree.len(),
               functions = self.functions.len(),
               variables = self.variables.len(),
               "parsed module");

        Ok(Program { tree: self.tree,
                     functions: self.functions,
                     variables: self.variables,
                     root })
    }

    /// Returns the next token without consuming it.
    pub(in crate::interpreter::parser) fn peek_token(&mut self) -> Option<&'a Token> {
        self.tokens.peek().copied().map(|(token, _)| token)
    }

    /// Returns the line of the next token, or of the last consumed one at the
    /// end of input.
    pub(in crate::interpreter::parser) fn peek_line(&mut self) -> usize {
        self.tokens.peek().map_or(self.last_line, |(_, line)| *line)
    }

    /// Consumes the next token.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> ParseResult<&'a (Token, usize)> {
        let pair = self.tokens
                       .next()
                       .ok_or(ParseError::UnexpectedEndOfInput { line: self.last_line })?;
        self.last_line = pair.1;
        Ok(pair)
    }

    /// Consumes the next token if it equals `expected`.
    ///
    /// # Returns
    /// The token's line.
    ///
    /// # Errors
    /// `ExpectedToken` naming `description`, or `UnexpectedEndOfInput`.
    pub(in crate::interpreter::parser) fn expect(&mut self,
                                                 expected: &Token,
                                                 description: &str)
                                                 -> ParseResult<usize> {
        let (token, line) = self.advance()?;
        if token == expected {
            Ok(*line)
        } else {
            Err(ParseError::ExpectedToken { expected: description.to_string(),
                                            found:    token.to_string(),
                                            line:     *line, })
        }
    }

    /// Consumes the next token if it is `expected`, reporting `false` and
    /// leaving the stream untouched otherwise.
    pub(in crate::interpreter::parser) fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_token() == Some(expected) {
            if let Some((_, line)) = self.tokens.next() {
                self.last_line = *line;
            }
            true
        } else {
            false
        }
    }

    /// Consumes an identifier and returns its text.
    pub(in crate::interpreter::parser) fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.advance()? {
            (Token::Identifier(name), _) => Ok(name.clone()),
            (token, line) => Err(ParseError::ExpectedToken { expected: "identifier".to_string(),
                                                             found:    token.to_string(),
                                                             line:     *line, }),
        }
    }

    /// Consumes `end <keyword> ;` closing a `while` or `if`.
    ///
    /// # Errors
    /// `MismatchedEnd` if `end` is followed by anything but `keyword`.
    pub(in crate::interpreter::parser) fn expect_end(&mut self,
                                                     keyword: &Token,
                                                     name: &str)
                                                     -> ParseResult<()> {
        self.expect(&Token::End, "'end'")?;
        let (token, line) = self.advance()?;
        if token != keyword {
            let found = match token {
                Token::Identifier(text) => text.clone(),
                other => other.to_string().trim_matches('\'').to_string(),
            };
            return Err(ParseError::MismatchedEnd { expected: name.to_string(),
                                                   found,
                                                   line: *line });
        }
        self.expect(&Token::Semicolon, "';'")?;
        Ok(())
    }
}
