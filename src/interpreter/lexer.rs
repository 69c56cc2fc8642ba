use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Real literal tokens, such as `3.14`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Real(f64),
    /// Integer literal tokens, such as `42`. Narrowed to 32 bits by the parser.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// Character literal tokens, such as `'a'`.
    #[regex(r"'([^'\\\n]|\\.)'", parse_char)]
    Char(char),
    /// String literal tokens, such as `"hello"`.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// `module`
    #[token("module")]
    Module,
    /// `beginning`
    #[token("beginning")]
    Beginning,
    /// `end`
    #[token("end")]
    End,
    /// `variable`
    #[token("variable")]
    Variable,
    /// `let`
    #[token("let")]
    Let,
    /// `function`
    #[token("function")]
    Function,
    /// `procedure`
    #[token("procedure")]
    Procedure,
    /// `public`
    #[token("public")]
    Public,
    /// `private`
    #[token("private")]
    Private,
    /// `in`
    #[token("in")]
    In,
    /// `var`
    #[token("var")]
    Var,
    /// `integer`
    #[token("integer")]
    IntegerType,
    /// `real`
    #[token("real")]
    RealType,
    /// `boolean`
    #[token("boolean")]
    BooleanType,
    /// `char`
    #[token("char")]
    CharType,
    /// `string`
    #[token("string")]
    StringType,
    /// `array`
    #[token("array")]
    Array,
    /// `of`
    #[token("of")]
    Of,
    /// `if`
    #[token("if")]
    If,
    /// `then`
    #[token("then")]
    Then,
    /// `elseif`
    #[token("elseif")]
    ElseIf,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `repeat`
    #[token("repeat")]
    Repeat,
    /// `call`
    #[token("call")]
    Call,
    /// `input`
    #[token("input")]
    Input,
    /// `output`
    #[token("output")]
    Output,
    /// `return`
    #[token("return")]
    Return,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable, parameter, callable or module names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `:=`
    #[token(":=")]
    Assign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `=`
    #[token("=")]
    Equals,
    /// `<>`
    #[token("<>")]
    NotEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(r) => write!(f, "{r}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Identifier(name) => write!(f, "'{name}'"),
            other => write!(f, "'{}'", other.symbol()),
        }
    }
}

impl Token {
    /// Returns the source spelling of keyword and punctuation tokens.
    const fn symbol(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Beginning => "beginning",
            Self::End => "end",
            Self::Variable => "variable",
            Self::Let => "let",
            Self::Function => "function",
            Self::Procedure => "procedure",
            Self::Public => "public",
            Self::Private => "private",
            Self::In => "in",
            Self::Var => "var",
            Self::IntegerType => "integer",
            Self::RealType => "real",
            Self::BooleanType => "boolean",
            Self::CharType => "char",
            Self::StringType => "string",
            Self::Array => "array",
            Self::Of => "of",
            Self::If => "if",
            Self::Then => "then",
            Self::ElseIf => "elseif",
            Self::Else => "else",
            Self::While => "while",
            Self::Repeat => "repeat",
            Self::Call => "call",
            Self::Input => "input",
            Self::Output => "output",
            Self::Return => "return",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Assign => ":=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Equals => "=",
            Self::NotEqual => "<>",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Real(_)
            | Self::Integer(_)
            | Self::Bool(_)
            | Self::Char(_)
            | Self::Str(_)
            | Self::Identifier(_) => "literal",
            Self::Comment | Self::NewLine | Self::Ignored => "",
        }
    }
}

/// Splits source text into `(Token, line)` pairs.
///
/// Lexing stops at the first slice that matches no token.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` with the offending slice and line.
///
/// # Example
/// ```
/// use semtree::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x := 1;\noutput x;").unwrap();
///
/// assert_eq!(tokens[0], (Token::Let, 1));
/// assert_eq!(tokens[2], (Token::Assign, 1));
/// assert_eq!(tokens[5], (Token::Output, 2));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push((tok, lexer.extras.line));
        } else {
            return Err(ParseError::UnexpectedToken { token: lexer.slice().to_string(),
                                                     line:  lexer.extras.line, });
        }
    }

    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parses a character literal, resolving a single escape.
fn parse_char(lex: &logos::Lexer<Token>) -> Option<char> {
    let slice = lex.slice();
    let mut chars = unescape(&slice[1..slice.len() - 1])?.into_iter();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Parses a string literal, resolving escapes.
fn parse_string(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1]).map(|chars| chars.into_iter().collect())
}

/// Resolves `\n`, `\t`, `\\`, `\'` and `\"`. Unknown escapes are rejected.
fn unescape(body: &str) -> Option<Vec<char>> {
    let mut chars = Vec::with_capacity(body.len());
    let mut iter = body.chars();
    while let Some(c) = iter.next() {
        if c == '\\' {
            chars.push(match iter.next()? {
                           'n' => '\n',
                           't' => '\t',
                           '\\' => '\\',
                           '\'' => '\'',
                           '"' => '"',
                           _ => return None,
                       });
        } else {
            chars.push(c);
        }
    }
    Some(chars)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keywords_win_over_identifiers() {
        let tokens = tokenize("elseif else endx end").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(token, _)| token).collect();

        assert_eq!(kinds,
                   vec![Token::ElseIf,
                        Token::Else,
                        Token::Identifier("endx".to_string()),
                        Token::End]);
    }

    #[test]
    fn literals_and_escapes() {
        let tokens = tokenize(r#"'a' '\n' "say \"hi\"" 2.5 1e3 7"#).unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(token, _)| token).collect();

        assert_eq!(kinds,
                   vec![Token::Char('a'),
                        Token::Char('\n'),
                        Token::Str("say \"hi\"".to_string()),
                        Token::Real(2.5),
                        Token::Real(1000.0),
                        Token::Integer(7)]);
    }

    #[test]
    fn comments_and_lines() {
        let tokens = tokenize("// header\nx // trailing\n\ny").unwrap();

        assert_eq!(tokens,
                   vec![(Token::Identifier("x".to_string()), 2),
                        (Token::Identifier("y".to_string()), 4)]);
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = tokenize("x := 1 # 2").unwrap_err();
        assert_eq!(err,
                   ParseError::UnexpectedToken { token: "#".to_string(),
                                                 line:  1, });
    }
}
