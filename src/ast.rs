use std::fmt;

use crate::interpreter::value::core::Value;

/// Separator between the segments of a scope-qualified id.
pub const SCOPE_SEPARATOR: char = '^';

/// Returns the bare name at the end of a scope-qualified id.
///
/// Parameter ids are already bare, so they are returned unchanged.
///
/// ## Example
/// ```
/// use semtree::ast::bare_name;
///
/// assert_eq!(bare_name("Main^beginning^x"), "x");
/// assert_eq!(bare_name("a"), "a");
/// ```
#[must_use]
pub fn bare_name(id: &str) -> &str {
    id.rsplit(SCOPE_SEPARATOR).next().unwrap_or(id)
}

/// Joins a scope id and a name into a scope-qualified id.
#[must_use]
pub fn qualify(scope_id: &str, name: &str) -> String {
    format!("{scope_id}{SCOPE_SEPARATOR}{name}")
}

/// The scalar types a variable, parameter or array element can be declared
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 32-bit signed integers.
    Integer,
    /// Double precision reals. Accepts integers by widening.
    Real,
    /// `true` or `false`.
    Boolean,
    /// A single character.
    Char,
    /// Text.
    String,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::String => "string",
        };
        write!(f, "{name}")
    }
}

/// The declared type of a variable.
///
/// Arrays record their element type and their dimensions, outermost first,
/// exactly as written in `array[2][3] of integer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableType {
    /// A single scalar slot.
    Scalar(ScalarType),
    /// A fixed-size, possibly multi-dimensional array.
    Array {
        /// Type of every leaf element.
        element:    ScalarType,
        /// Dimension sizes, outermost first.
        dimensions: Vec<usize>,
    },
}

impl VariableType {
    /// Returns the type of the slot addressed by `depth` indices.
    ///
    /// Indexing all the way down yields the element type; indexing part of the
    /// way yields the remaining inner array type. Returns `None` if more
    /// indices are supplied than the type has dimensions.
    ///
    /// ## Example
    /// ```
    /// use semtree::ast::{ScalarType, VariableType};
    ///
    /// let matrix = VariableType::Array { element:    ScalarType::Integer,
    ///                                    dimensions: vec![2, 3], };
    ///
    /// assert_eq!(matrix.indexed(2), Some(VariableType::Scalar(ScalarType::Integer)));
    /// assert_eq!(matrix.indexed(1),
    ///            Some(VariableType::Array { element:    ScalarType::Integer,
    ///                                       dimensions: vec![3], }));
    /// assert_eq!(matrix.indexed(3), None);
    /// ```
    #[must_use]
    pub fn indexed(&self, depth: usize) -> Option<Self> {
        match self {
            Self::Scalar(_) if depth == 0 => Some(self.clone()),
            Self::Scalar(_) => None,
            Self::Array { element, dimensions } => match depth.cmp(&dimensions.len()) {
                std::cmp::Ordering::Less => Some(Self::Array { element:    *element,
                                                               dimensions: dimensions[depth..].to_vec(), }),
                std::cmp::Ordering::Equal => Some(Self::Scalar(*element)),
                std::cmp::Ordering::Greater => None,
            },
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Array { element, dimensions } => {
                write!(f, "array")?;
                for size in dimensions {
                    write!(f, "[{size}]")?;
                }
                write!(f, " of {element}")
            },
        }
    }
}

/// How an argument is bound to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Read-only, bound by value.
    In,
    /// Write-back, aliases the caller's variable.
    Var,
}

impl fmt::Display for PassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Var => write!(f, "var"),
        }
    }
}

/// Visibility of a function or procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `public`
    Public,
    /// `private`
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A declared parameter of a function or procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter name. Inside the body this bare name is also its id.
    pub name:          String,
    /// The declared type.
    pub declared_type: ScalarType,
    /// The binding discipline.
    pub pass_mode:     PassMode,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pass_mode, self.declared_type, self.name)
    }
}

/// Distinguishes functions from procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    /// A function returning a value of the given type.
    Function(ScalarType),
    /// A procedure; calls yield integer `0`.
    Procedure,
}

/// A function or procedure declaration.
///
/// The body is not stored here: it is the child chain of the tree node that
/// owns this declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDeclaration {
    /// Function or procedure, with the return type for functions.
    pub kind:       CallableKind,
    /// Declared visibility.
    pub visibility: Visibility,
    /// The callable's name, unique within the module.
    pub name:       String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// The scope id contributed to the body's declarations.
    pub scope_id:   String,
}

impl CallableDeclaration {
    /// Finds a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

impl fmt::Display for CallableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            CallableKind::Function(_) => "function",
            CallableKind::Procedure => "procedure",
        };
        let parameters = self.parameters
                             .iter()
                             .map(ToString::to_string)
                             .collect::<Vec<_>>()
                             .join(", ");
        write!(f, "{keyword} {} {}({parameters})", self.visibility, self.name)?;
        if let CallableKind::Function(return_type) = self.kind {
            write!(f, " : {return_type}")?;
        }
        Ok(())
    }
}

/// What a variable declaration stores when it executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// An expression evaluated once, when the declaration runs.
    Expression(Expr),
    /// A ready-made value that is copied as-is: a type default or an array
    /// template.
    Template(Value),
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The declared type.
    pub declared_type: VariableType,
    /// The bare name as written.
    pub name:          String,
    /// The globally unique scope-qualified id.
    pub id:            String,
    /// The initial value.
    pub initializer:   Initializer,
}

/// An argument at a call site, already matched against its parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Bound by value to an `in` parameter.
    In(Expr),
    /// Bound by reference to a `var` parameter: the caller-side resolved id.
    Var {
        /// The caller-side id.
        id:   String,
        /// Line number in the source code.
        line: usize,
    },
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In(expr) => write!(f, "{expr}"),
            Self::Var { id, .. } => write!(f, "{}", bare_name(id)),
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Identifiers are stored already resolved: `id` is the scope-qualified id of
/// a variable, or the bare name of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value: Value,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable or parameter.
    Variable {
        /// Resolved id.
        id:   String,
        /// Line number in the source code.
        line: usize,
    },
    /// Array element access (e.g. `m[i][j]`).
    ArrayIndex {
        /// Resolved id of the array variable.
        id:      String,
        /// One index per dimension, outermost first.
        indices: Vec<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Function call expression (e.g. `add(x, y)`).
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Argument>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A unary operation (e.g. negation).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, etc.).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use semtree::ast::Expr;
    ///
    /// let expr = Expr::Variable { id:   "Main^x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::ArrayIndex { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. } => *line,
        }
    }
}

/// Writes literal text back in source form, escaping the characters the
/// lexer unescapes.
fn escape_literal(text: impl IntoIterator<Item = char>, quote: char) -> String {
    text.into_iter()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\t' => "\\t".to_string(),
            '\\' => "\\\\".to_string(),
            c if c == quote => format!("\\{c}"),
            c => c.to_string(),
        })
        .collect()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => match value {
                Value::String(text) => write!(f, "\"{}\"", escape_literal(text.chars(), '"')),
                Value::Char(c) => write!(f, "'{}'", escape_literal([*c], '\'')),
                other => write!(f, "{other}"),
            },
            Self::Variable { id, .. } => write!(f, "{}", bare_name(id)),
            Self::ArrayIndex { id, indices, .. } => {
                write!(f, "{}", bare_name(id))?;
                for index in indices {
                    write!(f, "[{index}]")?;
                }
                Ok(())
            },
            Self::FunctionCall { name, arguments, .. } => {
                let arguments = arguments.iter()
                                         .map(ToString::to_string)
                                         .collect::<Vec<_>>()
                                         .join(", ");
                write!(f, "{name}({arguments})")
            },
            Self::UnaryOp { op, expr, .. } => match op {
                UnaryOperator::Negate => write!(f, "-{expr}"),
                UnaryOperator::Not => write!(f, "not {expr}"),
            },
            Self::BinaryOp { left, op, right, .. } => write!(f, "({left} {op} {right})"),
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and logical connectives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`=`)
    Equal,
    /// Not equal to (`<>`)
    NotEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `not x`).
    Not,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "=",
            NotEqual => "<>",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}
