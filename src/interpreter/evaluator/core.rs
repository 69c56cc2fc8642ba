use tracing::{debug, trace};

use crate::{
    ast::{Expr, Initializer},
    error::RuntimeError,
    interpreter::{
        console::Console,
        evaluator::storage::Frame,
        program::Program,
        symbols::{FunctionTable, Variable, VariableTable},
        tree::{
            core::Tree,
            node::{NodeId, Operator},
        },
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement or block finished.
///
/// `Returned` travels up through every enclosing block until the call
/// protocol consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Control fell off the end normally.
    Completed,
    /// A `return` was executed with the given result.
    Returned(Value),
}

/// Stores the runtime evaluation context.
///
/// This struct borrows the parsed program and holds all mutable run-time
/// state: module and entry-block variables, the stack of activation frames,
/// and the console used by `input` and `output`.
///
/// ## Usage
///
/// A `Context` is created per run with [`Context::new`] and driven with
/// [`Context::run`].
pub struct Context<'a> {
    pub(crate) tree:      &'a Tree,
    pub(crate) functions: &'a FunctionTable,
    root:                 NodeId,
    beginning:            Option<NodeId>,
    /// Variables declared outside any call.
    pub globals:          VariableTable,
    pub(crate) frames:    Vec<Frame>,
    pub(crate) console:   &'a mut dyn Console,
}

impl<'a> Context<'a> {
    /// Creates a context for one run of `program`.
    pub fn new(program: &'a Program, console: &'a mut dyn Console) -> Self {
        Self { tree: &program.tree,
               functions: &program.functions,
               root: program.root,
               beginning: program.beginning(),
               globals: VariableTable::new(),
               frames: Vec::new(),
               console }
    }

    /// Executes the program.
    ///
    /// Module-level statements run first, in order, skipping callable
    /// declarations; then the entry block runs.
    ///
    /// # Errors
    /// The first runtime error aborts the run.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     interpreter::{console::BufferConsole, evaluator::core::Context},
    ///     parse_source,
    /// };
    ///
    /// let program = parse_source("module M; variable integer x := 5; variable integer y := 10;
    ///                             beginning let x := x + y; output x; end M.").unwrap();
    /// let mut console = BufferConsole::new();
    ///
    /// Context::new(&program, &mut console).run().unwrap();
    /// assert_eq!(console.output(), ["15"]);
    /// ```
    pub fn run(&mut self) -> EvalResult<()> {
        let tree = self.tree;
        for statement in tree.children(self.root) {
            if matches!(tree.operator(statement), Operator::Callable(_)) {
                continue;
            }
            self.exec_statement(statement)?;
        }

        if let Some(beginning) = self.beginning {
            debug!(line = tree.node(beginning).line, "entering beginning block");
            self.exec_block(beginning)?;
        }
        Ok(())
    }

    /// Executes the child chain of a block-bearing node.
    ///
    /// # Returns
    /// `Returned` as soon as a statement returns, `Completed` otherwise.
    pub(crate) fn exec_block(&mut self, block: NodeId) -> EvalResult<ExecOutcome> {
        let tree = self.tree;
        for statement in tree.children(block) {
            if let ExecOutcome::Returned(value) = self.exec_statement(statement)? {
                return Ok(ExecOutcome::Returned(value));
            }
        }
        Ok(ExecOutcome::Completed)
    }

    /// Executes a single statement node.
    pub(crate) fn exec_statement(&mut self, id: NodeId) -> EvalResult<ExecOutcome> {
        let tree = self.tree;
        let node = tree.node(id);
        let line = node.line;
        trace!(line, statement = %node.operator, "executing");

        match &node.operator {
            Operator::Variable(declaration) => {
                let value = match &declaration.initializer {
                    Initializer::Expression(expr) => self.eval(expr)?,
                    Initializer::Template(template) => template.clone(),
                };
                let value = value.coerce_to(&declaration.declared_type, line)?;
                self.declare(Variable { declared_type: declaration.declared_type.clone(),
                                        name: declaration.name.clone(),
                                        id: declaration.id.clone(),
                                        value });
                Ok(ExecOutcome::Completed)
            },
            Operator::Let { target, indices, value } => {
                let value = self.eval(value)?;
                let indices = self.eval_indices(indices)?;
                self.store(target, &indices, value, line)?;
                Ok(ExecOutcome::Completed)
            },
            Operator::While { condition, .. } => self.exec_while(id, condition, line),
            Operator::If { condition,
                           else_ifs,
                           else_branch,
                           .. } => self.exec_if(id, condition, else_ifs, *else_branch, line),
            Operator::Call { name, arguments } => {
                self.call(name, arguments, line)?;
                Ok(ExecOutcome::Completed)
            },
            Operator::Input { target, indices } => {
                let indices = self.eval_indices(indices)?;
                self.read_input(target, &indices, line)?;
                Ok(ExecOutcome::Completed)
            },
            Operator::Output { value } => {
                let text = self.eval(value)?.as_string();
                self.console
                    .write_line(&text)
                    .map_err(|source| RuntimeError::Io { source, line })?;
                Ok(ExecOutcome::Completed)
            },
            Operator::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Integer(0),
                };
                Ok(ExecOutcome::Returned(value))
            },
            Operator::Beginning { .. } | Operator::ElseIf { .. } | Operator::Else { .. } => self.exec_block(id),
            Operator::Module { .. } | Operator::Callable(_) => Ok(ExecOutcome::Completed),
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Operands of
    /// binary operators are evaluated eagerly, left then right.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { id, line } => self.load(id, *line).cloned(),
            Expr::ArrayIndex { id, indices, line } => {
                let indices = self.eval_indices(indices)?;
                self.load(id, *line)?
                    .as_array(*line)?
                    .element_at(&indices, *line)
                    .cloned()
            },
            Expr::FunctionCall { name,
                                 arguments,
                                 line, } => self.call(name, arguments, *line),
            Expr::UnaryOp { op, expr, line } => {
                let value = self.eval(expr)?;
                Self::eval_unary(*op, &value, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_binary(*op, &left, &right, *line)
            },
        }
    }

    /// Evaluates every index expression to an integer, left to right.
    pub(crate) fn eval_indices(&mut self, indices: &[Expr]) -> EvalResult<Vec<i32>> {
        indices.iter()
               .map(|index| self.eval(index)?.as_integer(index.line_number()))
               .collect()
    }
}
