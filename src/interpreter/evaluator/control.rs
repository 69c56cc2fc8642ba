use crate::{
    ast::Expr,
    interpreter::{
        evaluator::core::{Context, EvalResult, ExecOutcome},
        tree::node::{NodeId, Operator},
    },
};

impl Context<'_> {
    /// Runs a `while` loop.
    ///
    /// The condition must be a boolean and is checked before every
    /// iteration, so a loop whose condition starts out false never runs its
    /// body. A `return` inside the body stops the loop and is propagated.
    pub(crate) fn exec_while(&mut self,
                             node: NodeId,
                             condition: &Expr,
                             line: usize)
                             -> EvalResult<ExecOutcome> {
        while self.eval(condition)?.expect_boolean(line)? {
            if let outcome @ ExecOutcome::Returned(_) = self.exec_block(node)? {
                return Ok(outcome);
            }
        }
        Ok(ExecOutcome::Completed)
    }

    /// Runs the first branch of an `if` whose condition holds.
    ///
    /// Conditions are tried in source order: the `if` itself, then each
    /// `elseif`. The `else` branch runs only if none of them holds. At most one
    /// branch runs.
    pub(crate) fn exec_if(&mut self,
                          node: NodeId,
                          condition: &Expr,
                          else_ifs: &[NodeId],
                          else_branch: Option<NodeId>,
                          line: usize)
                          -> EvalResult<ExecOutcome> {
        if self.eval(condition)?.expect_boolean(line)? {
            return self.exec_block(node);
        }

        let tree = self.tree;
        for &branch in else_ifs {
            if let Operator::ElseIf { condition, .. } = tree.operator(branch)
               && self.eval(condition)?.expect_boolean(tree.node(branch).line)?
            {
                return self.exec_block(branch);
            }
        }

        match else_branch {
            Some(branch) => self.exec_block(branch),
            None => Ok(ExecOutcome::Completed),
        }
    }
}
