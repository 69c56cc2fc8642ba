use std::fmt;

use crate::{
    ast::{Expr, Initializer, bare_name},
    interpreter::tree::{
        core::Tree,
        node::{NodeId, Operator},
    },
};

const INDENT: &str = "  ";

impl fmt::Display for Operator {
    /// Renders the header line of a node, without its body.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module { name, .. } => write!(f, "module {name}"),
            Self::Beginning { .. } => write!(f, "beginning"),
            Self::Callable(declaration) => write!(f, "{declaration}"),
            Self::Variable(declaration) => {
                write!(f, "variable {} {}", declaration.declared_type, declaration.name)?;
                if let Initializer::Expression(expr) = &declaration.initializer {
                    write!(f, " := {expr}")?;
                }
                Ok(())
            },
            Self::Let { target, indices, value } => {
                write!(f, "let {}", target_text(target, indices))?;
                write!(f, " := {value}")
            },
            Self::While { condition, .. } => write!(f, "while {condition} repeat"),
            Self::If { condition, .. } => write!(f, "if {condition} then"),
            Self::ElseIf { condition, .. } => write!(f, "elseif {condition} then"),
            Self::Else { .. } => write!(f, "else"),
            Self::Call { name, arguments } => {
                let arguments = arguments.iter()
                                         .map(ToString::to_string)
                                         .collect::<Vec<_>>()
                                         .join(", ");
                write!(f, "call {name}({arguments})")
            },
            Self::Input { target, indices } => write!(f, "input {}", target_text(target, indices)),
            Self::Output { value } => write!(f, "output {value}"),
            Self::Return { value: Some(value) } => write!(f, "return {value}"),
            Self::Return { value: None } => write!(f, "return"),
        }
    }
}

fn target_text(target: &str, indices: &[Expr]) -> String {
    let indices: String = indices.iter().map(|index| format!("[{index}]")).collect();
    format!("{}{indices}", bare_name(target))
}

impl Tree {
    /// Renders `id` and everything nested under it, one construct per line,
    /// indenting each body by two spaces.
    ///
    /// # Example
    /// ```
    /// use semtree::parse_source;
    ///
    /// let program = parse_source("module M; beginning while false repeat output 1; end while; end M.")
    ///     .unwrap();
    /// let beginning = program.beginning().unwrap();
    ///
    /// assert_eq!(program.tree.render(beginning),
    ///            "beginning\n  while false repeat\n    output 1\n  end while");
    /// ```
    #[must_use]
    pub fn render(&self, id: NodeId) -> String {
        let mut lines = Vec::new();
        self.render_into(id, 0, &mut lines);
        lines.join("\n")
    }

    fn render_into(&self, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        let operator = self.operator(id);
        lines.push(format!("{}{operator}", INDENT.repeat(depth)));

        if operator.scope_id().is_none() {
            return;
        }

        self.render_body(id, depth + 1, lines);
        if let Operator::Module { beginning: Some(beginning), .. } = operator {
            self.render_into(*beginning, depth + 1, lines);
        }
        if let Operator::If { else_ifs, else_branch, .. } = operator {
            for branch in else_ifs.iter().chain(else_branch) {
                lines.push(format!("{}{}", INDENT.repeat(depth), self.operator(*branch)));
                self.render_body(*branch, depth + 1, lines);
            }
        }

        let closing = match operator {
            Operator::Module { name, .. } => format!("end {name}."),
            Operator::Callable(declaration) => format!("end {}", declaration.name),
            Operator::While { .. } => "end while".to_string(),
            Operator::If { .. } => "end if".to_string(),
            _ => return,
        };
        lines.push(format!("{}{closing}", INDENT.repeat(depth)));
    }

    fn render_body(&self, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        for child in self.children(id) {
            self.render_into(child, depth, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parse_source;

    #[test]
    fn literals_render_in_source_form() {
        let source = r#"module M;
                        variable array[2] of string words;
                        beginning
                          output "a\"b\\c\n";
                          output '\'';
                          let words[1] := "x";
                        end M."#;
        let program = parse_source(source).unwrap();

        assert_eq!(program.render_top_level(),
                   vec!["variable array[2] of string words".to_string(),
                        "beginning\n  output \"a\\\"b\\\\c\\n\"\n  output '\\''\n  let words[1] := \"x\""
                        .to_string()]);
    }
}
