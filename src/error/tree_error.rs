use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Represents violations of the program tree's placement rules.
pub enum TreeError {
    /// A module root was inserted while the tree already had one.
    #[error("the program tree already has a module root")]
    RootAlreadySet,
    /// An entry block was attached to a node that is not a reachable module.
    #[error("the entry block must belong to the open module")]
    ModuleNotFound,
    /// The module already owns an entry block.
    #[error("the module already has a beginning block")]
    BeginningAlreadySet,
    /// A branch was attached to a node that is not an `if`.
    #[error("branches can only be attached to an if statement")]
    NotAnIf,
}
