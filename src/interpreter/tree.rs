/// The node arena and its link primitives.
///
/// Holds the `Tree` type: allocation of detached nodes, first-child and
/// next-sibling insertion, the module root and entry-block slots, `if`
/// branch slots, child iteration, parent lookup and reachability walks.
pub mod core;
/// Node, operator and link types.
pub mod node;
/// Textual rendering of nodes and subtrees.
pub mod render;
