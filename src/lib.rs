//! Composite trees with kind-dispatched visitors and fail-fast traversal.
//!
//! Layers, innermost first:
//! - [`domain`]: the arena of leaves and composites, mutation with invariant
//!   checks, pre-order cursors and iterators, visitor dispatch
//! - [`application`]: outline loading
//! - [`config`]: layered settings
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    Cursor, CursorState, DescribeStyle, HandlerTable, NodeId, NodeKind, NodeRef, Payload,
    TreeArena, TreeError, TreeResult, VisitFlow, Visitor,
};
