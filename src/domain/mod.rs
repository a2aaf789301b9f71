//! Domain layer: the tree, its traversals and visitor dispatch
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod render;
pub mod visitor;
pub mod visitors;

pub use arena::{DescribeStyle, NodeBody, NodeId, NodeKind, NodeRef, Payload, TreeArena, TreeNode};
pub use builder::{OutlineNode, TreeBuilder};
pub use cursor::{Cursor, CursorState};
pub use error::{TreeError, TreeResult};
pub use iter::{PostOrderIter, PreOrderIter};
pub use render::TreeRender;
pub use visitor::{dispatch, Handler, HandlerTable, VisitFlow, Visitor};
pub use visitors::{DepthLimit, FindFirst, KindCounter, LeafCollector, MeasureSum, Renderer};
