//! Kind-dispatched visitors over a [`TreeArena`].
//!
//! A visitor declares, once, a [`HandlerTable`] holding one handler per node
//! kind it supports. Dispatch indexes that table by the node's kind, so the
//! pair (visitor type, node kind) selects the handler in constant time and the
//! node types never learn about the operations run over them.
//!
//! # Traversal Order
//!
//! [`TreeArena::accept`] walks depth-first, pre-order, children left to right.
//! Handlers steer the walk through [`VisitFlow`].

use std::fmt;

use tracing::{instrument, trace};

use crate::domain::arena::{NodeId, NodeKind, NodeRef, TreeArena};
use crate::domain::error::{TreeError, TreeResult};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitFlow {
    /// Continue traversal into children.
    #[default]
    Continue,

    /// Skip this node's children, continue with its siblings.
    SkipChildren,

    /// Stop traversal entirely.
    Stop,
}

/// Operation run for one node kind.
pub type Handler<V, P> = fn(&mut V, &NodeRef<'_, P>) -> TreeResult<VisitFlow>;

/// Per-visitor dispatch table, indexed by [`NodeKind::index`].
///
/// Kinds without a handler are unsupported; there is no implicit fallback.
/// [`HandlerTable::on_any`] registers one handler for every kind explicitly.
pub struct HandlerTable<V, P> {
    handlers: [Option<Handler<V, P>>; NodeKind::COUNT],
}

impl<V, P> Clone for HandlerTable<V, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, P> Copy for HandlerTable<V, P> {}

impl<V, P> Default for HandlerTable<V, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P> fmt::Debug for HandlerTable<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

impl<V, P> HandlerTable<V, P> {
    pub fn new() -> Self {
        Self {
            handlers: [None; NodeKind::COUNT],
        }
    }

    pub fn on(mut self, kind: NodeKind, handler: Handler<V, P>) -> Self {
        self.handlers[kind.index()] = Some(handler);
        self
    }

    pub fn on_any(mut self, handler: Handler<V, P>) -> Self {
        for kind in NodeKind::ALL {
            self.handlers[kind.index()] = Some(handler);
        }
        self
    }

    pub fn get(&self, kind: NodeKind) -> Option<Handler<V, P>> {
        self.handlers[kind.index()]
    }

    pub fn supports(&self, kind: NodeKind) -> bool {
        self.handlers[kind.index()].is_some()
    }

    /// Kinds with a registered handler.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        NodeKind::ALL
            .into_iter()
            .filter(move |kind| self.supports(*kind))
    }
}

/// An operation over tree nodes, selected per node kind.
///
/// Accumulated state (totals, collected labels) lives in the implementor.
///
/// ```ignore
/// struct LeafCounter {
///     count: usize,
///     table: HandlerTable<LeafCounter, u64>,
/// }
///
/// impl LeafCounter {
///     fn new() -> Self {
///         let table = HandlerTable::new()
///             .on(NodeKind::Leaf, |v: &mut Self, _| {
///                 v.count += 1;
///                 Ok(VisitFlow::Continue)
///             })
///             .on(NodeKind::Composite, |_, _| Ok(VisitFlow::Continue));
///         Self { count: 0, table }
///     }
/// }
///
/// impl Visitor<u64> for LeafCounter {
///     fn name(&self) -> &str { "leaf-counter" }
///     fn handlers(&self) -> HandlerTable<Self, u64> { self.table }
/// }
/// ```
pub trait Visitor<P>: Sized {
    /// Name used in error messages.
    fn name(&self) -> &str;

    fn handlers(&self) -> HandlerTable<Self, P>;
}

/// Runs the handler `visitor` registered for `node`'s kind.
pub fn dispatch<P, V: Visitor<P>>(visitor: &mut V, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
    let handler = visitor.handlers().get(node.kind()).ok_or_else(|| {
        TreeError::unsupported(format!("{} visitor", visitor.name()), node.kind())
    })?;
    trace!(node = %node.id(), kind = %node.kind(), visitor = visitor.name(), "dispatch");
    handler(visitor, node)
}

impl<P> TreeArena<P> {
    /// Visits the subtree rooted at `id` in pre-order.
    ///
    /// Returns [`VisitFlow::Stop`] if a handler aborted the walk and
    /// [`VisitFlow::Continue`] once every reachable node was visited. A node
    /// whose kind the visitor does not handle fails the walk at that node.
    #[instrument(level = "debug", skip(self, visitor), fields(visitor = visitor.name()))]
    pub fn accept<V: Visitor<P>>(&self, id: NodeId, visitor: &mut V) -> TreeResult<VisitFlow> {
        let mut pending = vec![(id, 0)];
        while let Some((current, depth)) = pending.pop() {
            let node = self.node_ref_at(current, depth)?;
            match dispatch(visitor, &node)? {
                VisitFlow::Stop => return Ok(VisitFlow::Stop),
                VisitFlow::SkipChildren => {}
                VisitFlow::Continue => pending.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|&child| (child, depth + 1)),
                ),
            }
        }
        Ok(VisitFlow::Continue)
    }
}
