//! Scalar computation-graph nodes.
//!
//! Edges point from a node to the older nodes it was computed from, so the
//! graph is a DAG and plain `Rc` ownership releases it without a cycle
//! collector. Each node counts the live operation nodes that consume it; the
//! backward traversal uses that count to know when a node's gradient is
//! complete.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The two node variants.
pub(crate) enum NodeKind {
    /// A fresh gradient-tracking input. Has no parents.
    Leaf,
    /// The result of a scalar operation on at least one tracking operand.
    ///
    /// `partials[i]` is the derivative of the output with respect to
    /// `parents[i]`, evaluated during the forward pass. Unary operations
    /// leave `parents[1]` empty.
    Operation {
        parents: [Option<Rc<Node>>; 2],
        partials: [f64; 2],
    },
}

/// A node in the scalar computation graph.
///
/// Gradient and visitation state are interior-mutable and only written by
/// the backward traversal.
pub struct Node {
    kind: NodeKind,
    /// Accumulated gradient; `None` until a backward pass reaches the node.
    gradient: Cell<Option<f64>>,
    /// Number of live operation nodes holding a reference to this node.
    num_children: Cell<usize>,
    /// Children still to contribute in the current pass; `None` outside a pass.
    unvisited_children: Cell<Option<usize>>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            gradient: Cell::new(None),
            num_children: Cell::new(0),
            unvisited_children: Cell::new(None),
        }
    }

    /// Create a leaf node.
    pub(crate) fn leaf() -> Rc<Node> {
        Rc::new(Self::with_kind(NodeKind::Leaf))
    }

    /// Create an operation node over up to two parents.
    ///
    /// Registers the new node as a child of each present parent.
    pub(crate) fn operation(
        parent_a: Option<&Rc<Node>>,
        parent_b: Option<&Rc<Node>>,
        partial_a: f64,
        partial_b: f64,
    ) -> Rc<Node> {
        let parents = [parent_a.cloned(), parent_b.cloned()];
        for parent in parents.iter().flatten() {
            parent.num_children.set(parent.num_children.get() + 1);
        }
        Rc::new(Self::with_kind(NodeKind::Operation {
            parents,
            partials: [partial_a, partial_b],
        }))
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Number of live operation nodes consuming this node.
    pub fn num_children(&self) -> usize {
        self.num_children.get()
    }

    /// Gradient accumulated by the most recent backward pass that reached
    /// this node, or `None` if no pass has reached it.
    pub fn gradient(&self) -> Option<f64> {
        self.gradient.get()
    }

    /// Present parents paired with their partial derivatives.
    pub(crate) fn parents(&self) -> impl Iterator<Item = (&Rc<Node>, f64)> {
        let (parents, partials): (&[Option<Rc<Node>>], &[f64]) = match &self.kind {
            NodeKind::Leaf => (&[][..], &[][..]),
            NodeKind::Operation { parents, partials } => (parents.as_slice(), partials.as_slice()),
        };
        parents
            .iter()
            .zip(partials.iter().copied())
            .filter_map(|(parent, partial)| parent.as_ref().map(|p| (p, partial)))
    }

    /// Start this pass for the node unconditionally.
    pub(crate) fn initialize(&self, gradient: f64) {
        self.gradient.set(Some(gradient));
        self.unvisited_children.set(Some(self.num_children.get()));
    }

    /// Start this pass for the node unless it has already been started.
    ///
    /// Returns `true` if the node was initialized by this call.
    pub(crate) fn try_initialize(&self, gradient: f64) -> bool {
        if self.unvisited_children.get().is_some() {
            return false;
        }
        self.initialize(gradient);
        true
    }

    /// Whether the node has been started in the current pass.
    pub(crate) fn is_initialized(&self) -> bool {
        self.unvisited_children.get().is_some()
    }

    pub(crate) fn accumulate(&self, contribution: f64) {
        let current = self.gradient.get().unwrap_or(0.0);
        self.gradient.set(Some(current + contribution));
    }

    /// Record that one child has contributed.
    ///
    /// Returns `true` once every child has contributed in this pass.
    pub(crate) fn visit_from_child(&self) -> bool {
        match self.unvisited_children.get() {
            Some(remaining) => {
                let remaining = remaining.saturating_sub(1);
                self.unvisited_children.set(Some(remaining));
                remaining == 0
            }
            None => false,
        }
    }

    /// Return the visitation counter to its uninitialized state.
    pub(crate) fn reset(&self) {
        self.unvisited_children.set(None);
    }

    /// Forget the accumulated gradient.
    pub(crate) fn clear_gradient(&self) {
        self.gradient.set(None);
    }
}

impl Drop for Node {
    // Tear down parent chains iteratively so long graphs cannot overflow the
    // stack through recursive `Rc` drops.
    fn drop(&mut self) {
        let NodeKind::Operation { parents, .. } = &mut self.kind else {
            return;
        };
        let mut stack: Vec<Rc<Node>> = parents.iter_mut().filter_map(Option::take).collect();

        while let Some(parent) = stack.pop() {
            parent.num_children.set(parent.num_children.get() - 1);
            if let Ok(mut owned) = Rc::try_unwrap(parent) {
                if let NodeKind::Operation { parents, .. } = &mut owned.kind {
                    stack.extend(parents.iter_mut().filter_map(Option::take));
                }
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            NodeKind::Leaf => "Leaf",
            NodeKind::Operation { .. } => "Operation",
        };
        f.debug_struct("Node")
            .field("kind", &kind)
            .field("gradient", &self.gradient.get())
            .field("num_children", &self.num_children.get())
            .finish()
    }
}
