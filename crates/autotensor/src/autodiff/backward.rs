//! Backward pass over the scalar computation graph.

use super::node::Node;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Propagate gradients from `seed` to every node it was computed from.
///
/// A reverse breadth-first sweep driven by each node's child count instead
/// of an explicit topological sort: a node is enqueued only after all of its
/// children have added their contribution, so it forwards the complete sum
/// over every path exactly once.
///
/// Returns the number of nodes that forwarded their gradient.
#[instrument(level = "debug", skip_all)]
pub(crate) fn backward(seed: &Rc<Node>) -> usize {
    let mut queue = VecDeque::new();
    let mut started: Vec<Rc<Node>> = Vec::new();
    let mut processed = 0;

    seed.initialize(1.0);
    queue.push_back(Rc::clone(seed));

    while let Some(node) = queue.pop_front() {
        let gradient = node.gradient().unwrap_or(0.0);

        for (parent, partial) in node.parents() {
            if parent.try_initialize(0.0) {
                started.push(Rc::clone(parent));
            }
            parent.accumulate(gradient * partial);
            if parent.visit_from_child() {
                queue.push_back(Rc::clone(parent));
            }
        }

        node.reset();
        processed += 1;
    }

    // Nodes with consumers outside the seed's graph never count down to zero.
    let mut stalled = 0;
    for node in started.iter().filter(|node| node.is_initialized()) {
        node.reset();
        stalled += 1;
    }
    if stalled > 0 {
        warn!(
            stalled,
            "backward pass left nodes with consumers outside the seed graph"
        );
    }

    debug!(processed, "backward pass complete");
    processed
}
