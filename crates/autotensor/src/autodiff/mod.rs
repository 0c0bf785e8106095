//! Element-level reverse-mode automatic differentiation.
//!
//! Every gradient-tracking scalar owns an `Rc` into a graph of [`Node`]s.
//! Arithmetic on tracking elements records operation nodes holding the local
//! partial derivatives; [`Element::backward`] then sweeps the graph in
//! reverse and leaves each reachable node's gradient behind.
//!
//! # Architecture
//!
//! ```text
//! Element { value, node }  ──owns──►  Rc<Node>
//!                                        │
//!                                        ▼
//!                       Operation { parents: [Option<Rc<Node>>; 2],
//!                                   partials: [f64; 2] }
//!                                        │
//!                                        ▼
//!                                   ... Leaf
//! ```
//!
//! # Example
//!
//! ```
//! use autotensor::autodiff::Element;
//!
//! let x = Element::new(2.0, true);
//! let y = x.powf(3.0);
//!
//! y.backward().unwrap();
//! assert_eq!(x.grad().unwrap(), 12.0);
//! ```
//!
//! # Design Notes
//!
//! - Single-threaded: nodes use `Rc` and `Cell`, so graphs are `!Send`
//! - The graph is released by reference counting; no explicit tape to clear
//! - Gradients of nodes with several consumers accumulate over all paths

mod backward;
mod element;
mod node;

pub use element::Element;
pub use node::Node;
