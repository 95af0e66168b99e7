//! Word-adjacency graph and the walk that samples new text from it.
//!
//! - `DistanceWeights`: how strongly each signed token distance links words
//! - `Node` / `Graph`: the graph built from a source text
//! - `Walker`: bounded weighted walk producing a word list

/// Signed distance → weight table, with the forward-adjacency bias.
pub mod distance;

/// Graph construction, snapshots and the start / next picks.
pub mod graph;

/// A distinct token and its reachable nodes per distance.
///
/// Only used through `Graph`.
pub mod node;

/// Stateful walk over a graph with a dead-end policy.
pub mod walker;

pub use distance::DistanceWeights;
pub use graph::{Graph, tokenize};
pub use node::{Node, NodeId};
pub use walker::{DeadEndPolicy, Walker};
