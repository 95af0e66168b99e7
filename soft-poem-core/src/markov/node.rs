use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Index of a node inside its owning `Graph`.
///
/// Ids are handed out in order of first appearance in the source text.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// A distinct token of the source text and the nodes reachable from it.
///
/// Conceptually, this is a state of a Markov chain whose outgoing edges are
/// grouped by the distance at which the target token followed (or, for a
/// negative distance, preceded) this one in the source.
///
/// ## Invariants
/// - `token` is unique within the owning graph
/// - Every stored set is non-empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
	/// Literal token value (word, punctuation mark or sentinel).
	token: String,
	/// Reachable nodes, per signed distance.
	/// Example: { 1 => {#4, #9}, -2 => {#0} }
	links: BTreeMap<i64, BTreeSet<NodeId>>,
}

impl Node {
	/// Creates a node with no links.
	pub fn new(token: &str) -> Self {
		Self {
			token: token.to_owned(),
			links: BTreeMap::new(),
		}
	}

	pub fn token(&self) -> &str {
		&self.token
	}

	/// Records that `target` appears `distance` tokens away from this node.
	///
	/// Linking the same target twice at one distance is a no-op.
	pub fn add_link(&mut self, distance: i64, target: NodeId) {
		self.links.entry(distance).or_default().insert(target);
	}

	/// Nodes reachable at exactly `distance`, in id order.
	pub fn reachable(&self, distance: i64) -> impl Iterator<Item = NodeId> + '_ {
		self.links.get(&distance).into_iter().flat_map(|targets| targets.iter().copied())
	}

	/// Returns `true` if nothing was ever linked from this node.
	pub fn is_isolated(&self) -> bool {
		self.links.is_empty()
	}
}
