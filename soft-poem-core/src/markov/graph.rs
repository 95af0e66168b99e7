use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::distance::DistanceWeights;
use super::node::{Node, NodeId};
use crate::error::{Error, Result};
use crate::io::{build_output_path, read_snapshot, read_source, snapshot_is_fresh, write_snapshot};
use crate::sampling::weighted_choice;

/// Splits a source text into tokens.
///
/// Tokens are separated by whitespace only: punctuation marks and the layout
/// sentinels (`---`, `|||`) are ordinary tokens when they stand alone.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(str::to_owned).collect()
}

/// Word-adjacency graph derived from a source text.
///
/// Each distinct token becomes one `Node`; for every position `i` and every
/// distance `d` present in the distance weights, the token at `i + d` is
/// linked from the token at `i`. Positions are discarded once linked.
///
/// # Invariants
/// - `nodes` is non-empty
/// - `index` maps every node token to its id
/// - Links only use distances present in `distance_weights`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	index: HashMap<String, NodeId>,
	distance_weights: DistanceWeights,
}

impl Graph {
	/// Builds the graph from a token sequence.
	///
	/// Runs in O(tokens × distance keys): only the distances present in the
	/// table are probed, never a whole window.
	///
	/// # Errors
	/// - `EmptyGraph` if `tokens` is empty
	/// - A configuration error if `distance_weights` is malformed
	pub fn build<S: AsRef<str>>(tokens: &[S], distance_weights: DistanceWeights) -> Result<Self> {
		distance_weights.validate()?;
		if tokens.is_empty() {
			return Err(Error::EmptyGraph);
		}

		let mut graph = Self {
			nodes: Vec::new(),
			index: HashMap::new(),
			distance_weights,
		};

		let positions: Vec<NodeId> = tokens.iter().map(|token| graph.intern(token.as_ref())).collect();

		let len = positions.len() as i64;
		let distances: Vec<i64> = graph.distance_weights.iter().map(|(distance, _)| distance).collect();
		for (i, source) in positions.iter().enumerate() {
			for &distance in &distances {
				let j = i as i64 + distance;
				if (0..len).contains(&j) {
					graph.nodes[source.0].add_link(distance, positions[j as usize]);
				}
			}
		}

		debug!(tokens = tokens.len(), nodes = graph.nodes.len(), "built word graph");
		Ok(graph)
	}

	/// Builds the graph from raw text, see `tokenize`.
	pub fn from_text(text: &str, distance_weights: DistanceWeights) -> Result<Self> {
		Self::build(&tokenize(text), distance_weights)
	}

	/// Reads a source text file and builds its graph.
	pub fn from_file<P: AsRef<Path>>(path: P, distance_weights: DistanceWeights) -> Result<Self> {
		let text = read_source(path)?;
		Self::from_text(&text, distance_weights)
	}

	/// Loads a graph snapshot if one exists next to the source, otherwise
	/// builds the graph from the source and stores a snapshot.
	///
	/// - The snapshot lives at `<stem>.graph.bin` and is encoded with `postcard`.
	/// - A snapshot built with other distance weights, older than the source,
	///   or unreadable is rebuilt.
	/// - Failing to write the snapshot only logs a warning.
	pub fn load_or_build<P: AsRef<Path>>(path: P, distance_weights: DistanceWeights) -> Result<Self> {
		let path = path.as_ref();
		let snapshot_path = build_output_path(path, "graph.bin")?;

		if snapshot_is_fresh(path, &snapshot_path) {
			match read_snapshot::<Graph, _>(&snapshot_path) {
				Ok(Some(graph)) if graph.distance_weights == distance_weights => return Ok(graph),
				Ok(Some(_)) => debug!(path = %snapshot_path.display(), "graph snapshot uses other distance weights"),
				Ok(None) => (),
				Err(e) => warn!(path = %snapshot_path.display(), error = %e, "discarding unreadable graph snapshot"),
			}
		}

		let graph = Self::from_file(path, distance_weights)?;
		match write_snapshot(&snapshot_path, &graph) {
			Ok(()) => info!(path = %snapshot_path.display(), "wrote graph snapshot"),
			Err(e) => warn!(path = %snapshot_path.display(), error = %e, "could not write graph snapshot"),
		}
		Ok(graph)
	}

	/// Returns the id of `token`, creating its node on first sight.
	fn intern(&mut self, token: &str) -> NodeId {
		if let Some(id) = self.index.get(token) {
			return *id;
		}
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node::new(token));
		self.index.insert(token.to_owned(), id);
		id
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// # Panics
	/// Panics if `id` does not belong to this graph.
	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	pub fn token(&self, id: NodeId) -> &str {
		self.node(id).token()
	}

	/// Looks a node up by its exact token value.
	pub fn find(&self, token: &str) -> Option<NodeId> {
		self.index.get(token).copied()
	}

	pub fn distance_weights(&self) -> &DistanceWeights {
		&self.distance_weights
	}

	/// Picks a node uniformly among all nodes.
	pub fn pick_start<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NodeId> {
		if self.nodes.is_empty() {
			return Err(Error::EmptyGraph);
		}
		Ok(NodeId(rng.random_range(0..self.nodes.len())))
	}

	/// Weighted successors of `current`, by ascending distance then id.
	///
	/// Every node reachable at distance `d` is a candidate weighted by the
	/// weight of `d`. A node reachable at several distances is a candidate
	/// once per distance, so its chances add up.
	pub fn candidates(&self, current: NodeId) -> Vec<(NodeId, f64)> {
		let node = self.node(current);
		self.distance_weights
			.iter()
			.filter(|(_, weight)| *weight > 0.0)
			.flat_map(move |(distance, weight)| node.reachable(distance).map(move |target| (target, weight)))
			.collect()
	}

	/// Picks the node following `current` among its `candidates`.
	///
	/// # Errors
	/// Returns `DeadEnd` if no node is reachable at a positively weighted distance.
	pub fn pick_next<R: Rng + ?Sized>(&self, rng: &mut R, current: NodeId) -> Result<NodeId> {
		let candidates = self.candidates(current);
		if candidates.is_empty() {
			return Err(Error::DeadEnd { token: self.token(current).to_owned() });
		}
		Ok(*weighted_choice(rng, &candidates)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sampling::seeded_rng;
	use pretty_assertions::assert_eq;
	use std::collections::BTreeMap;
	use std::fs;

	fn weights(pairs: &[(i64, f64)]) -> DistanceWeights {
		DistanceWeights::new(pairs.iter().copied().collect::<BTreeMap<_, _>>()).unwrap()
	}

	fn reachable(graph: &Graph, from: &str, distance: i64) -> Vec<String> {
		let id = graph.find(from).unwrap();
		graph.node(id).reachable(distance).map(|target| graph.token(target).to_owned()).collect()
	}

	#[test]
	fn alternating_tokens_link_both_ways() {
		let graph = Graph::from_text("a b a b a", weights(&[(1, 10.0)])).unwrap();
		assert_eq!(graph.len(), 2);
		assert_eq!(reachable(&graph, "a", 1), vec!["b"]);
		assert_eq!(reachable(&graph, "b", 1), vec!["a"]);
	}

	#[test]
	fn only_configured_distances_are_linked() {
		let graph = Graph::from_text("one two three four", weights(&[(-1, 1.0), (2, 1.0)])).unwrap();
		assert_eq!(reachable(&graph, "one", 2), vec!["three"]);
		assert_eq!(reachable(&graph, "three", -1), vec!["two"]);
		assert!(reachable(&graph, "one", 1).is_empty());
		assert!(reachable(&graph, "one", -1).is_empty());
	}

	#[test]
	fn punctuation_and_sentinels_are_tokens() {
		assert_eq!(tokenize("hello , world\n--- |||  end ."), vec!["hello", ",", "world", "---", "|||", "end", "."]);
	}

	#[test]
	fn empty_text_has_no_graph() {
		assert!(matches!(Graph::from_text("", DistanceWeights::default()), Err(Error::EmptyGraph)));
		assert!(matches!(Graph::from_text(" \n\t ", DistanceWeights::default()), Err(Error::EmptyGraph)));
	}

	#[test]
	fn pick_next_follows_the_only_edge() {
		let graph = Graph::from_text("red green blue", weights(&[(1, 5.0)])).unwrap();
		let mut rng = seeded_rng(17);
		let red = graph.find("red").unwrap();
		let green = graph.find("green").unwrap();
		for _ in 0..100 {
			assert_eq!(graph.pick_next(&mut rng, red).unwrap(), green);
		}
	}

	#[test]
	fn self_link_at_distance_two() {
		let graph = Graph::from_text("a b a", weights(&[(1, 1.0), (2, 1.0)])).unwrap();
		let a = graph.find("a").unwrap();
		let b = graph.find("b").unwrap();
		assert_eq!(graph.candidates(a), vec![(b, 1.0), (a, 1.0)]);
	}

	#[test]
	fn weights_add_up_across_distances() {
		// From "a": "b" at distances 1 and 2, "c" at distance 3
		let graph = Graph::from_text("a b b c", weights(&[(1, 1.0), (2, 1.0), (3, 1.0)])).unwrap();
		let a = graph.find("a").unwrap();
		let b = graph.find("b").unwrap();
		let c = graph.find("c").unwrap();
		assert_eq!(graph.candidates(a), vec![(b, 1.0), (b, 1.0), (c, 1.0)]);

		let mut rng = seeded_rng(23);
		let n = 30_000;
		let hits = (0..n).filter(|_| graph.pick_next(&mut rng, a).unwrap() == b).count();
		let share = hits as f64 / n as f64;
		assert!((0.64..0.69).contains(&share), "expected ~2/3 for b, got {share}");
	}

	#[test]
	fn last_token_is_a_dead_end_without_backward_links() {
		let graph = Graph::from_text("red green blue", weights(&[(1, 5.0)])).unwrap();
		let mut rng = seeded_rng(17);
		let blue = graph.find("blue").unwrap();
		match graph.pick_next(&mut rng, blue) {
			Err(Error::DeadEnd { token }) => assert_eq!(token, "blue"),
			other => panic!("expected a dead end, got {other:?}"),
		}
	}

	#[test]
	fn zero_weight_distances_are_not_walked() {
		let graph = Graph::from_text("x y", weights(&[(1, 0.0), (-1, 1.0)])).unwrap();
		let mut rng = seeded_rng(1);
		let x = graph.find("x").unwrap();
		assert!(matches!(graph.pick_next(&mut rng, x), Err(Error::DeadEnd { .. })));
	}

	#[test]
	fn pick_start_covers_every_node() {
		let graph = Graph::from_text("a b c d", weights(&[(1, 1.0)])).unwrap();
		let mut rng = seeded_rng(8);
		let mut seen = vec![false; graph.len()];
		for _ in 0..500 {
			seen[graph.pick_start(&mut rng).unwrap().index()] = true;
		}
		assert!(seen.into_iter().all(|s| s));
	}

	#[test]
	fn snapshot_is_reused_for_equal_weights() {
		let dir = tempfile::tempdir().unwrap();
		let source = dir.path().join("poem.txt");
		fs::write(&source, "the sea , the sea .").unwrap();

		let built = Graph::load_or_build(&source, DistanceWeights::default()).unwrap();
		assert!(dir.path().join("poem.graph.bin").exists());
		let loaded = Graph::load_or_build(&source, DistanceWeights::default()).unwrap();
		assert_eq!(built, loaded);

		let other = Graph::load_or_build(&source, weights(&[(1, 1.0)])).unwrap();
		assert_eq!(other.distance_weights(), &weights(&[(1, 1.0)]));
	}

	#[test]
	fn missing_source_is_a_resource_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = Graph::from_file(dir.path().join("nope.txt"), DistanceWeights::default()).unwrap_err();
		assert!(matches!(err, Error::Resource { .. }));
	}
}
