use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::graph::Graph;
use super::node::NodeId;
use crate::error::{Error, Result};

/// What a walk does when the current node has nowhere to go.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadEndPolicy {
	/// Jump to a fresh start node and keep walking.
	#[default]
	Restart,
	/// Stop and return the words produced so far.
	Truncate,
}

/// Cursor walking a `Graph` one token at a time.
///
/// The first step picks a start node, each later step follows a weighted
/// edge from the previous node.
pub struct Walker<'g> {
	graph: &'g Graph,
	current: Option<NodeId>,
	policy: DeadEndPolicy,
}

impl<'g> Walker<'g> {
	pub fn new(graph: &'g Graph) -> Self {
		Self::with_policy(graph, DeadEndPolicy::default())
	}

	pub fn with_policy(graph: &'g Graph, policy: DeadEndPolicy) -> Self {
		Self { graph, current: None, policy }
	}

	/// Advances the walk by one token.
	///
	/// Returns `Ok(None)` when a dead end is hit under `DeadEndPolicy::Truncate`.
	pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<&'g str>> {
		let graph = self.graph;
		let next = match self.current {
			None => graph.pick_start(rng)?,
			Some(current) => match graph.pick_next(rng, current) {
				Ok(next) => next,
				Err(Error::DeadEnd { token }) => match self.policy {
					DeadEndPolicy::Restart => {
						debug!(token = %token, isolated = graph.node(current).is_isolated(), "walk hit a dead end, restarting");
						graph.pick_start(rng)?
					}
					DeadEndPolicy::Truncate => {
						debug!(token = %token, isolated = graph.node(current).is_isolated(), "walk hit a dead end, truncating");
						return Ok(None);
					}
				},
				Err(e) => return Err(e),
			},
		};
		self.current = Some(next);
		Ok(Some(graph.token(next)))
	}

	/// Produces `count` tokens, or fewer if truncated at a dead end.
	pub fn walk<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Result<Vec<String>> {
		let mut words = Vec::with_capacity(count.min(self.graph.len().saturating_mul(4)));
		for _ in 0..count {
			match self.step(rng)? {
				Some(word) => words.push(word.to_owned()),
				None => break,
			}
		}
		Ok(words)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::markov::DistanceWeights;
	use crate::sampling::seeded_rng;
	use std::collections::BTreeMap;

	fn forward_only() -> DistanceWeights {
		DistanceWeights::new(BTreeMap::from([(1, 1.0)])).unwrap()
	}

	#[test]
	fn walk_produces_the_requested_count() {
		let graph = Graph::from_text("a b c d e f", DistanceWeights::default()).unwrap();
		let mut rng = seeded_rng(4);
		let words = Walker::new(&graph).walk(&mut rng, 37).unwrap();
		assert_eq!(words.len(), 37);
		assert!(words.iter().all(|w| graph.find(w).is_some()));
	}

	#[test]
	fn restart_keeps_walking_through_dead_ends() {
		let graph = Graph::from_text("only", forward_only()).unwrap();
		assert!(graph.node(graph.find("only").unwrap()).is_isolated());
		let mut rng = seeded_rng(4);
		let words = Walker::new(&graph).walk(&mut rng, 5).unwrap();
		assert_eq!(words, vec!["only"; 5]);
	}

	#[test]
	fn truncate_stops_at_the_first_dead_end() {
		let graph = Graph::from_text("one two three", forward_only()).unwrap();
		let mut rng = seeded_rng(9);
		let words = Walker::with_policy(&graph, DeadEndPolicy::Truncate).walk(&mut rng, 50).unwrap();
		assert!(!words.is_empty() && words.len() <= 3);
		assert_eq!(words.last().map(String::as_str), Some("three"));
	}

	#[test]
	fn forward_chain_reproduces_the_source_order() {
		let graph = Graph::from_text("w1 w2 w3 w4", forward_only()).unwrap();
		let mut rng = seeded_rng(0);
		let mut walker = Walker::with_policy(&graph, DeadEndPolicy::Truncate);
		let words = walker.walk(&mut rng, 10).unwrap();
		let start = words[0].trim_start_matches('w').parse::<usize>().unwrap();
		let expected: Vec<String> = (start..=4).map(|i| format!("w{i}")).collect();
		assert_eq!(words, expected);
	}

	#[test]
	fn huge_count_does_not_preallocate() {
		let graph = Graph::from_text("one two three", forward_only()).unwrap();
		let mut rng = seeded_rng(9);
		let words = Walker::with_policy(&graph, DeadEndPolicy::Truncate).walk(&mut rng, usize::MAX).unwrap();
		assert!(words.len() <= 3);
	}

	#[test]
	fn zero_count_draws_nothing() {
		let graph = Graph::from_text("a b", forward_only()).unwrap();
		let mut rng = seeded_rng(1);
		assert!(Walker::new(&graph).walk(&mut rng, 0).unwrap().is_empty());
	}
}
