use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::markov::{DeadEndPolicy, DistanceWeights};
use crate::sampling::WeightTable;

/// Stored parameters of one poem, as written in a book configuration.
///
/// Every table is optional; a missing one is replaced by a fresh copy of its
/// default when the poem is built, so poems never share a table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoemSpec {
	/// Stable identity, never changed by random processes.
	pub immutable_id: u64,
	/// Display name. Defaults to the id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Source text, relative to the book's source directory.
	pub filename: PathBuf,
	/// Probability in `[0, 1]` that a render walks the graph instead of
	/// showing the text verbatim.
	#[serde(default)]
	pub mutable_chance: f64,
	/// Higher values (relative to other poems) make the poem likelier to
	/// appear early in a book.
	#[serde(default)]
	pub position_weight: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distance_weights: Option<DistanceWeights>,
	/// Number of words of a mutated rendition.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub word_count_weights: Option<WeightTable>,
	/// Space before the poem, in em's. Resolved once per poem.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gap_before_weights: Option<WeightTable>,
	/// Left padding, in device-width %. Resolved once per poem.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub left_pad_weights: Option<WeightTable>,
	/// Probability of a horizontal gap between two words. Resolved once per poem.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x_gap_freq_weights: Option<WeightTable>,
	/// Width of horizontal gaps, in em's.
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "x_gap_weights")]
	pub x_gap_length_weights: Option<WeightTable>,
	/// Height of `|||` breaks, in em's.
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "y_gap_weights")]
	pub y_gap_height_weights: Option<WeightTable>,
	/// Length of `---` dashes, in em's.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dash_length_weights: Option<WeightTable>,
	#[serde(default)]
	pub dead_end_policy: DeadEndPolicy,
}

impl PoemSpec {
	/// A poem with every parameter left to its default.
	pub fn new(immutable_id: u64, filename: impl Into<PathBuf>) -> Self {
		Self {
			immutable_id,
			name: None,
			filename: filename.into(),
			mutable_chance: 0.0,
			position_weight: 0.0,
			distance_weights: None,
			word_count_weights: None,
			gap_before_weights: None,
			left_pad_weights: None,
			x_gap_freq_weights: None,
			x_gap_length_weights: None,
			y_gap_height_weights: None,
			dash_length_weights: None,
			dead_end_policy: DeadEndPolicy::default(),
		}
	}
}

/// Default tables. Each call returns a new table.
pub mod defaults {
	use super::*;

	pub fn distance_weights() -> DistanceWeights {
		DistanceWeights::default()
	}

	pub fn word_count_weights() -> WeightTable {
		WeightTable::new(vec![(10.0, 0.0), (60.0, 4.0), (100.0, 10.0), (130.0, 3.0), (500.0, 0.0)])
	}

	pub fn gap_before_weights() -> WeightTable {
		WeightTable::new(vec![(1.0, 3.0), (3.0, 5.0), (6.0, 10.0), (30.0, 2.0)])
	}

	pub fn left_pad_weights() -> WeightTable {
		WeightTable::new(vec![(0.0, 10.0), (20.0, 2.0), (40.0, 0.0)])
	}

	pub fn x_gap_freq_weights() -> WeightTable {
		WeightTable::new(vec![(0.05, 1.0), (0.12, 5.0)])
	}

	pub fn x_gap_length_weights() -> WeightTable {
		WeightTable::new(vec![(0.0, 100.0), (5.0, 20.0), (9.0, 6.0), (30.0, 0.0)])
	}

	pub fn y_gap_height_weights() -> WeightTable {
		WeightTable::new(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 10.0), (4.0, 1.0), (10.0, 0.0)])
	}

	pub fn dash_length_weights() -> WeightTable {
		WeightTable::new(vec![(0.5, 25.0), (2.0, 1.0), (10.0, 0.0)])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn minimal_json_uses_defaults() {
		let spec: PoemSpec = serde_json::from_str(r#"{"immutable_id": 3, "filename": "three.txt"}"#).unwrap();
		assert_eq!(spec, PoemSpec::new(3, "three.txt"));
	}

	#[test]
	fn legacy_gap_names_are_accepted() {
		let spec: PoemSpec = serde_json::from_str(
			r#"{"immutable_id": 1, "filename": "a.txt", "x_gap_weights": [[0, 1]], "y_gap_weights": [[2, 1]]}"#,
		)
		.unwrap();
		assert_eq!(spec.x_gap_length_weights, Some(WeightTable::new(vec![(0.0, 1.0)])));
		assert_eq!(spec.y_gap_height_weights, Some(WeightTable::new(vec![(2.0, 1.0)])));
	}

	#[test]
	fn dead_end_policy_is_snake_case() {
		let spec: PoemSpec =
			serde_json::from_str(r#"{"immutable_id": 1, "filename": "a.txt", "dead_end_policy": "truncate"}"#).unwrap();
		assert_eq!(spec.dead_end_policy, DeadEndPolicy::Truncate);
	}
}
