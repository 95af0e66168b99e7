use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weight of each signed token distance used when linking and walking the graph.
///
/// A positive distance `d` links a token to the one `d` places after it in
/// the source text; a negative distance links it to one appearing before it.
///
/// Stored in a `BTreeMap` so iteration order, and therefore every draw made
/// from it, is the same in every process.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct DistanceWeights(BTreeMap<i64, f64>);

impl DistanceWeights {
	/// Builds a validated table.
	///
	/// # Errors
	/// Returns an error if the table is empty or a weight is negative or not finite.
	pub fn new(weights: BTreeMap<i64, f64>) -> Result<Self> {
		let weights = Self(weights);
		weights.validate()?;
		Ok(weights)
	}

	/// Checks the invariants, for tables that arrived through deserialization.
	pub fn validate(&self) -> Result<()> {
		if self.0.is_empty() {
			return Err(Error::Config("distance weights need at least one entry".to_owned()));
		}
		if let Some(weight) = self.0.values().find(|w| !w.is_finite() || **w < 0.0) {
			return Err(Error::InvalidWeight { weight: *weight });
		}
		Ok(())
	}

	/// Forces distance 1 to `max(weights) * (entry_count * 0.75)`.
	///
	/// Words then mostly follow the word that follows them in the source
	/// text. The entry count includes distance 1 itself.
	pub fn with_forward_bias(mut self) -> Self {
		let max = self.0.values().copied().fold(0.0, f64::max);
		self.0.entry(1).or_insert(0.0);
		let count = self.0.len() as f64;
		self.0.insert(1, max * (count * 0.75));
		self
	}

	pub fn get(&self, distance: i64) -> Option<f64> {
		self.0.get(&distance).copied()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates `(distance, weight)` pairs in ascending distance order.
	pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
		self.0.iter().map(|(distance, weight)| (*distance, *weight))
	}
}

impl Default for DistanceWeights {
	fn default() -> Self {
		Self(BTreeMap::from([
			(-5, 30.0),
			(-2, 30.0),
			(1, 1000.0),
			(2, 40.0),
			(3, 20.0),
			(4, 10.0),
			(5, 10.0),
			(6, 15.0),
			(7, 10.0),
			(8, 10.0),
			(9, 8.0),
			(10, 5.0),
			(11, 2.0),
			(12, 2.0),
			(13, 5.0),
			(14, 5.0),
			(15, 50.0),
		]))
	}
}
