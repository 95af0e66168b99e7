//! Generation of the persistent behaviours of a set of poems.
//!
//! Poems are entered by hand with a coarse `mutable_chance` (0, 0.5 or 1)
//! and a rough `position_weight`. Profiling turns those into the stored
//! parameters the renderer uses: a refined mutability, a jittered position
//! weight, a random distance-weight table and a gap-frequency curve. It only
//! needs to run again when a new set of behaviours is wanted.

use std::collections::BTreeMap;

use rand::Rng;

use super::config::PoemSpec;
use crate::error::Result;
use crate::markov::DistanceWeights;
use crate::sampling::{WeightTable, normal_distribution, weighted_rand};

/// Fewest and most distance keys drawn for one poem.
const DISTANCE_KEY_COUNT: (usize, usize) = (10, 20);

/// Refines a hand-entered mutability class into a probability.
///
/// - `0`: almost always verbatim
/// - `0.5`: anywhere, centred on even odds
/// - anything else: almost always mutated
pub fn profile_mutable_chance<R: Rng + ?Sized>(rng: &mut R, base: f64) -> Result<f64> {
	if base == 0.0 {
		weighted_rand(rng, &WeightTable::new(vec![(0.0, 100.0), (0.03, 10.0), (0.15, 0.0)]), false)
	} else if base == 0.5 {
		weighted_rand(rng, &normal_distribution(0.5, 0.8, 0.0, 1.0, false)?, false)
	} else {
		weighted_rand(rng, &WeightTable::new(vec![(0.85, 0.0), (0.9, 10.0), (1.0, 100.0)]), false)
	}
}

/// Jitters a position weight around its hand-entered value, never below zero.
pub fn profile_position_weight<R: Rng + ?Sized>(rng: &mut R, base: f64) -> Result<f64> {
	weighted_rand(rng, &normal_distribution(base, 3.0, 0.0, f64::INFINITY, false)?, false)
}

/// Draws a random distance-weight table.
///
/// Keys cluster around 4 with a wide spread; each key's weight centres on
/// `20 - |2 - key|`. Distance 1 is then forced to dominate.
pub fn profile_distance_weights<R: Rng + ?Sized>(rng: &mut R) -> Result<DistanceWeights> {
	let key_curve = normal_distribution(4.0, 30.0, f64::NEG_INFINITY, f64::INFINITY, true)?;
	let key_count = rng.random_range(DISTANCE_KEY_COUNT.0..=DISTANCE_KEY_COUNT.1);

	let mut keys = Vec::with_capacity(key_count);
	for _ in 0..key_count {
		keys.push(weighted_rand(rng, &key_curve, true)? as i64);
	}

	let mut weights = BTreeMap::new();
	for key in keys {
		let centre = 20.0 - (2 - key).abs() as f64;
		let weight = weighted_rand(rng, &normal_distribution(centre, 5.0, 0.0, f64::INFINITY, false)?, false)?;
		weights.insert(key, weight);
	}

	Ok(DistanceWeights::new(weights)?.with_forward_bias())
}

/// Probability curve for the per-poem horizontal gap frequency.
///
/// Mostly close to zero, occasionally a little higher.
pub fn x_gap_freq_curve() -> Result<WeightTable> {
	normal_distribution(-1.0, 0.23, 0.0, 1.0, false)
}

/// Fills in the generated parameters of one poem.
pub fn profile_poem<R: Rng + ?Sized>(rng: &mut R, base: &PoemSpec) -> Result<PoemSpec> {
	let mut spec = base.clone();
	spec.mutable_chance = profile_mutable_chance(rng, base.mutable_chance)?;
	spec.position_weight = profile_position_weight(rng, base.position_weight)?;
	spec.distance_weights = Some(profile_distance_weights(rng)?);
	spec.x_gap_freq_weights = Some(x_gap_freq_curve()?);
	Ok(spec)
}

/// Profiles every poem, in order.
pub fn profile_poems<R: Rng + ?Sized>(rng: &mut R, poems: &[PoemSpec]) -> Result<Vec<PoemSpec>> {
	poems.iter().map(|poem| profile_poem(rng, poem)).collect()
}
