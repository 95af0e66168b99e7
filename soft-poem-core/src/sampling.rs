use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Generator threaded through every render.
///
/// One instance per render: sharing it between renders would interleave
/// their draws and break seed reproducibility.
pub type PoemRng = StdRng;

/// Creates the generator for one top-level render.
pub fn seeded_rng(seed: u64) -> PoemRng {
	StdRng::seed_from_u64(seed)
}

/// Half-width of the support of `normal_distribution`, in standard deviations.
const NORMAL_SPREAD: f64 = 5.0;

/// Number of sample points of a continuous `normal_distribution`.
const NORMAL_SAMPLE_COUNT: usize = 23;

/// Widest integer support a discretized `normal_distribution` may produce.
const MAX_DISCRETE_POINTS: i64 = 100_000;

/// Ordered `(value, weight)` pairs describing a discrete distribution.
///
/// Serialized as a plain list of `[value, weight]` pairs. Weights are only
/// checked when sampled, so a malformed table loaded from configuration
/// fails at the first draw with a configuration error.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct WeightTable(Vec<(f64, f64)>);

impl WeightTable {
	pub fn new(pairs: Vec<(f64, f64)>) -> Self {
		Self(pairs)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
		self.0.iter()
	}

	/// Returns the declared values, in table order.
	pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
		self.0.iter().map(|(value, _)| *value)
	}
}

impl From<&[(f64, f64)]> for WeightTable {
	fn from(pairs: &[(f64, f64)]) -> Self {
		Self(pairs.to_vec())
	}
}

impl From<Vec<(f64, f64)>> for WeightTable {
	fn from(pairs: Vec<(f64, f64)>) -> Self {
		Self(pairs)
	}
}

/// Picks an index with probability proportional to its weight.
///
/// This method performs:
/// - a validation pass summing the weights
/// - a cumulative scan returning the first index whose running total exceeds
///   a uniform draw in `[0, total)`
///
/// # Errors
/// - `EmptyWeightTable` when there are no weights
/// - `InvalidWeight` for a negative or non-finite weight
/// - `ZeroTotalWeight` when every weight is zero
pub fn weighted_index<R, I>(rng: &mut R, weights: I) -> Result<usize>
where
	R: Rng + ?Sized,
	I: IntoIterator<Item = f64>,
	I::IntoIter: Clone,
{
	let weights = weights.into_iter();

	let mut total = 0.0;
	let mut count = 0usize;
	for weight in weights.clone() {
		if !weight.is_finite() || weight < 0.0 {
			return Err(Error::InvalidWeight { weight });
		}
		total += weight;
		count += 1;
	}
	if count == 0 {
		return Err(Error::EmptyWeightTable);
	}
	if total <= 0.0 {
		return Err(Error::ZeroTotalWeight);
	}
	if !total.is_finite() {
		return Err(Error::InvalidWeight { weight: total });
	}

	let r = rng.random::<f64>() * total;

	let mut running = 0.0;
	let mut fallback = None;
	for (index, weight) in weights.enumerate() {
		if weight > 0.0 {
			fallback = Some(index);
		}
		running += weight;
		if running > r {
			return Ok(index);
		}
	}

	// Round-off can leave `r` a hair above the final running total.
	fallback.ok_or(Error::ZeroTotalWeight)
}

/// Draws one value from `table`, proportionally to its weight.
///
/// When `round_result` is set the chosen value is rounded to the nearest
/// integer (half away from zero).
pub fn weighted_rand<R: Rng + ?Sized>(rng: &mut R, table: &WeightTable, round_result: bool) -> Result<f64> {
	let index = weighted_index(rng, table.0.iter().map(|(_, weight)| *weight))?;
	let value = table.0[index].0;
	Ok(if round_result { value.round() } else { value })
}

/// Draws one item from weighted `(item, weight)` pairs.
pub fn weighted_choice<'a, R, T>(rng: &mut R, items: &'a [(T, f64)]) -> Result<&'a T>
where
	R: Rng + ?Sized,
{
	let index = weighted_index(rng, items.iter().map(|(_, weight)| *weight))?;
	Ok(&items[index].0)
}

/// Returns `true` with probability `p`.
///
/// Always consumes exactly one draw, so the stream position does not depend
/// on `p`. `p <= 0` is never true, `p >= 1` always is.
pub fn prob_bool<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
	rng.random::<f64>() < p
}

/// Builds a weight table approximating a Gaussian clipped to `[min, max]`.
///
/// The support is `mean ± 5·stddev` intersected with the bounds. When that
/// window misses the bounds entirely, the whole `[min, max]` range is used,
/// or a window of the same width sliding onto the only finite bound, so the
/// tail of the curve is still represented.
///
/// - Continuous: 23 evenly spaced points across the support.
/// - Discretized: every integer in the support.
///
/// Weights are `exp(-((v - mean)² - d²) / (2·stddev²))` with `d` the distance
/// from the mean to the support, i.e. the Gaussian density rescaled so the
/// heaviest point weighs 1.
///
/// # Errors
/// Returns `Error::Config` for a non-positive `stddev`, inverted bounds, or a
/// discretized support containing no integer.
pub fn normal_distribution(mean: f64, stddev: f64, min: f64, max: f64, discretize: bool) -> Result<WeightTable> {
	if !mean.is_finite() || !stddev.is_finite() || stddev <= 0.0 {
		return Err(Error::Config(format!(
			"normal distribution needs a finite mean and a positive stddev, got mean={mean}, stddev={stddev}"
		)));
	}
	if min.is_nan() || max.is_nan() || min > max {
		return Err(Error::Config(format!("normal distribution bounds are inverted: [{min}, {max}]")));
	}

	let spread = NORMAL_SPREAD * stddev;
	let misses = mean + spread < min || mean - spread > max;
	let (lower, upper) = if misses && min.is_finite() && max.is_finite() {
		(min, max)
	} else if mean + spread < min {
		(min, max.min(min + 2.0 * spread))
	} else if mean - spread > max {
		(min.max(max - 2.0 * spread), max)
	} else {
		((mean - spread).max(min), (mean + spread).min(max))
	};

	let nearest = mean.clamp(lower, upper);
	let offset = (nearest - mean).powi(2);
	let weight_at = |v: f64| (-((v - mean).powi(2) - offset) / (2.0 * stddev * stddev)).exp();

	let mut pairs = Vec::new();
	if discretize {
		let start = lower.ceil() as i64;
		let end = upper.floor() as i64;
		if start > end {
			return Err(Error::Config(format!("no integer lies within [{lower}, {upper}]")));
		}
		if end - start > MAX_DISCRETE_POINTS {
			return Err(Error::Config(format!("integer support [{start}, {end}] is too wide")));
		}
		for v in start..=end {
			let v = v as f64;
			pairs.push((v, weight_at(v)));
		}
	} else if lower == upper {
		pairs.push((lower, 1.0));
	} else {
		let step = (upper - lower) / (NORMAL_SAMPLE_COUNT - 1) as f64;
		for i in 0..NORMAL_SAMPLE_COUNT {
			let v = if i == NORMAL_SAMPLE_COUNT - 1 { upper } else { lower + step * i as f64 };
			pairs.push((v, weight_at(v)));
		}
	}

	Ok(WeightTable(pairs))
}

/// Returns every item, ordered by repeated weighted sampling without replacement.
///
/// Heavier items tend to come first. Once every remaining weight is zero the
/// rest are drawn uniformly, so zero-weight items still appear.
///
/// # Errors
/// Returns `InvalidWeight` for a negative or non-finite weight.
pub fn weighted_order<R, T>(rng: &mut R, items: Vec<(T, f64)>) -> Result<Vec<T>>
where
	R: Rng + ?Sized,
{
	if let Some((_, weight)) = items.iter().find(|(_, weight)| !weight.is_finite() || *weight < 0.0) {
		return Err(Error::InvalidWeight { weight: *weight });
	}

	let mut remaining = items;
	let mut ordered = Vec::with_capacity(remaining.len());
	while !remaining.is_empty() {
		let total: f64 = remaining.iter().map(|(_, weight)| *weight).sum();
		let index = if total > 0.0 {
			weighted_index(rng, remaining.iter().map(|(_, weight)| *weight))?
		} else {
			rng.random_range(0..remaining.len())
		};
		ordered.push(remaining.remove(index).0);
	}
	Ok(ordered)
}
