use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{PoemSpec, defaults};
use crate::error::{Error, Result};
use crate::io::read_source;
use crate::layout::{CUTOFF_CHAR_LENGTH, LayoutSettings, RenderedLine, lines_to_markup, render_lines};
use crate::markov::{DeadEndPolicy, DistanceWeights, Graph, Walker, tokenize};
use crate::sampling::{WeightTable, prob_bool, weighted_rand};

/// Where a poem's source text comes from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Source {
	/// Read from disk on every render.
	File(PathBuf),
	/// Held in memory.
	Inline(String),
}

/// A poem with stochastic contents.
///
/// Built once from a `PoemSpec`. Construction resolves the per-rendition
/// constants (`gap_before`, `left_pad`, `x_gap_freq`); every other table is
/// sampled again on each render.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Poem {
	immutable_id: u64,
	name: String,
	source: Source,
	mutable_chance: f64,
	position_weight: f64,
	distance_weights: DistanceWeights,
	word_count_weights: WeightTable,
	x_gap_length_weights: WeightTable,
	y_gap_height_weights: WeightTable,
	dash_length_weights: WeightTable,
	dead_end_policy: DeadEndPolicy,
	gap_before: f64,
	left_pad: f64,
	x_gap_freq: f64,
	cache_graph: bool,
}

impl Poem {
	/// Builds a poem whose source lives at `source_dir/spec.filename`.
	///
	/// The file is not read until the poem is rendered.
	///
	/// # Errors
	/// Returns a configuration error if a probability is outside `[0, 1]` or a
	/// table cannot be sampled.
	pub fn new<R: Rng + ?Sized>(spec: PoemSpec, source_dir: &Path, rng: &mut R) -> Result<Self> {
		let source = Source::File(source_dir.join(&spec.filename));
		Self::from_parts(spec, source, rng)
	}

	/// Builds a poem over an in-memory source text.
	pub fn with_text<R: Rng + ?Sized>(spec: PoemSpec, text: impl Into<String>, rng: &mut R) -> Result<Self> {
		Self::from_parts(spec, Source::Inline(text.into()), rng)
	}

	fn from_parts<R: Rng + ?Sized>(spec: PoemSpec, source: Source, rng: &mut R) -> Result<Self> {
		check_probability("mutable_chance", spec.mutable_chance)?;
		let distance_weights = spec.distance_weights.unwrap_or_else(defaults::distance_weights);
		distance_weights.validate()?;

		// Per-rendition constants, drawn in this order
		let gap_before = weighted_rand(rng, &spec.gap_before_weights.unwrap_or_else(defaults::gap_before_weights), false)?;
		let left_pad = weighted_rand(rng, &spec.left_pad_weights.unwrap_or_else(defaults::left_pad_weights), false)?;
		let x_gap_freq = weighted_rand(rng, &spec.x_gap_freq_weights.unwrap_or_else(defaults::x_gap_freq_weights), false)?;
		check_probability("x_gap_freq", x_gap_freq)?;
		let word_count_weights = spec.word_count_weights.unwrap_or_else(defaults::word_count_weights);
		for value in word_count_weights.values() {
			checked_word_count(value)?;
		}

		Ok(Self {
			name: spec.name.unwrap_or_else(|| spec.immutable_id.to_string()),
			immutable_id: spec.immutable_id,
			source,
			mutable_chance: spec.mutable_chance,
			position_weight: spec.position_weight,
			distance_weights,
			word_count_weights,
			x_gap_length_weights: spec.x_gap_length_weights.unwrap_or_else(defaults::x_gap_length_weights),
			y_gap_height_weights: spec.y_gap_height_weights.unwrap_or_else(defaults::y_gap_height_weights),
			dash_length_weights: spec.dash_length_weights.unwrap_or_else(defaults::dash_length_weights),
			dead_end_policy: spec.dead_end_policy,
			gap_before,
			left_pad,
			x_gap_freq,
			cache_graph: false,
		})
	}

	/// Reuses a graph snapshot stored beside the source file across renders.
	///
	/// Has no effect on inline sources.
	pub fn with_graph_cache(mut self, enabled: bool) -> Self {
		self.cache_graph = enabled;
		self
	}

	pub fn immutable_id(&self) -> u64 {
		self.immutable_id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn source(&self) -> &Source {
		&self.source
	}

	pub fn mutable_chance(&self) -> f64 {
		self.mutable_chance
	}

	pub fn position_weight(&self) -> f64 {
		self.position_weight
	}

	/// Space before the poem, in em's.
	pub fn gap_before(&self) -> f64 {
		self.gap_before
	}

	/// Left padding, in device-width %.
	pub fn left_pad(&self) -> f64 {
		self.left_pad
	}

	pub fn x_gap_freq(&self) -> f64 {
		self.x_gap_freq
	}

	pub fn distance_weights(&self) -> &DistanceWeights {
		&self.distance_weights
	}

	pub fn layout_settings(&self) -> LayoutSettings<'_> {
		LayoutSettings {
			cutoff_char_length: CUTOFF_CHAR_LENGTH,
			x_gap_freq: self.x_gap_freq,
			x_gap_length_weights: &self.x_gap_length_weights,
			y_gap_height_weights: &self.y_gap_height_weights,
			dash_length_weights: &self.dash_length_weights,
		}
	}

	/// Renders the poem as concatenated `poem-line` blocks.
	pub fn get<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
		Ok(lines_to_markup(&self.render(rng)?))
	}

	/// Renders the poem as structured lines.
	pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<RenderedLine>> {
		let words = self.word_list(rng)?;
		render_lines(rng, &words, &self.layout_settings())
	}

	/// Decides between a mutated and a verbatim rendition and returns its words.
	///
	/// - Mutated: a word count is drawn, then a fresh graph is walked for that many words.
	/// - Verbatim: the source text split on whitespace.
	pub fn word_list<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>> {
		if prob_bool(rng, self.mutable_chance) {
			let word_count = checked_word_count(weighted_rand(rng, &self.word_count_weights, true)?)?;
			let graph = self.graph()?;
			debug!(poem = %self.name, word_count, "rendering mutated poem");
			Walker::with_policy(&graph, self.dead_end_policy).walk(rng, word_count)
		} else {
			debug!(poem = %self.name, "rendering verbatim poem");
			Ok(tokenize(&self.source_text()?))
		}
	}

	/// Builds the word graph of the source text.
	pub fn graph(&self) -> Result<Graph> {
		match &self.source {
			Source::File(path) if self.cache_graph => Graph::load_or_build(path, self.distance_weights.clone()),
			Source::File(path) => Graph::from_file(path, self.distance_weights.clone()),
			Source::Inline(text) => Graph::from_text(text, self.distance_weights.clone()),
		}
	}

	fn source_text(&self) -> Result<String> {
		match &self.source {
			Source::File(path) => read_source(path),
			Source::Inline(text) => Ok(text.clone()),
		}
	}
}

/// Longest mutated rendition, in words.
pub const MAX_WORD_COUNT: usize = 10_000;

/// Turns a drawn word count into a length. Negative counts clamp to zero.
fn checked_word_count(value: f64) -> Result<usize> {
	if !value.is_finite() || value > MAX_WORD_COUNT as f64 {
		return Err(Error::Config(format!("word count must be finite and at most {MAX_WORD_COUNT}, got {value}")));
	}
	Ok(value.max(0.0) as usize)
}

fn check_probability(name: &str, p: f64) -> Result<()> {
	if !(0.0..=1.0).contains(&p) {
		return Err(Error::Config(format!("{name} must be within [0, 1], got {p}")));
	}
	Ok(())
}
