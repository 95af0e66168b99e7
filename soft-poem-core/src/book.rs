use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::io::{build_output_path, read_snapshot, resolve_beside, snapshot_is_fresh, write_snapshot};
use crate::poem::{Poem, PoemSpec};
use crate::sampling::{seeded_rng, weighted_order};

fn default_source_dir() -> PathBuf {
	PathBuf::from("texts")
}

/// A book configuration file: where the texts live and how each poem behaves.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BookConfig {
	/// Directory holding the source texts. Relative paths are resolved
	/// against the configuration file's directory by `from_file`.
	#[serde(default = "default_source_dir")]
	pub source_dir: PathBuf,
	/// Keep a graph snapshot beside every source text.
	#[serde(default)]
	pub cache_graphs: bool,
	pub poems: Vec<PoemSpec>,
}

impl BookConfig {
	/// Reads a JSON book configuration.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let mut config: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
		config.source_dir = resolve_beside(path, &config.source_dir);
		Ok(config)
	}

	pub fn to_json_pretty(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

/// One poem of a rendered book, ready for a page template.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RenderedPoem {
	pub immutable_id: u64,
	pub name: String,
	/// Space before the poem, in em's.
	pub gap_before: f64,
	/// Left padding, in device-width %.
	pub left_pad: f64,
	/// Concatenated `poem-line` blocks.
	pub body: String,
}

/// The set of poems rendered together.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Book {
	poems: Vec<Poem>,
}

impl Book {
	/// Builds every poem of `config`, in configuration order.
	pub fn from_config<R: Rng + ?Sized>(config: &BookConfig, rng: &mut R) -> Result<Self> {
		let poems = config
			.poems
			.iter()
			.map(|spec| Ok(Poem::new(spec.clone(), &config.source_dir, rng)?.with_graph_cache(config.cache_graphs)))
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { poems })
	}

	/// Loads the book snapshot stored beside the configuration file, or
	/// builds the book from the configuration and stores a snapshot.
	///
	/// - The snapshot lives at `<stem>.bin` and is encoded with `postcard`.
	/// - While the snapshot is reused, every poem keeps the per-rendition
	///   constants it was first built with; editing the configuration
	///   invalidates it.
	/// - `rng` is only drawn from when the book has to be built.
	pub fn load_or_build<P: AsRef<Path>, R: Rng + ?Sized>(config_path: P, rng: &mut R) -> Result<Self> {
		let config_path = config_path.as_ref();
		let snapshot_path = build_output_path(config_path, "bin")?;

		if snapshot_is_fresh(config_path, &snapshot_path) {
			match read_snapshot::<Book, _>(&snapshot_path) {
				Ok(Some(book)) => {
					debug!(path = %snapshot_path.display(), poems = book.poems.len(), "loaded book snapshot");
					return Ok(book);
				}
				Ok(None) => (),
				Err(e) => warn!(path = %snapshot_path.display(), error = %e, "discarding unreadable book snapshot"),
			}
		}

		let book = Self::from_config(&BookConfig::from_file(config_path)?, rng)?;
		match write_snapshot(&snapshot_path, &book) {
			Ok(()) => info!(path = %snapshot_path.display(), "wrote book snapshot"),
			Err(e) => warn!(path = %snapshot_path.display(), error = %e, "could not write book snapshot"),
		}
		Ok(book)
	}

	pub fn poems(&self) -> &[Poem] {
		&self.poems
	}

	/// Orders the poems by weighted sampling on their position weight.
	pub fn ordered<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<&Poem>> {
		weighted_order(rng, self.poems.iter().map(|poem| (poem, poem.position_weight())).collect())
	}

	/// Orders then renders every poem, drawing everything from `rng`.
	pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<RenderedPoem>> {
		let ordered = self.ordered(rng)?;
		ordered
			.into_iter()
			.map(|poem| {
				Ok(RenderedPoem {
					immutable_id: poem.immutable_id(),
					name: poem.name().to_owned(),
					gap_before: poem.gap_before(),
					left_pad: poem.left_pad(),
					body: poem.get(rng)?,
				})
			})
			.collect()
	}

	/// Renders one version of the book; the same seed always gives the same book.
	pub fn render_seeded(&self, seed: u64) -> Result<Vec<RenderedPoem>> {
		info!(seed, poems = self.poems.len(), "rendering book");
		self.render(&mut seeded_rng(seed))
	}
}
