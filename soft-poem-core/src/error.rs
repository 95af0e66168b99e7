use std::io;
use std::path::PathBuf;

/// Errors surfaced by poem construction and rendering.
///
/// Sampling never retries: every variant is a hard failure for the poem
/// being rendered, except `DeadEnd`, which the walker turns into a restart
/// or a truncation depending on its policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A weight table with no entries was handed to the sampler.
	#[error("weight table is empty")]
	EmptyWeightTable,

	/// Every weight in the table is zero.
	#[error("weight table has no positive weight")]
	ZeroTotalWeight,

	/// A weight is negative, NaN or infinite.
	#[error("invalid weight {weight}")]
	InvalidWeight { weight: f64 },

	/// Any other malformed parameter (probabilities out of range, bad bounds).
	#[error("invalid configuration: {0}")]
	Config(String),

	/// The source text tokenized to nothing.
	#[error("source text contains no tokens, no graph can be built")]
	EmptyGraph,

	/// The current node has no reachable neighbour under the distance weights.
	#[error("token {token:?} has no reachable neighbour")]
	DeadEnd { token: String },

	/// A source text could not be read.
	#[error("failed to read source text {}: {source}", path.display())]
	Resource {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("snapshot encoding failed: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("malformed configuration file: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl Error {
	/// True for the errors caused by bad parameters rather than bad input text.
	pub fn is_config(&self) -> bool {
		matches!(
			self,
			Error::EmptyWeightTable | Error::ZeroTotalWeight | Error::InvalidWeight { .. } | Error::Config(_)
		)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
