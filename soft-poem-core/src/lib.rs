//! Stochastic poem generation library.
//!
//! This crate turns a fixed source text and a set of weighted parameters
//! into new, plausible-but-novel renditions of a poem:
//! - Weighted sampling primitives over an explicitly passed generator
//! - A word-adjacency graph weighted by token distance, and a walk over it
//! - A streaming layout engine inserting random gaps, dashes and breaks
//! - Poem and book configuration, with optional postcard snapshots
//!
//! Every random decision is drawn from a generator handed in by the caller:
//! the same seed and the same calls always give the same output.

/// Book assembly: configuration file, poem ordering and rendering.
pub mod book;

/// Error type shared by the whole crate.
pub mod error;

/// Layout of a word list into lines of markup.
pub mod layout;

/// Word graph construction and walking.
pub mod markov;

/// Poem configuration, rendering and profiling.
pub mod poem;

/// Weighted random draws.
pub mod sampling;

/// I/O utilities (source texts, snapshots, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use book::{Book, BookConfig, RenderedPoem};
pub use error::{Error, Result};
pub use poem::{Poem, PoemSpec};
pub use sampling::{PoemRng, seeded_rng};
