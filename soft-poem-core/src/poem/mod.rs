//! Poem configuration and rendering.
//!
//! A `PoemSpec` is the stored, hand-editable description of a poem. Building
//! a `Poem` from it resolves the per-rendition constants; each call to
//! `Poem::get` then either walks a fresh word graph or shows the source
//! verbatim, and lays the words out.

/// Stored poem parameters and their defaults.
pub mod config;

/// Generation of persistent poem behaviours.
pub mod profile;

/// The renderable poem.
pub mod soft_poem;

pub use config::{PoemSpec, defaults};
pub use profile::{profile_poem, profile_poems};
pub use soft_poem::{Poem, Source};
