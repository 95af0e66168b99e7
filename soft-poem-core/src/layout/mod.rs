//! Stochastic layout of a word list into poem lines.

/// Line accumulation, sentinel replacement and random gaps.
pub mod engine;

/// Markup fragments and rendered lines.
pub mod fragment;

pub use engine::{
	BREAK_SENTINEL, CUTOFF_CHAR_LENGTH, DASH_SENTINEL, LayoutSettings, PUNCTUATIONS, lines_to_markup, render_lines,
	render_markups,
};
pub use fragment::{Fragment, RenderedLine};
