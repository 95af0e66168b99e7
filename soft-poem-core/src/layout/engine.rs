use rand::Rng;

use super::fragment::{Fragment, RenderedLine};
use crate::error::{Error, Result};
use crate::sampling::{WeightTable, prob_bool, weighted_rand};

/// Token replaced by a variable length dash.
pub const DASH_SENTINEL: &str = "---";

/// Token replaced by a variable height break.
pub const BREAK_SENTINEL: &str = "|||";

/// Visible characters a line may hold before the next token starts a new one.
pub const CUTOFF_CHAR_LENGTH: usize = 20;

/// Marks attached to the previous fragment without a space.
pub const PUNCTUATIONS: [&str; 7] = [",", ".", ":", "!", "?", "\"", ";"];

/// Parameters of one layout pass, borrowed from the poem being rendered.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSettings<'a> {
	pub cutoff_char_length: usize,
	/// Probability of a horizontal gap before any given token.
	pub x_gap_freq: f64,
	pub x_gap_length_weights: &'a WeightTable,
	pub y_gap_height_weights: &'a WeightTable,
	pub dash_length_weights: &'a WeightTable,
}

impl LayoutSettings<'_> {
	fn validate(&self) -> Result<()> {
		if !(0.0..=1.0).contains(&self.x_gap_freq) {
			return Err(Error::Config(format!("x_gap_freq must be within [0, 1], got {}", self.x_gap_freq)));
		}
		Ok(())
	}
}

/// Lays a word list out into lines.
///
/// For every token, in order:
/// - `---` becomes a `Dash` and `|||` a `Break`, sized by a draw from their
///   tables; anything else is `Text` and counts towards the visible length
/// - a `HorizontalGap` is inserted before the token with probability `x_gap_freq`
/// - once the visible length exceeds the cutoff, the current line is closed
///   and the token opens the next one
/// - the token gets a leading `Space` unless it is a punctuation mark
///
/// The visible count restarts at zero on every new line, so the token that
/// opened it is not counted there. An empty line is never emitted.
pub fn render_lines<R, S>(rng: &mut R, words: &[S], settings: &LayoutSettings<'_>) -> Result<Vec<RenderedLine>>
where
	R: Rng + ?Sized,
	S: AsRef<str>,
{
	settings.validate()?;

	let mut visible_char_count = 0usize;
	let mut lines = Vec::new();
	let mut current_line = RenderedLine::new();

	for word in words {
		let word = word.as_ref();
		let fragment = match word {
			DASH_SENTINEL => Fragment::Dash(weighted_rand(rng, settings.dash_length_weights, false)?),
			BREAK_SENTINEL => Fragment::Break(weighted_rand(rng, settings.y_gap_height_weights, false)?),
			_ => {
				visible_char_count += word.chars().count();
				Fragment::Text(word.to_owned())
			}
		};

		// Roll for a horizontal gap before the token
		let gap = if prob_bool(rng, settings.x_gap_freq) {
			Some(Fragment::HorizontalGap(weighted_rand(rng, settings.x_gap_length_weights, false)?))
		} else {
			None
		};

		if visible_char_count > settings.cutoff_char_length {
			visible_char_count = 0;
			if !current_line.is_empty() {
				lines.push(std::mem::take(&mut current_line));
			}
		}

		if !PUNCTUATIONS.contains(&word) {
			current_line.push(Fragment::Space);
		}
		if let Some(gap) = gap {
			current_line.push(gap);
		}
		current_line.push(fragment);
	}

	if !current_line.is_empty() {
		lines.push(current_line);
	}

	Ok(lines)
}

/// Lays a word list out and renders it as concatenated `poem-line` blocks.
pub fn render_markups<R, S>(rng: &mut R, words: &[S], settings: &LayoutSettings<'_>) -> Result<String>
where
	R: Rng + ?Sized,
	S: AsRef<str>,
{
	let lines = render_lines(rng, words, settings)?;
	Ok(lines_to_markup(&lines))
}

/// Concatenates rendered lines with no separator.
pub fn lines_to_markup(lines: &[RenderedLine]) -> String {
	lines.iter().map(ToString::to_string).collect()
}
