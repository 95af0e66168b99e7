use std::fmt;

/// Smallest unit of rendered poem markup.
///
/// Sizes are in em's.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
	/// Word separator.
	Space,
	/// Literal token.
	Text(String),
	/// Empty inline block of the given width, inserted at random between words.
	HorizontalGap(f64),
	/// Dash of the given length, from a `---` sentinel.
	Dash(f64),
	/// Vertical break of the given height, from a `|||` sentinel.
	Break(f64),
}

impl fmt::Display for Fragment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Fragment::Space => f.write_str(" "),
			Fragment::Text(text) => f.write_str(text),
			Fragment::HorizontalGap(width) => write_span(
				f,
				&[r#"class="horizontal-blank-space""#, format!(r#"style="width: {width}em; display: inline-block;""#).as_str()],
			),
			Fragment::Dash(length) => write_span(
				f,
				&[r#"class="variable-length-dash""#, format!(r#"style="width: {length}em;""#).as_str()],
			),
			Fragment::Break(height) => write_span(
				f,
				&[r#"class="variable-height-break""#, format!(r#"style="height: {height}em;""#).as_str()],
			),
		}
	}
}

/// Writes `content` surrounded by a `tag` carrying space-separated `attributes`.
///
/// Example: `h1`, `["class=\"a\"", "id=\"b\""]`, `hi` → `<h1 class="a" id="b">hi</h1>`
pub(crate) fn surround_with_tag(
	f: &mut impl fmt::Write,
	tag: &str,
	attributes: &[&str],
	content: impl fmt::Display,
) -> fmt::Result {
	write!(f, "<{tag} {}>{content}</{tag}>", attributes.join(" "))
}

fn write_span(f: &mut fmt::Formatter<'_>, attributes: &[&str]) -> fmt::Result {
	surround_with_tag(f, "span", attributes, "")
}

/// One visual line of a rendered poem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedLine {
	fragments: Vec<Fragment>,
}

impl RenderedLine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, fragment: Fragment) {
		self.fragments.push(fragment);
	}

	pub fn fragments(&self) -> &[Fragment] {
		&self.fragments
	}

	pub fn is_empty(&self) -> bool {
		self.fragments.is_empty()
	}
}

/// Renders the line inside its `poem-line` container.
impl fmt::Display for RenderedLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		surround_with_tag(f, "div", &[r#"class="poem-line""#], Fragments(&self.fragments))
	}
}

struct Fragments<'a>(&'a [Fragment]);

impl fmt::Display for Fragments<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.iter().try_for_each(|fragment| write!(f, "{fragment}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn spans_match_the_stylesheet_vocabulary() {
		assert_eq!(
			Fragment::HorizontalGap(5.0).to_string(),
			r#"<span class="horizontal-blank-space" style="width: 5em; display: inline-block;"></span>"#
		);
		assert_eq!(
			Fragment::Dash(0.5).to_string(),
			r#"<span class="variable-length-dash" style="width: 0.5em;"></span>"#
		);
		assert_eq!(
			Fragment::Break(2.0).to_string(),
			r#"<span class="variable-height-break" style="height: 2em;"></span>"#
		);
	}

	#[test]
	fn line_wraps_fragments_in_a_container() {
		let mut line = RenderedLine::new();
		line.push(Fragment::Space);
		line.push(Fragment::Text("sea".to_owned()));
		line.push(Fragment::Text(",".to_owned()));
		assert_eq!(line.to_string(), r#"<div class="poem-line"> sea,</div>"#);
	}
}
