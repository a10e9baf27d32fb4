//! Wraps node labels into near-circular blocks and sizes the node to fit.
//!
//! Wrapping follows the "fit text to circle" approach: the target line width is
//! the square root of the whole text width times the line height, which is
//! roughly the width that minimizes the enclosing circle of the block.

use super::error::Result;

// Measurements are font-metric sensitive; the renderer must draw labels with
// exactly this declaration.
pub const FONT_SIZE: f64 = 14.0;
pub const LINE_HEIGHT: f64 = FONT_SIZE + 2.0;
pub const FONT_FAMILY: &str = "\"Inter\",system-ui,-apple-system,\"Segoe UI\",Roboto,\"Helvetica Neue\",\"Noto Sans\",\"Liberation Sans\",Arial,sans-serif,\"Apple Color Emoji\",\"Segoe UI Emoji\",\"Segoe UI Symbol\",\"Noto Color Emoji\"";

/// CSS font shorthand for regular label text.
pub fn font() -> String {
	format!("{FONT_SIZE}px {FONT_FAMILY}")
}

/// CSS font shorthand for emphasized label lines.
pub fn bold_font() -> String {
	format!("bold {}", font())
}

/// Measures rendered text width in pixels for a CSS font declaration.
pub trait TextMeasurer {
	/// Width of `text` drawn in `font`.
	fn measure(&self, text: &str, font: &str) -> Result<f64>;
}

/// Measurer with a constant advance per character.
///
/// Used by tests and by callers without a drawing surface.
#[derive(Clone, Debug)]
pub struct FixedWidthMeasurer {
	/// Advance of every character, in pixels.
	pub char_width: f64,
	/// Multiplier applied when the font declaration is bold.
	pub bold_factor: f64,
}

impl Default for FixedWidthMeasurer {
	fn default() -> Self {
		Self {
			char_width: FONT_SIZE * 0.6,
			bold_factor: 1.1,
		}
	}
}

impl TextMeasurer for FixedWidthMeasurer {
	fn measure(&self, text: &str, font: &str) -> Result<f64> {
		let factor = if font.starts_with("bold") {
			self.bold_factor
		} else {
			1.0
		};
		Ok(text.chars().count() as f64 * self.char_width * factor)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
	Bold,
}

impl LineStyle {
	pub fn css(self) -> &'static str {
		match self {
			LineStyle::Bold => "font-weight: bold",
		}
	}
}

/// One wrapped segment of a label.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
	/// Token text, trailing separators included.
	pub text: String,
	/// Measured width in the line's own font.
	pub width: f64,
	/// `None` for regular text.
	pub style: Option<LineStyle>,
}

/// A wrapped label and the radius of the circle around it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
	/// Lines top to bottom.
	pub lines: Vec<Line>,
	/// Smallest radius around the centred block; 0 without lines.
	pub radius: f64,
}

/// Wrap `text` (and an optional publication number) into lines and compute
/// the radius of the smallest centred circle containing them.
pub fn fit_label(
	measurer: &dyn TextMeasurer,
	text: Option<&str>,
	number: Option<u32>,
) -> Result<Label> {
	let regular = font();
	let mut lines = Vec::new();

	if let Some(number) = number {
		let text = format!("RFC {number}");
		let width = measurer.measure(&text, &bold_font())?;
		lines.push(Line {
			text,
			width,
			style: Some(LineStyle::Bold),
		});
	}

	let text = text.map(str::trim).unwrap_or_default();
	if !text.is_empty() {
		let target = (measurer.measure(text, &regular)? * LINE_HEIGHT).sqrt();
		let mut current: Option<Line> = None;
		let mut previous = f64::INFINITY;

		for word in split_words(text) {
			if let Some(line) = current.as_mut() {
				let candidate = format!("{}{}", line.text, word);
				let width = measurer.measure(&candidate, &regular)?;
				if (previous + width) / 2.0 < target {
					line.text = candidate;
					line.width = width;
					previous = width;
					continue;
				}
			}
			previous = measurer.measure(word, &regular)?;
			let next = Line {
				text: word.to_owned(),
				width: previous,
				style: None,
			};
			lines.extend(current.replace(next));
		}
		lines.extend(current);
	}

	let radius = text_radius(&lines);
	Ok(Label { lines, radius })
}

/// Tokens whose concatenation is `text`; each keeps its trailing separator.
pub fn split_words(text: &str) -> Vec<&str> {
	let words: Vec<&str> = text.split_inclusive('-').collect();
	if words.len() > 1 {
		return words;
	}
	let words: Vec<&str> = text.split_inclusive(char::is_whitespace).collect();
	if words.len() > 1 {
		return words;
	}
	split_before(text, "rfc")
}

fn split_before<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
	let mut words = Vec::new();
	let mut start = 0;
	for (i, _) in text.match_indices(marker) {
		if i > start {
			words.push(&text[start..i]);
			start = i;
		}
	}
	words.push(&text[start..]);
	words
}

/// Vertical offset of line `i` of `n` from the label centre.
pub fn line_offset(i: usize, n: usize) -> f64 {
	(i as f64 - n as f64 / 2.0 + 0.5) * LINE_HEIGHT
}

pub fn text_radius(lines: &[Line]) -> f64 {
	let n = lines.len() as f64;
	lines
		.iter()
		.enumerate()
		.map(|(i, line)| {
			let dy = ((i as f64 - n / 2.0).abs() + 0.5) * LINE_HEIGHT;
			let dx = line.width / 2.0;
			(dx * dx + dy * dy).sqrt()
		})
		.fold(0.0, f64::max)
}
