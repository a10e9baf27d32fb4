use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::{Error, Result};
use super::label::TextMeasurer;

/// Measures text with an offscreen canvas 2d context.
pub struct CanvasMeasurer {
	ctx: CanvasRenderingContext2d,
}

impl CanvasMeasurer {
	/// Fails with [`Error::NoMeasureContext`] when no 2d context is available.
	pub fn new() -> Result<Self> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(Error::NoMeasureContext)?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| Error::NoMeasureContext)?;
		let ctx = canvas
			.get_context("2d")?
			.ok_or(Error::NoMeasureContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| Error::NoMeasureContext)?;
		Ok(Self { ctx })
	}
}

impl TextMeasurer for CanvasMeasurer {
	fn measure(&self, text: &str, font: &str) -> Result<f64> {
		self.ctx.set_font(font);
		self.ctx
			.measure_text(text)
			.map(|m| m.width())
			.map_err(|e| Error::Measure {
				text: text.to_owned(),
				reason: format!("{e:?}"),
			})
	}
}
