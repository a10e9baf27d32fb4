/// Errors raised while building or rendering a relationship diagram.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A link names a node id that was never declared. Strict policy only.
	#[error("link {from} -> {to} references unknown node {missing}")]
	MissingEndpoint {
		/// Source id as given.
		from: String,
		/// Target id as given.
		to: String,
		/// Whichever of the two is undeclared.
		missing: String,
	},
	/// No canvas is available to measure label text.
	#[error("unable to get a 2d canvas context for text measurement")]
	NoMeasureContext,
	/// The measuring context rejected a string.
	#[error("text measurement failed for {text:?}: {reason}")]
	Measure {
		/// Text being measured.
		text: String,
		/// Message from the browser.
		reason: String,
	},
	/// Building or updating the SVG failed.
	#[error("dom operation failed: {0}")]
	Dom(String),
}

impl From<wasm_bindgen::JsValue> for Error {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		Error::Dom(format!("{value:?}"))
	}
}

pub type Result<T> = std::result::Result<T, Error>;
