//! Document relationship diagrams for the RFC editorial queue.
//!
//! The rendering engine is re-exported at the crate root: [`normalize`] and
//! [`fit_label`] prepare a graph, [`render`] and [`DocumentRelations`] draw it.
//! [`App`] is a small Leptos client-side app hosting it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::pages::document::Document;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

pub use components::document_relations::{
	CanvasMeasurer, ColorMode, DataParam, Disposition, DocumentRelations, Error, FixedWidthMeasurer,
	ForceConfig, Frame, Graph, IntegrityPolicy, Label, Line, Link, LinkParam, Navigate, Node,
	NodeIdx, NodeParam, NodeState, Palette, Relationship, RenderConfig, RenderHandle, Scene,
	Simulation, SimulationHandle, SimulationState, TextMeasurer, Tooltip, TooltipSink, fit_label,
	follow_link, legend_data, normalize, render,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the relations page, document pages and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Document relations" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/docs/:name") view=Document />
			</Routes>
		</Router>
	}
}
