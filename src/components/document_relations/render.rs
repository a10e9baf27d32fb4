//! Builds the SVG scene in the DOM and drives it from animation frames.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, MouseEvent, WheelEvent, Window};

use super::config::RenderConfig;
use super::error::{Error, Result};
use super::geometry::ViewBox;
use super::label::font;
use super::measure::CanvasMeasurer;
use super::scene::{Frame, Scene, Tooltip, edge_tooltip, follow_link, node_tooltip};
use super::simulation::SimulationState;
use super::state::RelationsState;
use super::style::{ColorMode, Palette};
use super::types::DataParam;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Called with the destination path of a clicked node.
pub type Navigate = Rc<dyn Fn(&str)>;
/// Receives a tooltip to show, or `None` to clear it.
pub type TooltipSink = Rc<dyn Fn(Option<Tooltip>)>;

fn window() -> Result<Window> {
	web_sys::window().ok_or_else(|| Error::Dom("no window".into()))
}

fn svg(document: &Document, tag: &str, attrs: &[(&str, &str)]) -> Result<Element> {
	let el = document.create_element_ns(Some(SVG_NS), tag)?;
	for (name, value) in attrs {
		el.set_attribute(name, value)?;
	}
	Ok(el)
}

/// Handles to every element touched after construction.
struct SceneView {
	root: Element,
	links_layer: Element,
	nodes_layer: Element,
	edges: Vec<Element>,
	nodes: Vec<Element>,
}

impl SceneView {
	fn build(document: &Document, scene: &Scene, mode: ColorMode) -> Result<Self> {
		let style = format!("font: {}", font());
		let view_box = ViewBox::INITIAL.to_string();
		let root = svg(
			document,
			"svg",
			&[
				("class", "block w-full h-full"),
				("style", style.as_str()),
				("text-anchor", "middle"),
				("dominant-baseline", "central"),
				("overflow", "visible"),
				("version", "1.1"),
				("viewBox", view_box.as_str()),
			],
		)?;

		let defs = svg(document, "defs", &[])?;
		for marker in &scene.markers {
			let el = svg(
				document,
				"marker",
				&[
					("id", marker.id.as_str()),
					("viewBox", "0 -5 10 10"),
					("refX", "7.85"),
					("markerWidth", "4"),
					("markerHeight", "4"),
					("stroke-width", "0.2"),
					("stroke", mode.outline()),
					("orient", "auto"),
					("fill", marker.fill),
				],
			)?;
			let head = svg(document, "path", &[("d", "M0,-5L10,0L0,5")])?;
			el.append_child(&head)?;
			defs.append_child(&el)?;
		}
		root.append_child(&defs)?;

		let links_layer = svg(document, "g", &[("fill", "none"), ("stroke-width", "5")])?;
		let mut edges = Vec::with_capacity(scene.edges.len());
		for edge in &scene.edges {
			let el = svg(
				document,
				"path",
				&[
					("class", edge.class.as_str()),
					("marker-end", edge.marker.as_str()),
					("stroke", edge.color),
					("stroke-dasharray", edge.dash),
					("tabindex", "0"),
				],
			)?;
			links_layer.append_child(&el)?;
			edges.push(el);
		}
		root.append_child(&links_layer)?;

		let nodes_layer = svg(document, "g", &[])?;
		let mut nodes = Vec::with_capacity(scene.nodes.len());
		for node in &scene.nodes {
			let anchor = svg(
				document,
				"a",
				&[("href", node.href.as_str()), ("tabindex", "0")],
			)?;
			let (radius, stroke_width) = (node.radius.to_string(), node.stroke_width.to_string());
			let circle = svg(
				document,
				"circle",
				&[
					("r", radius.as_str()),
					("fill", node.fill),
					("stroke", node.outline),
					("stroke-width", stroke_width.as_str()),
					("stroke-dasharray", node.dash),
				],
			)?;
			let text = svg(document, "text", &[("fill", node.ink)])?;
			for line in &node.lines {
				let y = line.y.to_string();
				let tspan = svg(
					document,
					"tspan",
					&[("x", "0"), ("y", y.as_str()), ("style", line.style)],
				)?;
				tspan.set_text_content(Some(&line.text));
				text.append_child(&tspan)?;
			}
			anchor.append_child(&circle)?;
			anchor.append_child(&text)?;
			let group = svg(document, "g", &[])?;
			group.append_child(&anchor)?;
			nodes_layer.append_child(&group)?;
			nodes.push(anchor);
		}
		root.append_child(&nodes_layer)?;

		Ok(Self {
			root,
			links_layer,
			nodes_layer,
			edges,
			nodes,
		})
	}

	fn apply(&self, frame: &Frame) -> Result<()> {
		for (el, d) in self.edges.iter().zip(&frame.edge_paths) {
			el.set_attribute("d", d)?;
		}
		for (el, transform) in self.nodes.iter().zip(&frame.node_transforms) {
			if !transform.is_empty() {
				el.set_attribute("transform", transform)?;
			}
		}
		self.root
			.set_attribute("viewBox", &frame.view_box.to_string())?;
		Ok(())
	}

	fn apply_transform(&self, transform: &str) -> Result<()> {
		self.links_layer.set_attribute("transform", transform)?;
		self.nodes_layer.set_attribute("transform", transform)?;
		Ok(())
	}
}

struct Session {
	state: RefCell<RelationsState>,
	view: SceneView,
	view_box: Cell<ViewBox>,
	navigate: Navigate,
	tooltip: TooltipSink,
	frame: RefCell<Option<Closure<dyn FnMut()>>>,
	frame_id: Cell<Option<i32>>,
	listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl Session {
	fn listen(
		&self,
		target: &Element,
		event: &str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<()> {
		let closure = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		self.listeners.borrow_mut().push(closure);
		Ok(())
	}

	/// Client coordinates to scene units of the current view box.
	fn to_scene(&self, ev: &MouseEvent) -> (f64, f64) {
		let rect = self.view.root.get_bounding_client_rect();
		let p = self.view_box.get().to_scene(
			(rect.width(), rect.height()),
			(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			),
		);
		(p.x, p.y)
	}

	/// Current pixels per scene unit.
	fn scale(&self) -> f64 {
		let rect = self.view.root.get_bounding_client_rect();
		self.view_box.get().scale_in(rect.width(), rect.height())
	}

	fn show_tooltip(&self, el: &Element, text: Vec<String>) {
		let rect = el.get_bounding_client_rect();
		(self.tooltip)(Some(Tooltip {
			text,
			position: [rect.right(), rect.top()],
		}));
	}

	fn refresh_transform(&self) {
		let transform = self.state.borrow().transform.to_svg();
		if let Err(e) = self.view.apply_transform(&transform) {
			error!("Unable to apply pan/zoom: {e}");
		}
	}

	fn attach(self: &Rc<Self>) -> Result<()> {
		let root = self.view.root.clone();

		let weak = Rc::downgrade(self);
		self.listen(&root, "wheel", move |ev| {
			let (Some(s), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<WheelEvent>()) else {
				return;
			};
			ev.prevent_default();
			let (x, y) = s.to_scene(ev);
			s.state.borrow_mut().zoom(x, y, ev.delta_y());
			s.refresh_transform();
		})?;

		let weak = Rc::downgrade(self);
		self.listen(&root, "mousedown", move |ev| {
			let (Some(s), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<MouseEvent>()) else {
				return;
			};
			s.state
				.borrow_mut()
				.begin_pan(ev.client_x() as f64, ev.client_y() as f64);
		})?;

		let weak = Rc::downgrade(self);
		self.listen(&root, "mousemove", move |ev| {
			let (Some(s), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<MouseEvent>()) else {
				return;
			};
			if !s.state.borrow().pan.active {
				return;
			}
			let scale = s.scale();
			s.state
				.borrow_mut()
				.pan_to(ev.client_x() as f64, ev.client_y() as f64, scale);
			s.refresh_transform();
		})?;

		for event in ["mouseup", "mouseleave"] {
			let weak = Rc::downgrade(self);
			self.listen(&root, event, move |_| {
				if let Some(s) = weak.upgrade() {
					s.state.borrow_mut().end_pan();
				}
			})?;
		}

		for (i, el) in self.view.edges.iter().enumerate() {
			for event in ["mouseenter", "focus"] {
				let (weak, target) = (Rc::downgrade(self), el.clone());
				self.listen(el, event, move |_| {
					let Some(s) = weak.upgrade() else { return };
					let text = {
						let state = s.state.borrow();
						edge_tooltip(&state.graph, &state.graph.links()[i])
					};
					s.show_tooltip(&target, text);
				})?;
			}
			self.listen_clear(el)?;
		}

		for (i, el) in self.view.nodes.iter().enumerate() {
			for event in ["mouseenter", "focus"] {
				let (weak, target) = (Rc::downgrade(self), el.clone());
				self.listen(el, event, move |_| {
					let Some(s) = weak.upgrade() else { return };
					let text = node_tooltip(&s.state.borrow().graph.nodes()[i]);
					s.show_tooltip(&target, text);
				})?;
			}
			self.listen_clear(el)?;

			let weak = Rc::downgrade(self);
			let href = self.state.borrow().scene.nodes[i].href.clone();
			self.listen(el, "click", move |ev| {
				ev.prevent_default();
				if let Some(s) = weak.upgrade() {
					follow_link(&href, &*s.navigate);
				}
			})?;
		}
		Ok(())
	}

	fn listen_clear(self: &Rc<Self>, el: &Element) -> Result<()> {
		for event in ["mouseleave", "blur"] {
			let weak = Rc::downgrade(self);
			self.listen(el, event, move |_| {
				if let Some(s) = weak.upgrade() {
					(s.tooltip)(None);
				}
			})?;
		}
		Ok(())
	}

	fn install_frame(self: &Rc<Self>) {
		let weak: Weak<Session> = Rc::downgrade(self);
		*self.frame.borrow_mut() = Some(Closure::new(move || {
			if let Some(s) = weak.upgrade() {
				s.frame_id.set(None);
				s.on_frame();
			}
		}));
	}

	fn on_frame(&self) {
		let frame = self.state.borrow_mut().advance();
		if let Some(frame) = frame {
			if let Err(e) = self.view.apply(&frame) {
				error!("Unable to redraw relations diagram: {e}");
			}
			self.view_box.set(frame.view_box);
		}
		if self.state.borrow().is_running() {
			if let Err(e) = self.request_frame() {
				error!("Unable to schedule relations frame: {e}");
			}
		} else {
			debug!("Relations diagram settled");
		}
	}

	fn request_frame(&self) -> Result<()> {
		if let Some(cb) = self.frame.borrow().as_ref() {
			let id = window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.frame_id.set(Some(id));
		}
		Ok(())
	}
}

/// Control over a running diagram's simulation.
#[derive(Clone)]
pub struct SimulationHandle(Rc<Session>);

impl SimulationHandle {
	/// Halt the simulation and cancel any pending redraw. Terminal.
	pub fn stop(&self) {
		self.0.state.borrow_mut().simulation.stop();
		if let Some(id) = self.0.frame_id.take() {
			if let Ok(window) = window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}

	/// Lifecycle state of the underlying simulation.
	pub fn state(&self) -> SimulationState {
		self.0.state.borrow().simulation.state()
	}
}

/// The diagram's root element and its simulation.
///
/// Dropping the last handle releases the event listeners; detach `root`
/// from the document first.
pub struct RenderHandle {
	/// The `<svg>` element, not yet attached to the document.
	pub root: Element,
	/// Control over the running layout.
	pub simulation: SimulationHandle,
}

impl RenderHandle {
	/// Stop the simulation and detach the diagram from the document.
	pub fn teardown(self) {
		self.simulation.stop();
		self.root.remove();
	}
}

/// Lay out `data` and build its SVG diagram.
///
/// Fails only when the DOM or text metrics are unavailable; bad links and
/// unknown relationship kinds are logged and tolerated.
pub fn render(
	data: &DataParam,
	navigate: Navigate,
	tooltip: TooltipSink,
	color_mode: ColorMode,
	config: RenderConfig,
) -> Result<RenderHandle> {
	let document = window()?
		.document()
		.ok_or_else(|| Error::Dom("no document".into()))?;
	let measurer = CanvasMeasurer::new()?;
	let palette = Palette::new(color_mode);
	let state = RelationsState::new(data, &measurer, &palette, config)?;
	let view = SceneView::build(&document, &state.scene, color_mode)?;

	let session = Rc::new(Session {
		state: RefCell::new(state),
		view,
		view_box: Cell::new(ViewBox::INITIAL),
		navigate,
		tooltip,
		frame: RefCell::new(None),
		frame_id: Cell::new(None),
		listeners: RefCell::new(Vec::new()),
	});
	session.attach()?;
	session.install_frame();
	session.state.borrow_mut().simulation.start();
	session.request_frame()?;

	Ok(RenderHandle {
		root: session.view.root.clone(),
		simulation: SimulationHandle(session),
	})
}
