//! Runs in a headless browser: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use document_relations::{
	ColorMode, DataParam, LinkParam, NodeParam, RenderConfig, SimulationState, render,
};
use wasm_bindgen_test::*;
use web_sys::{Element, Event, EventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn queue() -> DataParam {
	DataParam {
		nodes: vec![
			NodeParam {
				url: Some("/docs/draft-foo".into()),
				..NodeParam::new("draft-foo")
			},
			NodeParam::new("draft-bar"),
		],
		links: vec![LinkParam::new("draft-foo", "draft-bar", "refqueue")],
	}
}

fn click(el: &Element) -> bool {
	let init = EventInit::new();
	init.set_bubbles(true);
	init.set_cancelable(true);
	let event = Event::new_with_event_init_dict("click", &init).unwrap();
	// false when a listener called prevent_default
	el.dispatch_event(&event).unwrap()
}

#[wasm_bindgen_test]
fn node_click_is_routed_through_navigate() {
	let visited = Rc::new(RefCell::new(Vec::<String>::new()));
	let sink = visited.clone();
	let handle = render(
		&queue(),
		Rc::new(move |path: &str| sink.borrow_mut().push(path.to_owned())),
		Rc::new(|_| {}),
		ColorMode::Light,
		RenderConfig::default(),
	)
	.unwrap();

	let body = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.body())
		.unwrap();
	body.append_child(&handle.root).unwrap();

	let linked = handle
		.root
		.query_selector("a[href='/docs/draft-foo']")
		.unwrap()
		.unwrap();
	assert!(!click(&linked));
	assert_eq!(*visited.borrow(), ["/docs/draft-foo"]);

	let placeholder = handle.root.query_selector("a[href='#']").unwrap().unwrap();
	assert!(!click(&placeholder));
	assert_eq!(visited.borrow().len(), 1);

	handle.simulation.stop();
	assert_eq!(handle.simulation.state(), SimulationState::Stopped);
	let root = handle.root.clone();
	handle.teardown();
	assert!(root.parent_node().is_none());
}
