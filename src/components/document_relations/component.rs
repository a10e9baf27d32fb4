use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use log::error;

use super::config::RenderConfig;
use super::render::{Navigate, RenderHandle, TooltipSink, render};
use super::scene::Tooltip;
use super::style::ColorMode;
use super::types::DataParam;

/// Interactive relationship diagram.
///
/// Re-renders from scratch whenever `data` changes; node clicks navigate with
/// the router instead of reloading the page.
#[component]
pub fn DocumentRelations(
	/// Documents and links to draw.
	#[prop(into)]
	data: Signal<DataParam>,
	/// Theme of the surrounding page.
	#[prop(optional)]
	color_mode: ColorMode,
	/// Layout and view settings; defaults when omitted.
	#[prop(optional)]
	config: Option<RenderConfig>,
) -> impl IntoView {
	let container = NodeRef::<leptos::html::Div>::new();
	let (tooltip, set_tooltip) = signal(None::<Tooltip>);
	let (failed, set_failed) = signal(false);
	let handle = StoredValue::new_local(None::<RenderHandle>);
	let config = config.unwrap_or_default();

	let router_navigate = use_navigate();
	let navigate: Navigate =
		Rc::new(move |path: &str| router_navigate(path, NavigateOptions::default()));

	Effect::new(move |_| {
		let Some(div) = container.get() else {
			return;
		};
		let data = data.get();
		handle.update_value(|current| {
			if let Some(old) = current.take() {
				old.teardown();
			}
		});
		set_tooltip.set(None);

		let sink: TooltipSink = Rc::new(move |tip| set_tooltip.set(tip));
		let rendered = render(&data, navigate.clone(), sink, color_mode, config.clone())
			.and_then(|h| {
				div.append_child(&h.root)?;
				Ok(h)
			});
		match rendered {
			Ok(h) => {
				set_failed.set(false);
				handle.set_value(Some(h));
			}
			Err(e) => {
				error!("Diagram failed to render: {e}");
				set_failed.set(true);
			}
		}
	});

	on_cleanup(move || {
		handle.update_value(|current| {
			if let Some(h) = current.take() {
				h.teardown();
			}
		});
	});

	view! {
		<div class="document-relations" node_ref=container></div>
		<Show when=move || failed.get()>
			<p class="diagram-error">"Diagram failed to render"</p>
		</Show>
		{move || {
			tooltip
				.get()
				.map(|tip| {
					let style = format!(
						"position: fixed; left: {}px; top: {}px; pointer-events: none;",
						tip.position[0],
						tip.position[1],
					);
					view! {
						<div class="diagram-tooltip" role="tooltip" style=style>
							{tip.text.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
						</div>
					}
				})
		}}
	}
}
