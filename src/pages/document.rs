use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

/// Landing page for a document reached from the diagram.
#[component]
pub fn Document() -> impl IntoView {
	let params = use_params_map();
	let name = move || params.read().get("name").unwrap_or_default();

	view! {
		<main class="document-page">
			<h1>{name}</h1>
			<A href="/">"Back to relations"</A>
		</main>
	}
}
