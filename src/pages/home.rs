use leptos::prelude::*;
use log::warn;

use crate::components::document_relations::{DataParam, DocumentRelations, legend_data};

const SAMPLE_QUEUE: &str = include_str!("sample_queue.json");

/// Sample queue snapshot in the shape the API layer emits.
fn sample_queue() -> DataParam {
	serde_json::from_str(SAMPLE_QUEUE).unwrap_or_else(|e| {
		warn!("Unable to parse sample queue: {e}");
		DataParam::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let legend = Signal::derive(legend_data);
	let queue = Signal::derive(sample_queue);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<main class="relations-page">
				<section class="relations-panel">
					<h2>"Legend"</h2>
					<DocumentRelations data=legend />
				</section>
				<section class="relations-panel">
					<h2>"Queue references"</h2>
					<p class="subtitle">"Hover or focus a document for details. Scroll to zoom, drag to pan."</p>
					<DocumentRelations data=queue />
				</section>
			</main>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_queue_parses_and_links_resolve() {
		let data = sample_queue();
		assert!(!data.nodes.is_empty());
		for link in &data.links {
			assert!(data.nodes.iter().any(|n| n.id == link.source), "{}", link.source);
			assert!(data.nodes.iter().any(|n| n.id == link.target), "{}", link.target);
		}
	}
}
