use leptos::prelude::*;

use crate::components::network_backdrop::NetworkBackdrop;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="fullscreen-backdrop">
				<NetworkBackdrop />
				<div class="backdrop-overlay">
					<h1>"ClusterEye"</h1>
					<p class="subtitle">"Database cluster monitoring"</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
