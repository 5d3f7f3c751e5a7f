use leptos::prelude::*;

use crate::components::airport_map::{AirportMapCanvas, MapConfig, Mode};

/// Airport network page with the force / map selector.
#[component]
pub fn Home() -> impl IntoView {
	let mode = RwSignal::new(Mode::default());

	let on_change = move |ev: leptos::ev::Event| match event_target_value(&ev).parse::<Mode>() {
		Ok(selected) => mode.set(selected),
		Err(err) => log::warn!("{err}"),
	};

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

			<div class="chart-page">
				<h1>"Airport Network"</h1>
				<fieldset class="chart-type">
					<label>
						<input
							type="radio"
							name="chartType"
							value=Mode::Force.as_str()
							prop:checked=move || mode.get() == Mode::Force
							on:change=on_change
						/>
						" Force layout"
					</label>
					<label>
						<input
							type="radio"
							name="chartType"
							value=Mode::Map.as_str()
							prop:checked=move || mode.get() == Mode::Map
							on:change=on_change
						/>
						" Map"
					</label>
				</fieldset>
				<div class="chart">
					<AirportMapCanvas mode=mode config=MapConfig::default() />
				</div>
				<p class="subtitle">"Drag airports to reposition them in the force layout."</p>
			</div>
		</ErrorBoundary>
	}
}
