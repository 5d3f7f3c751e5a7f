use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::config::MapConfig;
use super::loader::load_datasets;
use super::render;
use super::state::LayoutController;
use super::types::{Mode, Point};

type SharedState = Rc<RefCell<Option<LayoutController>>>;

/// Pointer position in viewport units, accounting for CSS scaling.
fn pointer(canvas: &HtmlCanvasElement, ev: &MouseEvent, config: &MapConfig) -> Point {
	let rect = canvas.get_bounding_client_rect();
	let (sx, sy) = (
		if rect.width() > 0.0 { config.width / rect.width() } else { 1.0 },
		if rect.height() > 0.0 { config.height / rect.height() } else { 1.0 },
	);
	Point::new(
		(ev.client_x() as f64 - rect.left()) * sx,
		(ev.client_y() as f64 - rect.top()) * sy,
	)
}

#[component]
pub fn AirportMapCanvas(
	#[prop(into)] mode: Signal<Mode>,
	#[prop(optional)] config: MapConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let load_error = RwSignal::new(None::<String>);
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, config_init) = (state.clone(), animate.clone(), config.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(config_init.width as u32);
		canvas.set_height(config_init.height as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas has no 2d context");
				return;
			}
		};

		let (state_load, animate_load, config) =
			(state_init.clone(), animate_init.clone(), config_init.clone());
		spawn_local(async move {
			let data = match load_datasets(&config.airports_url, &config.world_url).await {
				Ok(data) => data,
				Err(err) => {
					error!("airport map failed to load: {err}");
					load_error.set(Some(err.to_string()));
					return;
				}
			};
			let mut controller = match LayoutController::new(&data, config) {
				Ok(c) => c,
				Err(err) => {
					error!("airport map failed to build: {err}");
					load_error.set(Some(err.to_string()));
					return;
				}
			};
			controller.set_mode(mode.get_untracked());
			*state_load.borrow_mut() = Some(controller);

			let (state_anim, animate_inner) = (state_load.clone(), animate_load.clone());
			*animate_load.borrow_mut() = Some(Closure::new(move || {
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					s.tick(0.016);
					render::render(s, &ctx);
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					if let Some(win) = web_sys::window() {
						let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
					}
				}
			}));
			if let Some(ref cb) = *animate_load.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		});
	});

	let state_mode = state.clone();
	Effect::new(move |_| {
		let selected = mode.get();
		if let Some(ref mut s) = *state_mode.borrow_mut() {
			s.set_mode(selected);
		}
	});

	let (state_md, config_md) = (state.clone(), config.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let p = pointer(&canvas, &ev, &config_md);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(i) = s.node_at(p) {
				s.drag_start(i);
			}
		}
	};

	let (state_mm, config_mm) = (state.clone(), config.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let p = pointer(&canvas, &ev, &config_mm);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.set_pointer(Some(p));
			if s.is_dragging() {
				s.drag_move(p);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.drag_end();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag_end();
			s.set_pointer(None);
		}
	};

	let cursor = move || {
		if mode.get() == Mode::Force {
			"display: block; cursor: grab;"
		} else {
			"display: block; cursor: default;"
		}
	};

	view! {
		<div class="airport-map">
			<canvas
				node_ref=canvas_ref
				class="airport-map-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style=cursor
			/>
			{move || load_error.get().map(|e| view! { <p class="load-error">{e}</p> })}
		</div>
	}
}
