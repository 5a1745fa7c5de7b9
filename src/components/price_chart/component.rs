//! Leptos component wrapping the chart canvas.
//!
//! The canvas fills its container's width and redraws whenever the chart
//! state changes or the window is resized. Each redraw reads the state once,
//! so a frame always shows a whole mutation.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::render;
use super::state::ChartState;
use super::theme::ChartTheme;

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Renders the shared price chart.
#[component]
pub fn PriceChartCanvas(
	state: RwSignal<ChartState>,
	#[prop(optional)] theme: ChartTheme,
	#[prop(default = 480.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let height = height.max(render::min_canvas_height(&theme));
	let size = RwSignal::new((0.0_f64, height));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let theme = Rc::new(theme);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		size.set((container_width(&canvas), height));

		if resize_cb.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		let cb = Closure::<dyn FnMut()>::new(move || {
			size.set((container_width(&canvas), height));
		});
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		*resize_cb.borrow_mut() = Some(cb);
	});

	Effect::new(move |_| {
		let (width, height) = size.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if width <= 0.0 {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("commodity-graph: canvas has no 2d context");
			return;
		};
		state.with(|chart| render::render(chart, &ctx, &theme, width, height));
	});

	view! {
		<canvas node_ref=canvas_ref id="graphCanvas" class="price-chart-canvas" style="display: block;" />
	}
}
