//! Canvas rendering for the price chart.
//!
//! Draws one full frame from the current [`ChartState`]:
//! 1. Background and title
//! 2. Legend (one color box per series, in insertion order)
//! 3. Grid, axes and tick labels
//! 4. Series lines, one path per continuous run

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{ChartLayout, format_value, header_height};
use super::state::ChartState;
use super::theme::ChartTheme;

/// Renders the complete chart to the canvas.
pub fn render(
	state: &ChartState,
	ctx: &CanvasRenderingContext2d,
	theme: &ChartTheme,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	if !state.is_active() {
		draw_empty_hint(ctx, theme, width, height);
		return;
	}

	let layout = ChartLayout::new(state, theme, width, height);

	draw_title(ctx, theme, width);
	draw_legend(state, ctx, theme, width);
	draw_grid(state, ctx, &layout, theme);
	draw_series(state, ctx, &layout, theme);
}

fn draw_empty_hint(ctx: &CanvasRenderingContext2d, theme: &ChartTheme, width: f64, height: f64) {
	ctx.set_fill_style_str(&theme.axis.label_color.to_css());
	ctx.set_font(&format!("{}px sans-serif", theme.axis.font_size + 3.0));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&theme.empty_hint, width / 2.0, height / 2.0);
}

fn draw_title(ctx: &CanvasRenderingContext2d, theme: &ChartTheme, width: f64) {
	ctx.set_fill_style_str(&theme.title.color.to_css());
	ctx.set_font(&format!("bold {}px sans-serif", theme.title.size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	let _ = ctx.fill_text(&theme.title.text, width / 2.0, 8.0);
}

fn draw_legend(state: &ChartState, ctx: &CanvasRenderingContext2d, theme: &ChartTheme, width: f64) {
	let legend = &theme.legend;
	ctx.set_font(&format!("bold {}px sans-serif", legend.font_size));

	let entry_widths: Vec<f64> = state
		.series()
		.iter()
		.map(|s| {
			let text = ctx.measure_text(&s.label).map(|m| m.width()).unwrap_or(0.0);
			legend.box_width + legend.spacing / 2.0 + text
		})
		.collect();
	let total: f64 = entry_widths.iter().sum::<f64>()
		+ legend.spacing * entry_widths.len().saturating_sub(1) as f64;

	let y = theme.title.size + 16.0 + legend.spacing;
	let mut x = ((width - total) / 2.0).max(legend.spacing);

	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	for (series, entry_width) in state.series().iter().zip(&entry_widths) {
		ctx.set_fill_style_str(&series.color.to_css());
		ctx.fill_rect(x, y, legend.box_width, legend.box_height);
		if legend.border_width > 0.0 {
			ctx.set_stroke_style_str(&legend.border_color.to_css());
			ctx.set_line_width(legend.border_width);
			ctx.stroke_rect(x, y, legend.box_width, legend.box_height);
		}

		ctx.set_fill_style_str(&legend.text_color.to_css());
		let _ = ctx.fill_text(
			&series.label,
			x + legend.box_width + legend.spacing / 2.0,
			y + legend.box_height / 2.0,
		);
		x += entry_width + legend.spacing;
	}
}

fn draw_grid(
	state: &ChartState,
	ctx: &CanvasRenderingContext2d,
	layout: &ChartLayout,
	theme: &ChartTheme,
) {
	let axis = &theme.axis;
	let plot = layout.plot;

	ctx.set_stroke_style_str(&axis.grid_color.to_css());
	ctx.set_line_width(1.0);
	let (dash, gap) = axis.grid_dash;
	if dash > 0.0 && gap > 0.0 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
	}

	ctx.set_font(&format!("{}px sans-serif", axis.font_size));
	ctx.set_fill_style_str(&axis.label_color.to_css());

	// Value gridlines and labels
	ctx.set_text_align("right");
	ctx.set_text_baseline("middle");
	let span = layout.max_value - layout.min_value;
	for value in layout.y_ticks() {
		let y = layout.y_at(value);
		ctx.begin_path();
		ctx.move_to(plot.x, y);
		ctx.line_to(plot.right(), y);
		ctx.stroke();
		let _ = ctx.fill_text(&format_value(value, span), plot.x - 8.0, y);
	}

	// Date gridlines and labels, rotated to fit
	let labels = state.axis_labels();
	for index in layout.x_ticks() {
		let x = layout.x_at(index);
		ctx.begin_path();
		ctx.move_to(x, plot.y);
		ctx.line_to(x, plot.bottom());
		ctx.stroke();

		ctx.save();
		let _ = ctx.translate(x, plot.bottom() + 8.0);
		let _ = ctx.rotate(-std::f64::consts::FRAC_PI_4);
		ctx.set_text_align("right");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&labels[index], 0.0, 0.0);
		ctx.restore();
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_stroke_style_str(&axis.color.to_css());
	ctx.begin_path();
	ctx.move_to(plot.x, plot.y);
	ctx.line_to(plot.x, plot.bottom());
	ctx.line_to(plot.right(), plot.bottom());
	ctx.stroke();
}

fn draw_series(
	state: &ChartState,
	ctx: &CanvasRenderingContext2d,
	layout: &ChartLayout,
	theme: &ChartTheme,
) {
	let labels = state.axis_labels();
	ctx.set_line_width(theme.line_width);
	ctx.set_line_join("round");

	for series in state.series() {
		let color = series.color.to_css();
		ctx.set_stroke_style_str(&color);
		ctx.set_fill_style_str(&color);

		for run in layout.runs(series, labels) {
			if let [(x, y)] = run.as_slice() {
				// Lone point between gaps: a dot keeps it visible.
				ctx.begin_path();
				let _ = ctx.arc(*x, *y, theme.line_width.max(1.5), 0.0, std::f64::consts::TAU);
				ctx.fill();
				continue;
			}
			ctx.begin_path();
			for (i, &(x, y)) in run.iter().enumerate() {
				if i == 0 {
					ctx.move_to(x, y);
				} else {
					ctx.line_to(x, y);
				}
			}
			ctx.stroke();
		}
	}
}

/// Smallest canvas height that still leaves room for a plot.
pub fn min_canvas_height(theme: &ChartTheme) -> f64 {
	header_height(theme) + 160.0
}
