//! Maps chart data onto canvas coordinates.
//!
//! All series share one x-axis: the merged date labels, evenly spaced. The
//! y-axis spans the finite values of every series with a little headroom.
//! Lines are cut into separate runs wherever a series has no value for an
//! axis date or the value is `NaN`.

use super::state::ChartState;
use super::theme::ChartTheme;
use super::types::Series;

/// Space reserved left of the plot for value labels.
const AXIS_GUTTER_LEFT: f64 = 64.0;
const AXIS_GUTTER_RIGHT: f64 = 24.0;
/// Space reserved under the plot for date labels.
const AXIS_GUTTER_BOTTOM: f64 = 56.0;
/// Minimum horizontal room per date label before labels are thinned.
const MIN_X_LABEL_SPACING: f64 = 72.0;
const Y_TICKS: usize = 5;
/// Fraction of the value span added above and below.
const VALUE_HEADROOM: f64 = 0.05;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}
}

/// Screen geometry for one frame of the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
	/// Area inside the axes.
	pub plot: Rect,
	/// Value drawn at the bottom edge of `plot`.
	pub min_value: f64,
	/// Value drawn at the top edge of `plot`.
	pub max_value: f64,
	label_count: usize,
}

impl ChartLayout {
	/// Lays out a `width` x `height` canvas for the current state.
	pub fn new(state: &ChartState, theme: &ChartTheme, width: f64, height: f64) -> Self {
		let header = header_height(theme);
		let plot = Rect {
			x: AXIS_GUTTER_LEFT,
			y: header,
			width: (width - AXIS_GUTTER_LEFT - AXIS_GUTTER_RIGHT).max(1.0),
			height: (height - header - AXIS_GUTTER_BOTTOM).max(1.0),
		};
		let (min_value, max_value) = value_range(state.series());

		Self {
			plot,
			min_value,
			max_value,
			label_count: state.axis_labels().len(),
		}
	}

	/// Horizontal position of the `index`th axis label.
	pub fn x_at(&self, index: usize) -> f64 {
		if self.label_count <= 1 {
			return self.plot.x + self.plot.width / 2.0;
		}
		self.plot.x + self.plot.width * index as f64 / (self.label_count - 1) as f64
	}

	/// Vertical position of `value`; larger values sit higher.
	pub fn y_at(&self, value: f64) -> f64 {
		let t = (value - self.min_value) / (self.max_value - self.min_value);
		self.plot.bottom() - t * self.plot.height
	}

	/// Indices of the axis labels that get a tick, thinned to fit the width.
	pub fn x_ticks(&self) -> Vec<usize> {
		if self.label_count == 0 {
			return Vec::new();
		}
		let fit = ((self.plot.width / MIN_X_LABEL_SPACING).floor() as usize).max(1);
		let step = self.label_count.div_ceil(fit).max(1);
		(0..self.label_count).step_by(step).collect()
	}

	/// Evenly spaced values from bottom to top of the plot.
	pub fn y_ticks(&self) -> Vec<f64> {
		let span = self.max_value - self.min_value;
		(0..Y_TICKS)
			.map(|i| self.min_value + span * i as f64 / (Y_TICKS - 1) as f64)
			.collect()
	}

	/// Continuous runs of canvas points for `series` along `axis_labels`.
	pub fn runs(&self, series: &Series, axis_labels: &[String]) -> Vec<Vec<(f64, f64)>> {
		let mut runs = Vec::new();
		let mut current = Vec::new();
		for (index, date) in axis_labels.iter().enumerate() {
			match series.value_at(date).filter(|v| v.is_finite()) {
				Some(value) => current.push((self.x_at(index), self.y_at(value))),
				None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
				None => {}
			}
		}
		if !current.is_empty() {
			runs.push(current);
		}
		runs
	}
}

/// Height taken by the title and the legend row above the plot.
pub fn header_height(theme: &ChartTheme) -> f64 {
	let title = theme.title.size + 16.0;
	let legend = theme.legend.box_height.max(theme.legend.font_size) + theme.legend.spacing * 2.0;
	title + legend
}

/// Padded `(min, max)` over every finite value; `(0, 1)` when there are none.
fn value_range(series: &[Series]) -> (f64, f64) {
	let (min, max) = series
		.iter()
		.flat_map(|s| s.points.iter().map(|p| p.value))
		.filter(|v| v.is_finite())
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
			(lo.min(v), hi.max(v))
		});

	if !min.is_finite() {
		return (0.0, 1.0);
	}
	if (max - min).abs() < f64::EPSILON {
		let pad = (min.abs() * VALUE_HEADROOM).max(1.0);
		return (min - pad, max + pad);
	}
	let pad = (max - min) * VALUE_HEADROOM;
	(min - pad, max + pad)
}

/// Formats a tick value with precision suited to the visible span.
pub fn format_value(value: f64, span: f64) -> String {
	if span >= 100.0 {
		format!("{value:.0}")
	} else if span >= 1.0 {
		format!("{value:.2}")
	} else {
		format!("{value:.4}")
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::catalog::Commodity;
	use crate::fetcher::PricePoint;

	fn commodity(name: &str) -> Commodity {
		Commodity {
			id: name.into(),
			name: name.to_string(),
			code: name.to_uppercase(),
			information: None,
		}
	}

	fn chart(series: &[(&str, &[(&str, f64)])]) -> ChartState {
		let mut state = ChartState::with_rng(StdRng::seed_from_u64(1));
		for (i, (name, entries)) in series.iter().enumerate() {
			let points = entries.iter().map(|&(d, v)| PricePoint::new(d, v)).collect();
			if i == 0 {
				state.initialize(&commodity(name), points).unwrap();
			} else {
				state.append(&commodity(name), points).unwrap();
			}
		}
		state
	}

	#[test]
	fn empty_chart_has_unit_range() {
		let state = ChartState::with_rng(StdRng::seed_from_u64(1));
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		assert_eq!((layout.min_value, layout.max_value), (0.0, 1.0));
		assert!(layout.x_ticks().is_empty());
	}

	#[test]
	fn range_ignores_nan_and_adds_headroom() {
		let state = chart(&[("Oil", &[("a", 10.0), ("b", f64::NAN), ("c", 20.0)])]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		assert!((layout.min_value - 9.5).abs() < 1e-9);
		assert!((layout.max_value - 20.5).abs() < 1e-9);
		assert!(layout.y_at(20.0) < layout.y_at(10.0));
	}

	#[test]
	fn flat_series_gets_nonzero_span() {
		let state = chart(&[("Oil", &[("a", 5.0), ("b", 5.0)])]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		assert!(layout.max_value > layout.min_value);
		assert!(layout.y_at(5.0).is_finite());
	}

	#[test]
	fn x_positions_span_the_plot() {
		let state = chart(&[("Oil", &[("a", 1.0), ("b", 2.0), ("c", 3.0)])]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		assert_eq!(layout.x_at(0), layout.plot.x);
		assert_eq!(layout.x_at(2), layout.plot.right());

		let single = chart(&[("Oil", &[("a", 1.0)])]);
		let layout = ChartLayout::new(&single, &ChartTheme::default(), 800.0, 400.0);
		assert_eq!(layout.x_at(0), layout.plot.x + layout.plot.width / 2.0);
	}

	#[test]
	fn gaps_and_nan_split_runs() {
		let state = chart(&[
			("A", &[("2024-01", 1.0), ("2024-03", 3.0), ("2024-04", f64::NAN), ("2024-05", 5.0)]),
			("B", &[("2024-02", 2.0)]),
		]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		let axis = state.axis_labels();
		assert_eq!(axis.len(), 5);

		let a_runs = layout.runs(&state.series()[0], axis);
		let lengths: Vec<_> = a_runs.iter().map(Vec::len).collect();
		assert_eq!(lengths, [1, 1, 1]);

		let b_runs = layout.runs(&state.series()[1], axis);
		assert_eq!(b_runs.len(), 1);
		assert_eq!(b_runs[0][0].0, layout.x_at(1));
	}

	#[test]
	fn x_ticks_thin_out_on_narrow_canvas() {
		let dates: Vec<String> = (0..240).map(|i| format!("{:04}-01-01", 1800 + i)).collect();
		let entries: Vec<(&str, f64)> = dates.iter().map(|d| (d.as_str(), 1.0)).collect();
		let state = chart(&[("Oil", &entries)]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);

		let ticks = layout.x_ticks();
		assert_eq!(ticks[0], 0);
		assert!(ticks.len() * MIN_X_LABEL_SPACING as usize <= layout.plot.width as usize + 1);
		assert!(ticks.windows(2).all(|w| w[1] > w[0]));
	}

	#[test]
	fn y_ticks_cover_range() {
		let state = chart(&[("Oil", &[("a", 0.0), ("b", 100.0)])]);
		let layout = ChartLayout::new(&state, &ChartTheme::default(), 800.0, 400.0);
		let ticks = layout.y_ticks();
		assert_eq!(ticks.len(), Y_TICKS);
		assert_eq!(ticks[0], layout.min_value);
		assert!((ticks[Y_TICKS - 1] - layout.max_value).abs() < 1e-9);
	}

	#[test]
	fn value_labels_follow_span() {
		assert_eq!(format_value(1234.567, 500.0), "1235");
		assert_eq!(format_value(3.14159, 5.0), "3.14");
		assert_eq!(format_value(0.123456, 0.5), "0.1235");
	}
}
