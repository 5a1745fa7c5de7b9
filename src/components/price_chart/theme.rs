//! Visual theming for the price chart.
//!
//! Colors, fonts and spacing used by the renderer. Series colors are drawn at
//! random when a series joins the chart; everything else comes from
//! [`ChartTheme`], which can be overridden through the page configuration.

use rand::Rng;
use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// A random opaque color. Each channel is in `0..255`.
	pub fn random(rng: &mut impl Rng) -> Self {
		Self::rgb(rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("rgb({}, {}, {})", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Chart title style.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TitleStyle {
	pub text: String,
	pub color: Color,
	/// Font size in pixels.
	pub size: f64,
}

/// Legend style: one color box and label per series.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
	pub text_color: Color,
	pub font_size: f64,
	/// Width of the border stroked around each color box.
	pub border_width: f64,
	pub border_color: Color,
	pub box_width: f64,
	pub box_height: f64,
	pub spacing: f64,
}

/// Axis, grid and tick label style.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
	pub color: Color,
	pub grid_color: Color,
	/// Dash pattern for grid lines (dash, gap). `(0, 0)` draws solid lines.
	pub grid_dash: (f64, f64),
	pub label_color: Color,
	pub font_size: f64,
}

/// Complete visual configuration for the chart canvas.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
	pub background: Color,
	pub title: TitleStyle,
	pub legend: LegendStyle,
	pub axis: AxisStyle,
	/// Stroke width of series lines.
	pub line_width: f64,
	/// Shown on the canvas while no chart is active.
	pub empty_hint: String,
}

impl Default for TitleStyle {
	fn default() -> Self {
		Self {
			text: "Commodity Prices Over Time".to_string(),
			color: Color::rgb(0, 0, 0),
			size: 24.0,
		}
	}
}

impl Default for LegendStyle {
	fn default() -> Self {
		Self {
			text_color: Color::rgb(0, 0, 0),
			font_size: 12.0,
			border_width: 0.5,
			border_color: Color::rgb(0, 0, 0),
			box_width: 40.0,
			box_height: 12.0,
			spacing: 10.0,
		}
	}
}

impl Default for AxisStyle {
	fn default() -> Self {
		Self {
			color: Color::rgba(0, 0, 0, 0.6),
			grid_color: Color::rgba(0, 0, 0, 0.1),
			grid_dash: (4.0, 4.0),
			label_color: Color::rgb(102, 102, 102),
			font_size: 11.0,
		}
	}
}

impl Default for ChartTheme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			title: TitleStyle::default(),
			legend: LegendStyle::default(),
			axis: AxisStyle::default(),
			line_width: 2.0,
			empty_hint: "Choose a commodity and click \"Show Graph\"".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(12, 0, 254).to_css(), "rgb(12, 0, 254)");
		assert_eq!(Color::rgb(1, 2, 3).with_alpha(0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn random_colors_are_opaque_and_vary() {
		let mut rng = StdRng::seed_from_u64(7);
		let colors: Vec<_> = (0..16).map(|_| Color::random(&mut rng)).collect();
		assert!(colors.iter().all(|c| c.a == 1.0 && c.r < 255 && c.g < 255 && c.b < 255));
		assert!(colors.windows(2).any(|w| w[0] != w[1]));
	}

	#[test]
	fn partial_theme_overrides_keep_defaults() {
		let theme: ChartTheme =
			serde_json::from_str(r#"{"title": {"text": "Metals"}, "line_width": 1.5}"#).unwrap();
		assert_eq!(theme.title.text, "Metals");
		assert_eq!(theme.title.size, 24.0);
		assert_eq!(theme.line_width, 1.5);
		assert_eq!(theme.legend.border_width, 0.5);
	}
}
