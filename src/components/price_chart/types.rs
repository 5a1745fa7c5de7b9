//! Series data held by the chart.

use std::collections::HashMap;

use super::theme::Color;
use crate::fetcher::PricePoint;

/// One commodity's price history on the shared chart.
#[derive(Clone, Debug)]
pub struct Series {
	/// Commodity name. Unique within a chart.
	pub label: String,
	/// Points in the order upstream sent them.
	pub points: Vec<PricePoint>,
	pub color: Color,
	by_date: HashMap<String, f64>,
}

impl Series {
	/// Indexes `points` by date for lookups against the shared axis.
	pub fn new(label: impl Into<String>, points: Vec<PricePoint>, color: Color) -> Self {
		let mut by_date = HashMap::with_capacity(points.len());
		for point in &points {
			// First occurrence wins when upstream repeats a date.
			by_date.entry(point.date.clone()).or_insert(point.value);
		}
		Self {
			label: label.into(),
			points,
			color,
			by_date,
		}
	}

	/// Value recorded for `date`, or `None` where the series has a gap.
	pub fn value_at(&self, date: &str) -> Option<f64> {
		self.by_date.get(date).copied()
	}

	/// Dates in point order, duplicates included.
	pub fn dates(&self) -> impl Iterator<Item = &str> {
		self.points.iter().map(|p| p.date.as_str())
	}
}
