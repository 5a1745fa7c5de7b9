//! Chart state machine shared by every widget.
//!
//! There is at most one chart. It is either empty or active with one or more
//! series that share a single date axis. Fetches run between a button click
//! and the state change they cause, so every click first takes a
//! [`FetchTicket`] stamped with the current chart generation. `reset` moves to
//! a new generation, and a completion whose ticket belongs to an older one is
//! discarded. The last click wins, not the last response.

use std::collections::BTreeSet;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use super::theme::Color;
use super::types::Series;
use crate::catalog::Commodity;
use crate::fetcher::PricePoint;

/// Rejected chart mutations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChartError {
	/// "Add to Graph" before any "Show Graph".
	#[error("Please click 'Show Graph' on a commodity first to initialise the graph.")]
	NotInitialized,
	/// A series with this label is already plotted.
	#[error("{0} is already in the graph.")]
	DuplicateSeries(String),
	/// `initialize` while a chart is showing; callers reset first.
	#[error("a chart is already active, reset it before initializing")]
	AlreadyActive,
}

impl ChartError {
	/// Message for a blocking notice, if the user should see this rejection.
	pub fn user_message(&self) -> Option<String> {
		match self {
			ChartError::NotInitialized | ChartError::DuplicateSeries(_) => Some(self.to_string()),
			ChartError::AlreadyActive => None,
		}
	}
}

/// What a pending fetch will do once its data arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchIntent {
	/// Replace the chart with this commodity alone.
	Show,
	/// Add this commodity to the current chart.
	Add,
}

/// Issued when a fetch starts; presented again when it completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	generation: u64,
	intent: FetchIntent,
}

impl FetchTicket {
	/// What the fetch was started for.
	pub fn intent(&self) -> FetchIntent {
		self.intent
	}
}

/// Result of presenting a ticket with its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
	/// The data is now on the chart.
	Applied,
	/// The chart was reset after the ticket was issued.
	Stale,
}

#[derive(Clone, Debug)]
struct ActiveChart {
	series: Vec<Series>,
	axis_labels: Vec<String>,
}

impl ActiveChart {
	fn contains(&self, label: &str) -> bool {
		self.series.iter().any(|s| s.label == label)
	}

	/// Sorted, deduplicated union of every series' dates.
	fn merge_axis(&mut self) {
		let labels: BTreeSet<&str> = self.series.iter().flat_map(Series::dates).collect();
		self.axis_labels = labels.into_iter().map(str::to_owned).collect();
	}
}

/// The single chart and its generation counter.
#[derive(Clone, Debug)]
pub struct ChartState {
	generation: u64,
	chart: Option<ActiveChart>,
	rng: StdRng,
}

impl Default for ChartState {
	fn default() -> Self {
		Self::with_rng(StdRng::from_entropy())
	}
}

impl ChartState {
	/// Empty state drawing series colors from `rng`.
	pub fn with_rng(rng: StdRng) -> Self {
		Self {
			generation: 0,
			chart: None,
			rng,
		}
	}

	/// True once a Show has plotted something and no reset followed.
	pub fn is_active(&self) -> bool {
		self.chart.is_some()
	}

	/// Bumped by every reset; tickets from older generations are stale.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Series in the order they joined the chart.
	pub fn series(&self) -> &[Series] {
		match &self.chart {
			Some(chart) => &chart.series,
			None => &[],
		}
	}

	/// Sorted union of every plotted date; empty when no chart exists.
	pub fn axis_labels(&self) -> &[String] {
		match &self.chart {
			Some(chart) => &chart.axis_labels,
			None => &[],
		}
	}

	/// Whether a series with `label` is plotted.
	pub fn contains(&self, label: &str) -> bool {
		self.chart.as_ref().is_some_and(|c| c.contains(label))
	}

	/// Disposes the chart if there is one and invalidates every pending fetch.
	pub fn reset(&mut self) {
		self.generation += 1;
		if self.chart.take().is_some() {
			info!("commodity-graph: chart cleared");
		}
	}

	/// Starts a chart with one series. The chart must be empty.
	pub fn initialize(
		&mut self,
		commodity: &Commodity,
		points: Vec<PricePoint>,
	) -> Result<(), ChartError> {
		if self.is_active() {
			warn!("commodity-graph: initialize called on an active chart");
			return Err(ChartError::AlreadyActive);
		}
		let mut chart = ActiveChart {
			series: vec![Series::new(&commodity.name, points, Color::random(&mut self.rng))],
			axis_labels: Vec::new(),
		};
		chart.merge_axis();
		info!(
			"commodity-graph: chart shows {} over {} dates",
			commodity.name,
			chart.axis_labels.len()
		);
		self.chart = Some(chart);
		Ok(())
	}

	/// Adds a series to the active chart and merges its dates into the axis.
	pub fn append(
		&mut self,
		commodity: &Commodity,
		points: Vec<PricePoint>,
	) -> Result<(), ChartError> {
		self.check_append(commodity)?;
		let color = Color::random(&mut self.rng);
		let Some(chart) = self.chart.as_mut() else {
			return Err(ChartError::NotInitialized);
		};
		chart.series.push(Series::new(&commodity.name, points, color));
		chart.merge_axis();
		info!(
			"commodity-graph: added {} ({} series, {} dates)",
			commodity.name,
			chart.series.len(),
			chart.axis_labels.len()
		);
		Ok(())
	}

	fn check_append(&self, commodity: &Commodity) -> Result<(), ChartError> {
		let result = match &self.chart {
			None => Err(ChartError::NotInitialized),
			Some(chart) if chart.contains(&commodity.name) => {
				Err(ChartError::DuplicateSeries(commodity.name.clone()))
			}
			Some(_) => Ok(()),
		};
		if let Err(err) = &result {
			warn!("commodity-graph: {err}");
		}
		result
	}

	/// "Show Graph": clears the chart now and tags the fetch that will refill it.
	pub fn begin_show(&mut self) -> FetchTicket {
		self.reset();
		self.ticket(FetchIntent::Show)
	}

	/// "Add to Graph": refuses early when the add could never apply.
	pub fn begin_add(&mut self, commodity: &Commodity) -> Result<FetchTicket, ChartError> {
		self.check_append(commodity)?;
		Ok(self.ticket(FetchIntent::Add))
	}

	fn ticket(&self, intent: FetchIntent) -> FetchTicket {
		FetchTicket {
			generation: self.generation,
			intent,
		}
	}

	/// Whether a completion for `ticket` would still be applied.
	pub fn is_current(&self, ticket: &FetchTicket) -> bool {
		ticket.generation == self.generation
	}

	/// Applies fetched data for `ticket`, unless the chart moved on meanwhile.
	pub fn complete(
		&mut self,
		ticket: FetchTicket,
		commodity: &Commodity,
		points: Vec<PricePoint>,
	) -> Result<Completion, ChartError> {
		if !self.is_current(&ticket) {
			return Ok(Completion::Stale);
		}
		match ticket.intent {
			FetchIntent::Show => self.initialize(commodity, points)?,
			FetchIntent::Add => self.append(commodity, points)?,
		}
		Ok(Completion::Applied)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> ChartState {
		ChartState::with_rng(StdRng::seed_from_u64(42))
	}

	fn commodity(id: &str, name: &str) -> Commodity {
		Commodity {
			id: id.into(),
			name: name.to_string(),
			code: name.to_uppercase(),
			information: None,
		}
	}

	fn points(entries: &[(&str, f64)]) -> Vec<PricePoint> {
		entries.iter().map(|&(d, v)| PricePoint::new(d, v)).collect()
	}

	fn labels(state: &ChartState) -> Vec<&str> {
		state.series().iter().map(|s| s.label.as_str()).collect()
	}

	#[test]
	fn initialize_creates_single_series_with_sorted_axis() {
		let mut chart = state();
		let oil = commodity("1", "Oil");
		chart
			.initialize(&oil, points(&[("2024-03-01", 3.0), ("2024-01-01", 1.0)]))
			.unwrap();

		assert!(chart.is_active());
		assert_eq!(labels(&chart), ["Oil"]);
		assert_eq!(chart.axis_labels(), ["2024-01-01", "2024-03-01"]);
		// Points keep upstream order; only the axis is sorted.
		assert_eq!(chart.series()[0].points[0].date, "2024-03-01");
	}

	#[test]
	fn append_on_empty_chart_is_rejected() {
		let mut chart = state();
		let err = chart.append(&commodity("1", "Oil"), points(&[("2024-01-01", 1.0)]));

		assert_eq!(err, Err(ChartError::NotInitialized));
		assert!(!chart.is_active());
		assert!(chart.series().is_empty());
		assert!(chart.axis_labels().is_empty());
	}

	#[test]
	fn duplicate_label_leaves_chart_unchanged() {
		let mut chart = state();
		let oil = commodity("1", "Oil");
		chart.initialize(&oil, points(&[("2024-01-01", 1.0)])).unwrap();

		let err = chart.append(&oil, points(&[("2024-02-01", 2.0)]));
		assert_eq!(err, Err(ChartError::DuplicateSeries("Oil".into())));
		assert_eq!(chart.series().len(), 1);
		assert_eq!(chart.axis_labels(), ["2024-01-01"]);
	}

	#[test]
	fn append_merges_axis_and_keeps_gaps() {
		let mut chart = state();
		let a = commodity("1", "Aluminum");
		let b = commodity("2", "Brent");
		chart
			.initialize(&a, points(&[("2024-01-01", 10.0), ("2024-03-01", 30.0)]))
			.unwrap();
		chart
			.append(&b, points(&[("2024-02-01", 20.0), ("2024-03-01", 35.0)]))
			.unwrap();

		assert_eq!(chart.axis_labels(), ["2024-01-01", "2024-02-01", "2024-03-01"]);
		let series = chart.series();
		assert_eq!(series[0].points.len(), 2);
		assert_eq!(series[0].value_at("2024-02-01"), None);
		assert_eq!(series[1].value_at("2024-01-01"), None);
		assert_eq!(series[1].value_at("2024-03-01"), Some(35.0));
	}

	#[test]
	fn axis_is_union_of_all_series() {
		let mut chart = state();
		chart
			.initialize(&commodity("1", "A"), points(&[("2023-05-01", 1.0), ("2023-01-01", 1.0)]))
			.unwrap();
		chart
			.append(&commodity("2", "B"), points(&[("2023-05-01", 2.0), ("2022-12-01", 2.0)]))
			.unwrap();
		chart
			.append(&commodity("3", "C"), points(&[("2024-01-01", 3.0)]))
			.unwrap();

		let mut expected: Vec<String> = chart
			.series()
			.iter()
			.flat_map(|s| s.dates().map(str::to_owned))
			.collect();
		expected.sort();
		expected.dedup();
		assert_eq!(chart.axis_labels(), expected.as_slice());
		assert_eq!(chart.axis_labels().len(), 4);
	}

	#[test]
	fn reset_then_initialize_has_no_residue() {
		let mut chart = state();
		chart
			.initialize(&commodity("1", "Oil"), points(&[("2024-01-01", 1.0)]))
			.unwrap();
		chart
			.append(&commodity("2", "Gold"), points(&[("2024-02-01", 2.0)]))
			.unwrap();

		chart.reset();
		assert!(!chart.is_active());
		assert!(chart.series().is_empty());

		chart
			.initialize(&commodity("3", "Corn"), points(&[("2020-01-01", 5.0)]))
			.unwrap();
		assert_eq!(labels(&chart), ["Corn"]);
		assert_eq!(chart.axis_labels(), ["2020-01-01"]);
	}

	#[test]
	fn reset_on_empty_chart_is_harmless() {
		let mut chart = state();
		chart.reset();
		chart.reset();
		assert!(!chart.is_active());
		assert_eq!(chart.generation(), 2);
	}

	#[test]
	fn initialize_requires_empty_chart() {
		let mut chart = state();
		chart
			.initialize(&commodity("1", "Oil"), points(&[("2024-01-01", 1.0)]))
			.unwrap();
		let err = chart.initialize(&commodity("2", "Gold"), points(&[]));
		assert_eq!(err, Err(ChartError::AlreadyActive));
		assert_eq!(err.unwrap_err().user_message(), None);
		assert_eq!(labels(&chart), ["Oil"]);
	}

	#[test]
	fn stale_show_is_discarded() {
		let mut chart = state();
		let a = commodity("1", "Oil");
		let b = commodity("2", "Gold");

		let ticket_a = chart.begin_show();
		let ticket_b = chart.begin_show();

		// B resolves first, then A's late response arrives.
		let applied = chart.complete(ticket_b, &b, points(&[("2024-01-01", 2.0)]));
		assert_eq!(applied, Ok(Completion::Applied));
		let stale = chart.complete(ticket_a, &a, points(&[("2023-01-01", 1.0)]));
		assert_eq!(stale, Ok(Completion::Stale));

		assert_eq!(labels(&chart), ["Gold"]);
		assert_eq!(chart.axis_labels(), ["2024-01-01"]);
	}

	#[test]
	fn stale_show_resolving_first_is_discarded() {
		let mut chart = state();
		let a = commodity("1", "Oil");
		let b = commodity("2", "Gold");

		let ticket_a = chart.begin_show();
		let ticket_b = chart.begin_show();

		assert_eq!(chart.complete(ticket_a, &a, points(&[])), Ok(Completion::Stale));
		assert!(!chart.is_active());
		assert_eq!(
			chart.complete(ticket_b, &b, points(&[("2024-01-01", 2.0)])),
			Ok(Completion::Applied)
		);
		assert_eq!(labels(&chart), ["Gold"]);
	}

	#[test]
	fn add_issued_before_new_show_is_discarded() {
		let mut chart = state();
		let oil = commodity("1", "Oil");
		let gold = commodity("2", "Gold");
		let corn = commodity("3", "Corn");
		chart.initialize(&oil, points(&[("2024-01-01", 1.0)])).unwrap();

		let add_gold = chart.begin_add(&gold).unwrap();
		let show_corn = chart.begin_show();
		chart
			.complete(show_corn, &corn, points(&[("2024-01-01", 3.0)]))
			.unwrap();

		assert_eq!(
			chart.complete(add_gold, &gold, points(&[("2024-01-01", 2.0)])),
			Ok(Completion::Stale)
		);
		assert_eq!(labels(&chart), ["Corn"]);
	}

	#[test]
	fn clear_invalidates_pending_show() {
		let mut chart = state();
		let ticket = chart.begin_show();
		chart.reset();

		assert!(!chart.is_current(&ticket));
		assert_eq!(
			chart.complete(ticket, &commodity("1", "Oil"), points(&[("2024-01-01", 1.0)])),
			Ok(Completion::Stale)
		);
		assert!(!chart.is_active());
	}

	#[test]
	fn begin_add_guards_before_fetching() {
		let mut chart = state();
		let oil = commodity("1", "Oil");
		assert_eq!(chart.begin_add(&oil), Err(ChartError::NotInitialized));

		chart.initialize(&oil, points(&[("2024-01-01", 1.0)])).unwrap();
		assert_eq!(chart.begin_add(&oil), Err(ChartError::DuplicateSeries("Oil".into())));

		let gold = commodity("2", "Gold");
		let ticket = chart.begin_add(&gold).unwrap();
		assert_eq!(ticket.intent(), FetchIntent::Add);
		assert!(chart.is_current(&ticket));
	}

	#[test]
	fn concurrent_adds_of_same_commodity_apply_once() {
		let mut chart = state();
		let oil = commodity("1", "Oil");
		let gold = commodity("2", "Gold");
		chart.initialize(&oil, points(&[("2024-01-01", 1.0)])).unwrap();

		let first = chart.begin_add(&gold).unwrap();
		let second = chart.begin_add(&gold).unwrap();
		assert_eq!(
			chart.complete(first, &gold, points(&[("2024-01-01", 2.0)])),
			Ok(Completion::Applied)
		);
		assert_eq!(
			chart.complete(second, &gold, points(&[("2024-01-01", 2.0)])),
			Err(ChartError::DuplicateSeries("Gold".into()))
		);
		assert_eq!(chart.series().len(), 2);
	}

	#[test]
	fn each_series_gets_its_own_color() {
		let mut chart = state();
		chart.initialize(&commodity("1", "A"), points(&[])).unwrap();
		chart.append(&commodity("2", "B"), points(&[])).unwrap();
		chart.append(&commodity("3", "C"), points(&[])).unwrap();

		let colors: Vec<_> = chart.series().iter().map(|s| s.color).collect();
		assert!(colors[0] != colors[1] || colors[1] != colors[2]);
	}

	#[test]
	fn user_messages_match_notices() {
		assert_eq!(
			ChartError::DuplicateSeries("Gold".into()).user_message().as_deref(),
			Some("Gold is already in the graph.")
		);
		assert!(
			ChartError::NotInitialized
				.user_message()
				.is_some_and(|m| m.contains("Show Graph"))
		);
	}
}
