//! Widget button handlers.
//!
//! Each handler takes a ticket from the chart synchronously, awaits the price
//! fetch, then settles the ticket in one signal update. Rejections the user
//! should see become blocking notices; the rest are only logged.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use crate::catalog::Commodity;
use crate::components::price_chart::{ChartState, Completion, FetchTicket};
use crate::fetcher::{FetchError, PriceFetcher, PricePoint};

/// Shows `message` in a blocking browser dialog.
pub fn notify(message: &str) {
	match web_sys::window() {
		Some(window) => {
			let _ = window.alert_with_message(message);
		}
		None => warn!("commodity-graph: {message}"),
	}
}

/// Applies a finished fetch to the chart. Returns a notice for the user, if any.
///
/// Results of fetches the chart no longer waits for are logged at debug and
/// never shown.
pub fn settle(
	chart: &mut ChartState,
	ticket: FetchTicket,
	commodity: &Commodity,
	result: Result<Vec<PricePoint>, FetchError>,
) -> Option<String> {
	match result {
		Ok(points) => match chart.complete(ticket, commodity, points) {
			Ok(Completion::Applied) => None,
			Ok(Completion::Stale) => {
				log_stale(chart, ticket, commodity, "data");
				None
			}
			Err(err) => err.user_message(),
		},
		Err(err) if chart.is_current(&ticket) => err.user_message().map(str::to_owned),
		Err(err) => {
			log_stale(chart, ticket, commodity, &err.to_string());
			None
		}
	}
}

fn log_stale(chart: &ChartState, ticket: FetchTicket, commodity: &Commodity, what: &str) {
	debug!(
		"commodity-graph: dropping {:?} result for {} ({what}); chart reset since, now generation {}",
		ticket.intent(),
		commodity.name,
		chart.generation()
	);
}

fn fetch_and_settle(
	chart: RwSignal<ChartState>,
	fetcher: PriceFetcher,
	ticket: FetchTicket,
	commodity: Commodity,
) {
	spawn_local(async move {
		let result = fetcher.fetch(&commodity.code).await;
		if let Some(message) = chart
			.try_update(|state| settle(state, ticket, &commodity, result))
			.flatten()
		{
			notify(&message);
		}
	});
}

/// "Show Graph": clear the chart, then plot `commodity` alone.
pub fn show_graph(chart: RwSignal<ChartState>, fetcher: PriceFetcher, commodity: Commodity) {
	let Some(ticket) = chart.try_update(ChartState::begin_show) else {
		return;
	};
	fetch_and_settle(chart, fetcher, ticket, commodity);
}

/// "Add to Graph": plot `commodity` next to what is already shown.
pub fn add_to_graph(chart: RwSignal<ChartState>, fetcher: PriceFetcher, commodity: Commodity) {
	let Some(begun) = chart.try_update(|state| state.begin_add(&commodity)) else {
		return;
	};
	match begun {
		Ok(ticket) => fetch_and_settle(chart, fetcher, ticket, commodity),
		Err(err) => {
			if let Some(message) = err.user_message() {
				notify(&message);
			}
		}
	}
}
