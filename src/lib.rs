//! commodity-graph: compare historical commodity prices on one chart.
//!
//! This crate provides a WASM front end that lists commodities from a
//! database-backed endpoint, keeps one widget per chosen commodity, and plots
//! price series fetched through a proxy onto a single shared canvas chart.

#[cfg(target_arch = "wasm32")]
use getrandom as _;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info};

pub mod catalog;
pub mod components;
pub mod config;
pub mod controller;
pub mod fetcher;

pub use catalog::{Catalog, CatalogStatus, Commodity, CommodityId};
pub use components::picker::CommodityPicker;
pub use components::price_chart::{ChartState, PriceChartCanvas};
pub use components::widgets::{WidgetAction, WidgetList, WidgetRegistry};
pub use config::AppConfig;
pub use fetcher::{PriceFetcher, PricePoint};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("commodity-graph: logging initialized");
}

/// Main application component.
///
/// Owns the catalog, the widget registry and the chart state, loads the
/// catalog once on mount, and routes widget buttons to the chart.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let AppConfig {
		endpoints,
		theme,
		chart_height,
	} = config::load_config();

	let catalog = RwSignal::new(CatalogStatus::Loading);
	let registry = RwSignal::new(WidgetRegistry::default());
	let chart = RwSignal::new(ChartState::default());
	let fetcher = PriceFetcher::new(endpoints.prices_url);

	let catalog_url = endpoints.catalog_url;
	spawn_local(async move {
		catalog.set(Catalog::load(&catalog_url).await.into());
	});

	let on_select = Callback::new(move |commodity: Commodity| {
		registry.update(|r| {
			r.ensure(&commodity);
		});
	});

	let on_action = Callback::new(move |(commodity, action): (Commodity, WidgetAction)| {
		match action {
			WidgetAction::Show => controller::show_graph(chart, fetcher.clone(), commodity),
			WidgetAction::Add => controller::add_to_graph(chart, fetcher.clone(), commodity),
			WidgetAction::Remove => registry.update(|r| {
				r.remove(&commodity.id);
			}),
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Commodity Prices" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="commodity-graph">
			<section class="controls">
				<CommodityPicker catalog=catalog on_select=on_select />
				<button id="clearGraphButton" on:click=move |_| chart.update(ChartState::reset)>
					"Clear Graph"
				</button>
			</section>
			<WidgetList registry=registry on_action=on_action />
			<section class="graph">
				<PriceChartCanvas state=chart theme=theme height=chart_height />
			</section>
		</main>
	}
}
