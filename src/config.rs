//! Page configuration.
//!
//! The host page may embed a JSON document in
//! `<script id="app-config" type="application/json">` to point the app at
//! other endpoints or restyle the chart. Every field is optional; anything
//! missing keeps its default.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::price_chart::ChartTheme;

/// Id of the script element holding the configuration.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Locations of the two backend collaborators.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
	/// Listing endpoint answering `GET` with the commodity table.
	pub catalog_url: String,
	/// Proxy endpoint answering `POST { code }` with a price series.
	pub prices_url: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			catalog_url: "comm_fetchDB.php".to_string(),
			prices_url: "vantage_fetch.php".to_string(),
		}
	}
}

/// Everything the page can configure.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Where the listing and the price proxy live.
	pub endpoints: Endpoints,
	/// Chart colors and fonts; unset fields keep their defaults.
	pub theme: ChartTheme,
	/// Canvas height in pixels. Width follows the container.
	pub chart_height: f64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			endpoints: Endpoints::default(),
			theme: ChartTheme::default(),
			chart_height: 480.0,
		}
	}
}

impl AppConfig {
	/// Parses a config document. Missing keys fall back to their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Reads the embedded configuration, falling back to defaults.
pub fn load_config() -> AppConfig {
	let Some(text) = config_text() else {
		return AppConfig::default();
	};
	match AppConfig::from_json(&text) {
		Ok(config) => {
			info!(
				"commodity-graph: using endpoints {} and {}",
				config.endpoints.catalog_url, config.endpoints.prices_url
			);
			config
		}
		Err(e) => {
			warn!("commodity-graph: ignoring invalid configuration: {}", e);
			AppConfig::default()
		}
	}
}
