//! Commodity catalog loaded once from the listing endpoint.
//!
//! The listing answers with one of three JSON shapes: an array of commodity
//! records, `{ "message": ... }` when the table is empty, or
//! `{ "error": ... }` when the query failed. The catalog keeps the records
//! sorted by name and backs both the dropdown and id lookups.

use std::cmp::Ordering;
use std::fmt;

use gloo_net::http::Request;
use log::{error, info, warn};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Text of the disabled entry shown before any commodity is chosen.
pub const PLACEHOLDER_LABEL: &str = "Select a commodity...";

/// Opaque, stable commodity identifier.
///
/// The listing may send ids as JSON strings or numbers; both are kept as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommodityId(String);

impl CommodityId {
	/// Wraps an id as sent by the listing.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The id as text, the form used for dropdown values.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CommodityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for CommodityId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl<'de> Deserialize<'de> for CommodityId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Text(String),
			Number(serde_json::Number),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Text(text) => Self(text),
			RawId::Number(number) => Self(number.to_string()),
		})
	}
}

/// A tradable good as listed in the database.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Commodity {
	/// Database key, also the dropdown value.
	pub id: CommodityId,
	/// Display name; doubles as the series label on the chart.
	pub name: String,
	/// Parameter forwarded to the price proxy (e.g. "WTI", "COPPER").
	pub code: String,
	/// Free-text description shown as the widget tooltip.
	#[serde(default)]
	pub information: Option<String>,
}

/// The three payload shapes the listing endpoint produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingResponse {
	/// Records in database order.
	Commodities(Vec<Commodity>),
	/// The query failed.
	Error { error: String },
	/// The table is empty.
	Message { message: String },
}

/// Why the catalog could not be populated.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// The listing holds no commodities. Informational, not a failure.
	#[error("{0}")]
	Empty(String),
	/// Transport, status or payload failure. The catalog stays empty.
	#[error("failed to load commodities: {0}")]
	LoadFailed(String),
}

impl From<gloo_net::Error> for CatalogError {
	fn from(err: gloo_net::Error) -> Self {
		CatalogError::LoadFailed(err.to_string())
	}
}

impl From<serde_json::Error> for CatalogError {
	fn from(err: serde_json::Error) -> Self {
		CatalogError::LoadFailed(format!("unexpected response: {err}"))
	}
}

/// One `<option>` of the commodity dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownOption {
	/// Commodity id, empty for the placeholder.
	pub value: String,
	pub label: String,
	pub disabled: bool,
}

/// Commodities sorted by name in locale order, ignoring case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
	commodities: Vec<Commodity>,
}

impl Catalog {
	/// Builds a catalog from records in any order.
	pub fn new(mut commodities: Vec<Commodity>) -> Self {
		let order = name_order();
		// Raw name breaks ties so that "oil" and "Oil" keep a stable order.
		commodities.sort_by(|a, b| order(&a.name, &b.name).then_with(|| a.name.cmp(&b.name)));
		Self { commodities }
	}

	/// Interprets a decoded listing payload.
	pub fn from_listing(listing: ListingResponse) -> Result<Self, CatalogError> {
		match listing {
			ListingResponse::Commodities(records) if records.is_empty() => {
				Err(CatalogError::Empty("No commodities found.".to_string()))
			}
			ListingResponse::Commodities(records) => Ok(Self::new(records)),
			ListingResponse::Message { message } => Err(CatalogError::Empty(message)),
			ListingResponse::Error { error } => Err(CatalogError::LoadFailed(error)),
		}
	}

	/// Parses a raw listing body.
	pub fn from_json(body: &str) -> Result<Self, CatalogError> {
		let listing: ListingResponse = serde_json::from_str(body)?;
		Self::from_listing(listing)
	}

	/// Issues the single startup read against the listing endpoint. No retry.
	pub async fn load(url: &str) -> Result<Self, CatalogError> {
		let response = Request::get(url)
			.header("Content-Type", "application/json")
			.send()
			.await?;
		if !response.ok() {
			return Err(CatalogError::LoadFailed(format!(
				"{url} answered with status {}",
				response.status()
			)));
		}
		let body = response.text().await?;
		let catalog = Self::from_json(&body)?;
		info!("commodity-graph: loaded {} commodities", catalog.len());
		Ok(catalog)
	}

	/// Records in display order.
	pub fn commodities(&self) -> &[Commodity] {
		&self.commodities
	}

	/// Number of commodities listed.
	pub fn len(&self) -> usize {
		self.commodities.len()
	}

	/// True when nothing is listed.
	pub fn is_empty(&self) -> bool {
		self.commodities.is_empty()
	}

	/// Linear lookup. `None` means the caller should do nothing.
	pub fn find_by_id(&self, id: &str) -> Option<&Commodity> {
		let found = self.commodities.iter().find(|c| c.id.as_str() == id);
		if found.is_none() {
			warn!("commodity-graph: no commodity with id {id:?}");
		}
		found
	}

	/// Placeholder first, then one entry per commodity in catalog order.
	pub fn dropdown_options(&self) -> Vec<DropdownOption> {
		let placeholder = DropdownOption {
			value: String::new(),
			label: PLACEHOLDER_LABEL.to_string(),
			disabled: true,
		};
		std::iter::once(placeholder)
			.chain(self.commodities.iter().map(|c| DropdownOption {
				value: c.id.to_string(),
				label: c.name.clone(),
				disabled: false,
			}))
			.collect()
	}
}

/// Case-insensitive, accent-aware name comparison using the browser's collator.
#[cfg(target_arch = "wasm32")]
fn name_order() -> impl Fn(&str, &str) -> Ordering {
	use js_sys::{Array, JsString, Object, Reflect};
	use wasm_bindgen::JsValue;

	let options = Object::new();
	if Reflect::set(&options, &JsValue::from_str("sensitivity"), &JsValue::from_str("accent")).is_err() {
		warn!("commodity-graph: collator options rejected, using browser defaults");
	}
	let locales = Array::new();
	move |a: &str, b: &str| JsString::from(a).locale_compare(b, &locales, &options).cmp(&0)
}

/// Host builds collate with ICU root rules at secondary strength, which
/// ignores case but not accents, like `sensitivity: "accent"` in the browser.
#[cfg(not(target_arch = "wasm32"))]
fn name_order() -> impl Fn(&str, &str) -> Ordering {
	use icu_collator::Collator;
	use icu_collator::options::{CollatorOptions, Strength};

	let mut options = CollatorOptions::default();
	options.strength = Some(Strength::Secondary);
	let collator = Collator::try_new(Default::default(), options)
		.inspect_err(|err| warn!("commodity-graph: no collator ({err}), comparing lowercase names"))
		.ok();
	move |a: &str, b: &str| match &collator {
		Some(collator) => collator.compare(a, b),
		None => a.to_lowercase().cmp(&b.to_lowercase()),
	}
}

/// What the page shows while and after the catalog loads.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CatalogStatus {
	/// The startup read is in flight.
	#[default]
	Loading,
	/// Dropdown can be populated.
	Ready(Catalog),
	/// Listing is empty; carries the message to display instead of a dropdown.
	Empty(String),
	/// Load failed; dropdown stays empty.
	Unavailable,
}

impl CatalogStatus {
	/// The loaded catalog, if any.
	pub fn catalog(&self) -> Option<&Catalog> {
		match self {
			CatalogStatus::Ready(catalog) => Some(catalog),
			_ => None,
		}
	}
}

impl From<Result<Catalog, CatalogError>> for CatalogStatus {
	fn from(result: Result<Catalog, CatalogError>) -> Self {
		match result {
			Ok(catalog) => CatalogStatus::Ready(catalog),
			Err(CatalogError::Empty(message)) => {
				info!("commodity-graph: {message}");
				CatalogStatus::Empty(message)
			}
			Err(err) => {
				error!("commodity-graph: catalog unavailable: {err}");
				CatalogStatus::Unavailable
			}
		}
	}
}
