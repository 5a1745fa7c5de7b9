//! Price series requests against the proxy endpoint.
//!
//! The proxy takes `{ "code": ... }` and answers with either an array of
//! `{ date, value }` records or `{ error }`. Values arrive as strings or
//! numbers; anything that does not parse becomes `NaN` and is kept so the
//! renderer can break the line there.

use gloo_net::http::Request;
use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observation of a commodity price.
#[derive(Clone, Debug, PartialEq)]
pub struct PricePoint {
	/// Calendar date as sent upstream (`YYYY-MM-DD`).
	pub date: String,
	/// `NaN` when upstream sent something that is not a number.
	pub value: f64,
}

impl PricePoint {
	/// A point at `date` with `value`.
	pub fn new(date: impl Into<String>, value: f64) -> Self {
		Self {
			date: date.into(),
			value,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
	Number(f64),
	Text(String),
	Missing(()),
	/// Booleans, objects and arrays: kept as a gap rather than failing the series.
	Other(serde_json::Value),
}

impl Default for RawValue {
	fn default() -> Self {
		RawValue::Missing(())
	}
}

impl RawValue {
	fn to_f64(&self) -> f64 {
		match self {
			RawValue::Number(n) => *n,
			RawValue::Text(text) => text.trim().parse().unwrap_or(f64::NAN),
			RawValue::Missing(()) | RawValue::Other(_) => f64::NAN,
		}
	}
}

#[derive(Debug, Deserialize)]
struct RawPoint {
	date: String,
	#[serde(default)]
	value: RawValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProxyResponse {
	Points(Vec<RawPoint>),
	Error { error: String },
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
	code: &'a str,
}

/// Why a price series could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
	/// Reported by the proxy: missing code, upstream unreachable, rate limit,
	/// or unexpected upstream shape. The text is shown to the user verbatim.
	#[error("{0}")]
	Upstream(String),
	/// Network, status or decoding failure. Logged only.
	#[error("error fetching commodity prices: {0}")]
	Transport(String),
}

impl FetchError {
	/// Message for a blocking notice, if the user should see this failure.
	pub fn user_message(&self) -> Option<&str> {
		match self {
			FetchError::Upstream(message) => Some(message),
			FetchError::Transport(_) => None,
		}
	}
}

impl From<gloo_net::Error> for FetchError {
	fn from(err: gloo_net::Error) -> Self {
		FetchError::Transport(err.to_string())
	}
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		FetchError::Transport(format!("unexpected response: {err}"))
	}
}

/// Decodes a proxy response body into points, preserving upstream order.
pub fn parse_series(body: &str) -> Result<Vec<PricePoint>, FetchError> {
	match serde_json::from_str::<ProxyResponse>(body)? {
		ProxyResponse::Points(points) => Ok(points
			.into_iter()
			.map(|p| PricePoint {
				value: p.value.to_f64(),
				date: p.date,
			})
			.collect()),
		ProxyResponse::Error { error } => Err(FetchError::Upstream(error)),
	}
}

/// Client for the price proxy.
#[derive(Clone, Debug)]
pub struct PriceFetcher {
	url: String,
}

impl PriceFetcher {
	/// Fetcher posting to the proxy at `url`.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into() }
	}

	/// Requests the series for one commodity code. No retry on failure.
	pub async fn fetch(&self, code: &str) -> Result<Vec<PricePoint>, FetchError> {
		let result = self.request(code).await;
		match &result {
			Ok(points) => info!("commodity-graph: received {} points for {code}", points.len()),
			Err(err @ FetchError::Transport(_)) => error!("commodity-graph: {err}"),
			Err(FetchError::Upstream(message)) => {
				info!("commodity-graph: proxy refused {code}: {message}")
			}
		}
		result
	}

	async fn request(&self, code: &str) -> Result<Vec<PricePoint>, FetchError> {
		let response = Request::post(&self.url)
			.json(&ProxyRequest { code })?
			.send()
			.await?;
		if !response.ok() {
			return Err(FetchError::Transport(format!(
				"{} answered with status {}",
				self.url,
				response.status()
			)));
		}
		let body = response.text().await?;
		parse_series(&body)
	}
}
