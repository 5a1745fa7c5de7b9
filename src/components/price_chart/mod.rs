//! Shared price chart.
//!
//! Holds at most one chart with any number of commodity series on a merged
//! date axis, and renders it on an HTML canvas:
//! - [`ChartState`] tracks series, the axis and the generation used to drop
//!   responses that arrive after the chart was reset
//! - [`ChartLayout`] maps dates and prices onto the canvas
//! - [`PriceChartCanvas`] redraws whenever the state signal changes
//!
//! # Example
//!
//! ```ignore
//! let chart = RwSignal::new(ChartState::default());
//! view! { <PriceChartCanvas state=chart height=480.0 /> }
//! ```

mod component;
pub mod layout;
mod render;
mod state;
pub mod theme;
mod types;

pub use component::PriceChartCanvas;
pub use layout::ChartLayout;
pub use state::{ChartError, ChartState, Completion, FetchIntent, FetchTicket};
pub use theme::{ChartTheme, Color};
pub use types::Series;
