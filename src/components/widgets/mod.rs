//! Commodity widgets: one card per selected commodity, wired to the chart.

mod component;
mod registry;

pub use component::{CommodityWidget, WidgetCallback, WidgetList};
pub use registry::{Widget, WidgetAction, WidgetRegistry};
