//! UI components.

pub mod picker;
pub mod price_chart;
pub mod widgets;
