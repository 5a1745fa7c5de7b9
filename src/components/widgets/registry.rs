//! One widget per selected commodity.
//!
//! The registry only tracks which widgets exist. It never touches the chart:
//! a commodity can stay plotted after its widget is removed, and a widget
//! survives the chart being cleared.

use log::debug;

use crate::catalog::{Commodity, CommodityId};

/// Buttons a widget offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetAction {
	/// Replace the chart with this commodity.
	Show,
	/// Add this commodity to the current chart.
	Add,
	/// Drop the widget.
	Remove,
}

/// A commodity card with its controls.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
	/// The commodity this card controls.
	pub commodity: Commodity,
}

impl Widget {
	/// DOM id of the widget element.
	pub fn element_id(&self) -> String {
		format!("widget-{}", self.commodity.id)
	}

	/// Subtitle under the widget heading.
	pub fn description(&self) -> String {
		format!("Global price of {}", self.commodity.name)
	}
}

/// Widgets in the order they were created.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetRegistry {
	widgets: Vec<Widget>,
}

impl WidgetRegistry {
	/// Creates a widget for `commodity` unless one exists. Returns whether it did.
	pub fn ensure(&mut self, commodity: &Commodity) -> bool {
		if self.contains(&commodity.id) {
			debug!("commodity-graph: widget for {} already shown", commodity.name);
			return false;
		}
		self.widgets.push(Widget {
			commodity: commodity.clone(),
		});
		true
	}

	/// Removes the widget for `id`. Returns whether one was removed.
	pub fn remove(&mut self, id: &CommodityId) -> bool {
		let before = self.widgets.len();
		self.widgets.retain(|w| &w.commodity.id != id);
		self.widgets.len() != before
	}

	/// Whether a widget for `id` is shown.
	pub fn contains(&self, id: &CommodityId) -> bool {
		self.widgets.iter().any(|w| &w.commodity.id == id)
	}

	/// Widgets in creation order.
	pub fn widgets(&self) -> &[Widget] {
		&self.widgets
	}

	pub fn len(&self) -> usize {
		self.widgets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.widgets.is_empty()
	}
}
