//! Leptos components for the widget list.

use leptos::prelude::*;

use super::registry::{Widget, WidgetAction, WidgetRegistry};
use crate::catalog::Commodity;

/// Callback fired by widget buttons.
pub type WidgetCallback = Callback<(Commodity, WidgetAction)>;

/// A single commodity card with "Show Graph", "Add to Graph" and "Remove".
#[component]
pub fn CommodityWidget(widget: Widget, on_action: WidgetCallback) -> impl IntoView {
	let element_id = widget.element_id();
	let description = widget.description();
	let Widget { commodity } = widget;
	let tooltip = commodity.information.clone().unwrap_or_default();
	let heading = commodity.name.clone();

	let button = move |label: &'static str, action: WidgetAction| {
		let commodity = commodity.clone();
		view! {
			<button on:click=move |_| on_action.run((commodity.clone(), action))>{label}</button>
		}
	};

	view! {
		<div class="widget" id=element_id title=tooltip>
			<h3>{heading}</h3>
			<p>{description}</p>
			{button("Show Graph", WidgetAction::Show)}
			{button("Add to Graph", WidgetAction::Add)}
			{button("Remove", WidgetAction::Remove)}
		</div>
	}
}

/// All widgets currently in the registry, in creation order.
#[component]
pub fn WidgetList(registry: RwSignal<WidgetRegistry>, on_action: WidgetCallback) -> impl IntoView {
	view! {
		<div id="widgetContainer" class="widget-container">
			<For
				each=move || registry.with(|r| r.widgets().to_vec())
				key=|widget| widget.commodity.id.clone()
				children=move |widget: Widget| {
					view! { <CommodityWidget widget=widget on_action=on_action /> }
				}
			/>
		</div>
	}
}
