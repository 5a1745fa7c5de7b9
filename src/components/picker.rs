//! Commodity dropdown fed by the catalog.

use leptos::prelude::*;

use crate::catalog::{Catalog, CatalogStatus, Commodity};

/// Dropdown listing the catalog. Picking an entry calls `on_select`.
///
/// While the catalog loads a short notice is shown instead; an empty listing
/// shows its message. A failed load leaves only the placeholder.
#[component]
pub fn CommodityPicker(
	catalog: RwSignal<CatalogStatus>,
	on_select: Callback<Commodity>,
) -> impl IntoView {
	let on_change = move |ev: leptos::ev::Event| {
		let id = event_target_value(&ev);
		let selected = catalog.with_untracked(|status| {
			status
				.catalog()
				.and_then(|c| c.find_by_id(&id))
				.cloned()
		});
		if let Some(commodity) = selected {
			on_select.run(commodity);
		}
	};

	move || match catalog.get() {
		CatalogStatus::Loading => {
			view! { <p class="catalog-status">"Loading commodities..."</p> }.into_any()
		}
		CatalogStatus::Empty(message) => {
			view! { <p class="catalog-status">{message}</p> }.into_any()
		}
		status => {
			let options = status
				.catalog()
				.map(Catalog::dropdown_options)
				.unwrap_or_else(|| Catalog::default().dropdown_options());
			view! {
				<select id="widgetDropdown" on:change=on_change>
					{options
						.into_iter()
						.map(|option| {
							view! {
								<option
									value=option.value
									disabled=option.disabled
									selected=option.disabled
								>
									{option.label}
								</option>
							}
						})
						.collect_view()}
				</select>
			}
			.into_any()
		}
	}
}
