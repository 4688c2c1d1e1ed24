//! Result View Component
//!
//! Totals summary, the item list, and the save / start-over actions.

use leptos::prelude::*;

use crate::app::{export_image, UiState};
use crate::components::ItemRow;
use crate::summary::format_amount;

#[component]
pub fn ResultView(state: UiState) -> impl IntoView {
    let totals = move || state.with(|s| s.totals());

    view! {
        <div class="result">
            <div class="result-card">
                <div class="summary">
                    <p class="summary-label">"Total Reduction"</p>
                    <div class="summary-amount">
                        <span class="summary-arrow">"▼"</span>
                        <span class="summary-diff">{move || format_amount(totals().diff)}</span>
                        <span class="summary-yen">"円"</span>
                    </div>
                    <p class="summary-target">{move || totals().breakdown()}</p>
                </div>

                <div class="items">
                    {move || {
                        state
                            .with(|s| s.items.clone())
                            .into_iter()
                            .map(|item| view! { <ItemRow item=item /> })
                            .collect_view()
                    }}
                </div>

                <div class="result-footer">"Powered by Gemini AI"</div>
            </div>

            <div class="actions">
                <button class="secondary-button" on:click=move |_| export_image(state)>
                    "画像保存"
                </button>
                <button class="muted-button" on:click=move |_| state.update(|s| s.start_over())>
                    "もう一度"
                </button>
            </div>
        </div>
    }
}
