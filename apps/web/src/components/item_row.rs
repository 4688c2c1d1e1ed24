//! Item Row Component
//!
//! One negotiable fee: flagged rows carry the reason and the struck-through price.

use leptos::prelude::*;

use crate::models::NegotiableItem;
use crate::summary::ItemRowModel;

#[component]
pub fn ItemRow(item: NegotiableItem) -> impl IntoView {
    let row = ItemRowModel::new(&item);
    let overpriced = row.overpriced;

    view! {
        <div class="item" class:item-flagged=overpriced>
            <div class="item-main">
                <div class="item-head">
                    <span class="badge" class:badge-flag=overpriced class:badge-ok={!overpriced}>
                        {row.badge}
                    </span>
                    <span class="item-name">{row.name}</span>
                </div>
                {row.reason.map(|reason| view! { <p class="item-reason">{reason}</p> })}
            </div>
            <div class="item-price">
                {row.struck_current.map(|current| view! { <p class="item-current">{current}</p> })}
                <p class="item-target">{row.target}<span class="yen-small">"円"</span></p>
            </div>
        </div>
    }
}
