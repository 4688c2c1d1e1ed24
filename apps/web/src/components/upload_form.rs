//! Upload Form Component
//!
//! Two file pickers (estimate required, listing sheet optional) and the start button.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

use crate::app::{run_analysis, UiState};

/// First file of the `<input type="file">` that fired `ev`, if any.
fn selected_file(ev: &Event) -> Option<File> {
    ev.target()?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

#[component]
pub fn UploadForm(state: UiState) -> impl IntoView {
    let can_submit = move || state.with(|s| s.can_submit());
    let loading = move || state.with(|s| s.is_loading());

    let estimate_hint = move || {
        state.with(|s| match &s.estimate_file {
            Some(file) => format!("✅ {}", file.name()),
            None => "タップして選択".to_string(),
        })
    };
    let drawing_hint = move || {
        state.with(|s| match &s.drawing_file {
            Some(file) => format!("✅ {}", file.name()),
            None => "あると精度アップ".to_string(),
        })
    };

    view! {
        <div class="upload-form">
            <label class="picker picker-estimate">
                <input
                    type="file"
                    accept="image/*"
                    class="hidden"
                    on:change=move |ev| {
                        let file = selected_file(&ev);
                        state.update(|s| s.select_estimate(file));
                    }
                />
                <div class="picker-icon">"📄"</div>
                <p class="picker-title">"見積書の写真 (必須)"</p>
                <p class="picker-hint">{estimate_hint}</p>
            </label>

            <label class="picker picker-drawing">
                <input
                    type="file"
                    accept="image/*"
                    class="hidden"
                    on:change=move |ev| {
                        let file = selected_file(&ev);
                        state.update(|s| s.select_drawing(file));
                    }
                />
                <p class="picker-title">"🏠 募集図面 (任意)"</p>
                <p class="picker-hint">{drawing_hint}</p>
            </label>

            <button
                class="primary-button"
                class:ready=can_submit
                disabled=move || !can_submit()
                on:click=move |_| run_analysis(state)
            >
                {move || if loading() { "AI解析中..." } else { "診断スタート ✨" }}
            </button>
        </div>
    }
}
