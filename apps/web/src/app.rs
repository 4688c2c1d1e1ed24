//! Estimate Checker App
//!
//! Owns the single client state signal and the actions that drive it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

use crate::api;
use crate::components::{ResultView, UploadForm};
use crate::export;
use crate::state::{ClientState, Phase};

/// `web_sys::File` is not `Send`, so the state lives in local storage.
pub type UiState = RwSignal<ClientState<File>, LocalStorage>;

#[component]
pub fn App() -> impl IntoView {
    let state: UiState = RwSignal::new_local(ClientState::new());
    let has_result = move || state.with(|s| s.phase == Phase::Result);

    view! {
        <div class="page">
            <header class="hero">
                <p class="hero-badge">"AI REAL ESTATE CHECKER"</p>
                <h1 class="hero-title">"賃貸見積もりチェッカー"</h1>
                <p class="hero-lead">"スマホで撮るだけ。AIが適正価格を即診断。"</p>
            </header>

            <main class="container">
                <div class="card">
                    <Show when=has_result fallback=move || view! { <UploadForm state=state /> }>
                        <ResultView state=state />
                    </Show>
                </div>
            </main>
        </div>
    }
}

/// Starts one analysis if the state allows it. The button is disabled while
/// loading, and `begin_analysis` refuses a second request regardless.
pub fn run_analysis(state: UiState) {
    let mut request = None;
    state.update(|s| request = s.begin_analysis());
    let Some(request) = request else {
        return;
    };

    spawn_local(async move {
        let outcome = api::analyze(&request.estimate, request.drawing.as_ref()).await;
        match &outcome {
            Ok(response) if !response.success => web_sys::console::warn_1(
                &format!("[Analyze] Server reported failure: {:?}", response.msg).into(),
            ),
            Ok(_) => {}
            Err(e) => web_sys::console::error_1(&format!("[Analyze] Request failed: {e}").into()),
        }

        let mut alert = None;
        state.update(|s| alert = s.finish_analysis(outcome));

        if let Some(alert) = alert {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.alert_with_message(alert.message()) {
                    web_sys::console::error_1(&e);
                }
            }
        }
    });
}

/// Saves the current result card as `result.png`.
pub fn export_image(state: UiState) {
    let items = state.with_untracked(|s| s.items.clone());
    spawn_local(async move {
        if let Err(e) = export::export_result_image(&items).await {
            web_sys::console::error_1(&e);
        }
    });
}
