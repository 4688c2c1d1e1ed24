//! Rental Estimate Checker frontend entry point

mod api;
mod app;
mod components;
mod export;
mod models;
mod state;
mod summary;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
