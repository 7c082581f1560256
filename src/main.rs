//! To-Do Board Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod errors;
mod models;
mod router;
mod session;
mod view_model;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = config::AppConfig::from_env();
    rolling_logger::init(config.log_level, rolling_logger::DEFAULT_CAPACITY);
    tracing::info!(api = %config.api_base_url, "starting to-do board");
    mount_to_body(App);
}
