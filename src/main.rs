//! Foodmind Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod i18n;
mod models;
mod pages;
mod recipe_form;
mod store;
mod sync;
mod validators;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    mount_to_body(App);
}
