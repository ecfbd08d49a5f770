pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod pages;
pub mod routes;
pub mod storage;
pub mod theme;
pub mod validation;

use anyhow::{anyhow, Context, Result};
use eframe::{self, egui};
use log::info;

use crate::api::ApiClient;
use crate::config::FrontendConfig;
use crate::storage::ClientStorage;
use crate::theme::ThemeStore;

pub use app::PostsApp;

/// Launches the egui application with default window options.
pub fn run_frontend() -> Result<()> {
    run_frontend_with_options(default_native_options())
}

/// Launches the egui app with caller-provided options.
pub fn run_frontend_with_options(options: eframe::NativeOptions) -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let config = FrontendConfig::from_env();
    let api = ApiClient::from_config(&config).context("failed to build API client")?;
    let storage_path = config
        .storage_path
        .clone()
        .unwrap_or_else(ClientStorage::default_path);
    let theme = ThemeStore::load(ClientStorage::open(storage_path));
    info!(
        "starting posts frontend against {} (theme {})",
        api.base_url(),
        theme.mode()
    );

    eframe::run_native(
        "Posts",
        options,
        Box::new(move |cc| Ok(Box::new(PostsApp::new(cc, api, config, theme)))),
    )
    .map_err(|err| anyhow!("failed to run frontend: {err}"))
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    }
}
