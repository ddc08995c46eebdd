// ServiceTrack - Equipment service contract tracking
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod clock;
mod commands;
mod config;
mod database;
mod error;
mod schedule;
mod services;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servicetrack=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ServiceTrack application");

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::get_catalogs,
            commands::create_customer,
            commands::get_customer,
            commands::list_customers,
            commands::update_customer,
            commands::delete_customer,
            commands::export_customers_csv,
            commands::create_contract,
            commands::get_contract,
            commands::list_contracts,
            commands::update_contract,
            commands::delete_contract,
            commands::get_service_schedule,
            commands::toggle_service_completion,
            commands::update_service_notes,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
