//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::clock::SystemClock;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{ContractsService, CustomersService, OverdueService, ScheduleService};
use std::sync::Arc;
use tauri::{App, Manager};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: std::path::PathBuf,
    pub customers_service: CustomersService,
    pub contracts_service: ContractsService,
    pub schedule_service: ScheduleService,
    pub overdue_service: OverdueService,
}

/// Application setup - called once on startup
pub fn setup(app: &mut App) -> Result<()> {
    tracing::info!("Initializing application");

    // Get app data directory
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| crate::error::AppError::Generic(format!("Failed to get app data dir: {}", e)))?;

    tracing::info!("App data directory: {:?}", app_data_dir);

    // Create necessary directories
    std::fs::create_dir_all(&app_data_dir)?;
    std::fs::create_dir_all(app_data_dir.join("logs"))?;

    // Open the database and build the service graph
    let db_path = app_data_dir.join("servicetrack.db");
    let pool = tauri::async_runtime::block_on(create_pool(&db_path))?;
    let repo = Repository::new(pool);

    let clock = Arc::new(SystemClock);
    let schedule_service = ScheduleService::new(repo.clone(), clock.clone());
    let customers_service = CustomersService::new(repo.clone());
    let contracts_service = ContractsService::new(repo.clone(), schedule_service.clone());
    let overdue_service = OverdueService::new(repo, clock);

    // Wire the notifier to this app instance and start its background loop
    tauri::async_runtime::block_on(overdue_service.set_app_handle(app.handle().clone()));
    overdue_service.clone().start_scheduler();

    let state = AppState {
        app_data_dir,
        customers_service,
        contracts_service,
        schedule_service,
        overdue_service,
    };
    app.manage(state);

    tracing::info!("Application initialized successfully");

    Ok(())
}
