//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `customers`: Customer CRUD and CSV export
//! - `contracts`: Contract CRUD
//! - `schedule`: Service schedule views, completion toggles, notes

pub mod contracts;
pub mod customers;
pub mod schedule;

use crate::app::AppState;
use crate::error::Result;
use tauri::State;

// Re-export all commands for convenient registration in main.rs
pub use contracts::*;
pub use customers::*;
pub use schedule::*;

// ===== General Commands =====

/// Get application information
#[tauri::command]
pub async fn get_app_info(state: State<'_, AppState>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
}

/// Catalog values for the contract form dropdowns
#[tauri::command]
pub async fn get_catalogs() -> Result<Catalogs> {
    Ok(Catalogs {
        equipment_types: crate::config::EQUIPMENT_TYPES,
        brands: crate::config::BRANDS,
        contract_types: crate::config::CONTRACT_TYPES,
    })
}

/// Dropdown catalogs structure
#[derive(serde::Serialize)]
pub struct Catalogs {
    pub equipment_types: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub contract_types: &'static [&'static str],
}
