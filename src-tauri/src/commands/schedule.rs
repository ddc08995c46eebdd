//! Schedule-related commands
//!
//! Merged schedule views and service record writes.

use crate::app::AppState;
use crate::error::Result;
use crate::schedule::ScheduleEntry;
use tauri::State;

/// Get the merged service schedule for a contract
#[tauri::command]
pub async fn get_service_schedule(
    state: State<'_, AppState>,
    contract_id: String,
) -> Result<Vec<ScheduleEntry>> {
    state.schedule_service.schedule_view(&contract_id).await
}

/// Toggle completion on a scheduled service visit
#[tauri::command]
pub async fn toggle_service_completion(
    state: State<'_, AppState>,
    contract_id: String,
    period_number: i64,
    year: i64,
    completed: bool,
) -> Result<ScheduleEntry> {
    state
        .schedule_service
        .toggle_completion(&contract_id, period_number, year, completed)
        .await
}

/// Update the notes on a scheduled service visit
#[tauri::command]
pub async fn update_service_notes(
    state: State<'_, AppState>,
    contract_id: String,
    period_number: i64,
    year: i64,
    notes: String,
) -> Result<ScheduleEntry> {
    state
        .schedule_service
        .update_notes(&contract_id, period_number, year, &notes)
        .await
}
