//! Contract-related commands
//!
//! CRUD operations for contracts. Edits that change servicing terms
//! regenerate the schedule inside the service layer.

use crate::app::AppState;
use crate::database::{Contract, ContractWithCustomer, CreateContractRequest, UpdateContractRequest};
use crate::error::Result;
use crate::services::ContractUpdateResult;
use tauri::State;

/// Create a new contract
#[tauri::command]
pub async fn create_contract(
    state: State<'_, AppState>,
    req: CreateContractRequest,
) -> Result<Contract> {
    state.contracts_service.create_contract(req).await
}

/// Get a contract by ID
#[tauri::command]
pub async fn get_contract(state: State<'_, AppState>, id: String) -> Result<Contract> {
    state.contracts_service.get_contract(&id).await
}

/// List all contracts with their owning customer
#[tauri::command]
pub async fn list_contracts(state: State<'_, AppState>) -> Result<Vec<ContractWithCustomer>> {
    state.contracts_service.list_contracts().await
}

/// Update a contract, regenerating the schedule when terms changed
#[tauri::command]
pub async fn update_contract(
    state: State<'_, AppState>,
    req: UpdateContractRequest,
) -> Result<ContractUpdateResult> {
    state.contracts_service.update_contract(req).await
}

/// Delete a contract and its service records
#[tauri::command]
pub async fn delete_contract(state: State<'_, AppState>, id: String) -> Result<()> {
    state.contracts_service.delete_contract(&id).await
}
