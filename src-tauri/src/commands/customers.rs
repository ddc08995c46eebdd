//! Customer-related commands
//!
//! CRUD operations and CSV export for customers.

use crate::app::AppState;
use crate::database::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use crate::error::Result;
use crate::services::CustomerSummary;
use tauri::State;

/// Create a new customer
#[tauri::command]
pub async fn create_customer(
    state: State<'_, AppState>,
    req: CreateCustomerRequest,
) -> Result<Customer> {
    state.customers_service.create_customer(req).await
}

/// Get a customer by ID
#[tauri::command]
pub async fn get_customer(state: State<'_, AppState>, id: String) -> Result<Customer> {
    state.customers_service.get_customer(&id).await
}

/// List all customers with equipment counts
#[tauri::command]
pub async fn list_customers(state: State<'_, AppState>) -> Result<Vec<CustomerSummary>> {
    state.customers_service.list_customers().await
}

/// Update a customer
#[tauri::command]
pub async fn update_customer(
    state: State<'_, AppState>,
    req: UpdateCustomerRequest,
) -> Result<Customer> {
    state.customers_service.update_customer(req).await
}

/// Delete a customer and all of its contracts and service records
#[tauri::command]
pub async fn delete_customer(state: State<'_, AppState>, id: String) -> Result<()> {
    state.customers_service.delete_customer(&id).await
}

/// Render the customer list as CSV for export
#[tauri::command]
pub async fn export_customers_csv(state: State<'_, AppState>) -> Result<String> {
    state.customers_service.export_csv().await
}
