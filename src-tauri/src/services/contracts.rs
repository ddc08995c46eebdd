//! Contracts service
//!
//! Contract CRUD with validation, end-date derivation, and the
//! schedule-regeneration trigger when servicing terms change.

use crate::config::MIN_CONTRACT_PERIOD_MONTHS;
use crate::database::{
    Contract, ContractTerms, ContractWithCustomer, CreateContractRequest, Repository,
    UpdateContractRequest,
};
use crate::error::{AppError, Result};
use crate::services::schedule::{RegenerationOutcome, ScheduleService};
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Result of a contract edit: the updated contract, plus the regeneration
/// outcome when the edit changed schedule-relevant terms
#[derive(Debug, Clone, Serialize)]
pub struct ContractUpdateResult {
    pub contract: Contract,
    pub regeneration: Option<RegenerationOutcome>,
}

/// Service for managing contracts
#[derive(Clone)]
pub struct ContractsService {
    repo: Repository,
    schedule: ScheduleService,
}

impl ContractsService {
    pub fn new(repo: Repository, schedule: ScheduleService) -> Self {
        Self { repo, schedule }
    }

    /// Create a new contract. No service records are written here; the
    /// schedule materializes lazily, on first completion or on a terms
    /// edit.
    pub async fn create_contract(&self, req: CreateContractRequest) -> Result<Contract> {
        validate_contract(
            &req.customer_id,
            &req.equipment_type,
            &req.brand,
            &req.contract_type,
            req.contract_period,
        )?;

        // Reject contracts against unknown customers up front instead of
        // surfacing a foreign-key failure
        self.repo.get_customer(&req.customer_id).await?;

        let end_date = derive_end_date(req.contract_start_date, req.contract_period);

        tracing::info!(
            "Creating {} contract for customer {}",
            req.contract_type,
            req.customer_id
        );
        let contract = self.repo.create_contract(req, end_date).await?;
        tracing::info!("Contract created successfully: {}", contract.id);

        Ok(contract)
    }

    /// Get a contract by ID
    pub async fn get_contract(&self, id: &str) -> Result<Contract> {
        self.repo.get_contract(id).await
    }

    /// List all contracts with their owning customer, newest first
    pub async fn list_contracts(&self) -> Result<Vec<ContractWithCustomer>> {
        self.repo.list_contracts().await
    }

    /// Update a contract. When the contract type, period, or start date
    /// changed, the service schedule is regenerated: uncompleted records
    /// are replaced with the schedule for the new terms, completed
    /// records are kept. A degraded regeneration is reported in the
    /// result, never escalated into a failed edit.
    pub async fn update_contract(&self, req: UpdateContractRequest) -> Result<ContractUpdateResult> {
        validate_contract(
            &req.customer_id,
            &req.equipment_type,
            &req.brand,
            &req.contract_type,
            req.contract_period,
        )?;

        let existing = self.repo.get_contract(&req.id).await?;

        let new_terms = ContractTerms {
            contract_type: req.contract_type.clone(),
            contract_period: req.contract_period,
            contract_start_date: req.contract_start_date,
        };
        let terms_changed = existing.terms() != new_terms;

        let end_date = derive_end_date(req.contract_start_date, req.contract_period);
        let contract = self.repo.update_contract(req, end_date).await?;

        let regeneration = if terms_changed {
            tracing::info!(
                "Contract {} terms changed, regenerating service schedule",
                contract.id
            );
            Some(self.schedule.regenerate(&contract).await?)
        } else {
            None
        };

        Ok(ContractUpdateResult {
            contract,
            regeneration,
        })
    }

    /// Delete a contract and, through the store's cascade, its service
    /// records
    pub async fn delete_contract(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting contract: {}", id);
        self.repo.delete_contract(id).await
    }
}

/// End date is always recomputed from start + period; a contract without
/// an explicit start date has no stored end date.
fn derive_end_date(start: Option<NaiveDate>, period_months: i64) -> Option<NaiveDate> {
    start.and_then(|date| date.checked_add_months(Months::new(period_months as u32)))
}

fn validate_contract(
    customer_id: &str,
    equipment_type: &str,
    brand: &str,
    contract_type: &str,
    contract_period: i64,
) -> Result<()> {
    if customer_id.trim().is_empty() {
        return Err(AppError::Validation("Customer is required".to_string()));
    }
    if equipment_type.trim().is_empty() {
        return Err(AppError::Validation(
            "Equipment type is required".to_string(),
        ));
    }
    if brand.trim().is_empty() {
        return Err(AppError::Validation("Brand is required".to_string()));
    }
    if contract_type.trim().is_empty() {
        return Err(AppError::Validation(
            "Contract type is required".to_string(),
        ));
    }
    if contract_period < MIN_CONTRACT_PERIOD_MONTHS {
        return Err(AppError::Validation(
            "Contract period must be a positive number of months".to_string(),
        ));
    }
    Ok(())
}
