//! Schedule service
//!
//! Store-coupled half of the schedule engine: merged schedule views,
//! completion toggles, notes edits, and schedule regeneration when
//! contract terms change.

use crate::clock::Clock;
use crate::database::{Contract, NewServiceRecord, Repository};
use crate::error::{AppError, Result};
use crate::schedule::{generate_schedule, ContractType, ScheduleEntry, ServiceOccurrence};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of the two-phase schedule regeneration. Each phase reports its
/// affected row count, or `None` when the phase failed. A failed delete
/// does not stop the insert, so a partially applied regeneration is an
/// observable state, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct RegenerationOutcome {
    pub deleted: Option<u64>,
    pub inserted: Option<u64>,
}

impl RegenerationOutcome {
    pub fn fully_applied(&self) -> bool {
        self.deleted.is_some() && self.inserted.is_some()
    }
}

/// Service for schedule views and service record lifecycle
#[derive(Clone)]
pub struct ScheduleService {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl ScheduleService {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// The merged schedule for a contract: generator output reconciled
    /// with whatever records have been persisted so far.
    pub async fn schedule_view(&self, contract_id: &str) -> Result<Vec<ScheduleEntry>> {
        let contract = self.repo.get_contract(contract_id).await?;
        let contract_type = ContractType::from_name(&contract.contract_type);

        let occurrences = generate_schedule(
            contract_type,
            contract.contract_period,
            contract.effective_start_date(),
        );
        let records = self.repo.list_service_records(contract_id).await?;

        Ok(crate::schedule::merge_schedule(
            contract_id,
            contract_type,
            &occurrences,
            &records,
            self.clock.today(),
        ))
    }

    /// Toggle completion on the occurrence identified by `(period_number,
    /// year)`. A first toggle materializes the record; later toggles
    /// update it in place. Either way the caller gets the same shape
    /// back. Completing stamps today's date and un-completing clears it;
    /// the record itself is never deleted here.
    pub async fn toggle_completion(
        &self,
        contract_id: &str,
        period_number: i64,
        year: i64,
        completed: bool,
    ) -> Result<ScheduleEntry> {
        let contract = self.repo.get_contract(contract_id).await?;
        let contract_type = ContractType::from_name(&contract.contract_type);
        let today = self.clock.today();
        let completed_date = completed.then_some(today);

        let record = match self
            .repo
            .find_service_record(contract_id, period_number, year)
            .await?
        {
            Some(existing) => {
                self.repo
                    .set_service_record_completion(&existing.id, completed, completed_date)
                    .await?
            }
            None => {
                // First write to this occurrence: its due date comes from
                // the generator, never from the caller.
                let occ = self.find_occurrence(&contract, period_number, year)?;

                self.repo
                    .insert_service_record(NewServiceRecord {
                        contract_id: contract_id.to_string(),
                        due_date: occ.due_date,
                        period_number,
                        year,
                        completed,
                        completed_date,
                        notes: String::new(),
                    })
                    .await?
            }
        };

        tracing::info!(
            "Service {} {} for contract {}",
            contract_type.period_label(period_number, year),
            if completed { "completed" } else { "reopened" },
            contract_id
        );

        Ok(ScheduleEntry::from_record(&record, contract_type, today))
    }

    /// Update the notes on an occurrence. Notes on a record that has never
    /// been materialized are not persisted; the edit survives only in the
    /// returned view until some other write materializes the record.
    /// Making such notes durable would mean materializing here instead,
    /// in this one branch.
    pub async fn update_notes(
        &self,
        contract_id: &str,
        period_number: i64,
        year: i64,
        notes: &str,
    ) -> Result<ScheduleEntry> {
        let contract = self.repo.get_contract(contract_id).await?;
        let contract_type = ContractType::from_name(&contract.contract_type);
        let today = self.clock.today();

        match self
            .repo
            .find_service_record(contract_id, period_number, year)
            .await?
        {
            Some(existing) => {
                let record = self
                    .repo
                    .set_service_record_notes(&existing.id, notes)
                    .await?;
                Ok(ScheduleEntry::from_record(&record, contract_type, today))
            }
            None => {
                tracing::debug!(
                    "Notes edit on unmaterialized occurrence {} of contract {} not persisted",
                    contract_type.period_label(period_number, year),
                    contract_id
                );

                let occ = self.find_occurrence(&contract, period_number, year)?;
                let mut entry =
                    ScheduleEntry::from_occurrence(contract_id, &occ, contract_type, today);
                entry.notes = notes.to_string();
                Ok(entry)
            }
        }
    }

    /// Replace the schedule after a contract-terms change.
    ///
    /// Phase 1 deletes every uncompleted record for the contract;
    /// completed records are never removed by this path. Phase 2 inserts
    /// the full generator output over the contract's current terms. The
    /// order is fixed: delete must run before insert so a fresh record
    /// never races its stale counterpart on the same occurrence key. A
    /// failed phase is logged and reported in the outcome, not escalated;
    /// a failed delete does not prevent the insert.
    pub async fn regenerate(&self, contract: &Contract) -> Result<RegenerationOutcome> {
        let contract_type = ContractType::from_name(&contract.contract_type);

        let deleted = match self
            .repo
            .delete_incomplete_service_records(&contract.id)
            .await
        {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!(
                    "Could not delete stale service records for contract {}: {}",
                    contract.id,
                    e
                );
                None
            }
        };

        let records: Vec<NewServiceRecord> = generate_schedule(
            contract_type,
            contract.contract_period,
            contract.effective_start_date(),
        )
        .into_iter()
        .map(|occ| NewServiceRecord {
            contract_id: contract.id.clone(),
            due_date: occ.due_date,
            period_number: occ.period_number,
            year: occ.year,
            completed: false,
            completed_date: None,
            notes: String::new(),
        })
        .collect();

        let inserted = match self.repo.insert_service_records(&records).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!(
                    "Could not create new service records for contract {}: {}",
                    contract.id,
                    e
                );
                None
            }
        };

        let outcome = RegenerationOutcome { deleted, inserted };
        tracing::info!(
            "Regenerated schedule for contract {}: deleted {:?}, inserted {:?}",
            contract.id,
            outcome.deleted,
            outcome.inserted
        );

        Ok(outcome)
    }

    fn find_occurrence(
        &self,
        contract: &Contract,
        period_number: i64,
        year: i64,
    ) -> Result<ServiceOccurrence> {
        let contract_type = ContractType::from_name(&contract.contract_type);

        generate_schedule(
            contract_type,
            contract.contract_period,
            contract.effective_start_date(),
        )
        .into_iter()
        .find(|occ| occ.period_number == period_number && occ.year == year)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "No scheduled service {} under the current contract terms",
                contract_type.period_label(period_number, year)
            ))
        })
    }
}
