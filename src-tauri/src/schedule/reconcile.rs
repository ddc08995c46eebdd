//! Schedule reconciliation
//!
//! Merges generated occurrences with persisted service records into the
//! per-occurrence view the display layer renders. Persisted records win
//! verbatim; occurrences with no record become unmaterialized shells that
//! only reach the store once something is written to them.

use super::generator::{ContractType, ServiceOccurrence};
use crate::database::ServiceRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Whether a schedule entry is backed by a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordState {
    Materialized { id: String },
    Unmaterialized,
}

impl RecordState {
    pub fn is_materialized(&self) -> bool {
        matches!(self, RecordState::Materialized { .. })
    }
}

/// One row of the merged schedule view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub contract_id: String,
    pub period_number: i64,
    pub year: i64,
    pub period_label: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub notes: String,
    pub is_overdue: bool,
    #[serde(flatten)]
    pub record: RecordState,
}

impl ScheduleEntry {
    /// View of a persisted record. The record supplies every field
    /// verbatim, including its own due date.
    pub fn from_record(record: &ServiceRecord, contract_type: ContractType, today: NaiveDate) -> Self {
        ScheduleEntry {
            contract_id: record.contract_id.clone(),
            period_number: record.period_number,
            year: record.year,
            period_label: contract_type.period_label(record.period_number, record.year),
            due_date: record.due_date,
            completed: record.completed,
            completed_date: record.completed_date,
            notes: record.notes.clone(),
            is_overdue: !record.completed && record.due_date < today,
            record: RecordState::Materialized {
                id: record.id.clone(),
            },
        }
    }

    /// Shell for an occurrence with no persisted record yet
    pub fn from_occurrence(
        contract_id: &str,
        occ: &ServiceOccurrence,
        contract_type: ContractType,
        today: NaiveDate,
    ) -> Self {
        ScheduleEntry {
            contract_id: contract_id.to_string(),
            period_number: occ.period_number,
            year: occ.year,
            period_label: contract_type.period_label(occ.period_number, occ.year),
            due_date: occ.due_date,
            completed: false,
            completed_date: None,
            notes: String::new(),
            is_overdue: occ.due_date < today,
            record: RecordState::Unmaterialized,
        }
    }
}

/// Merge generated occurrences with persisted records.
///
/// Records are matched by occurrence key `(period_number, year)`. A matched
/// record supplies the entry verbatim, including its own due date and notes.
/// Unmatched occurrences produce uncompleted shells. Output preserves
/// generator order, so the merge is idempotent for a fixed store state.
pub fn merge_schedule(
    contract_id: &str,
    contract_type: ContractType,
    occurrences: &[ServiceOccurrence],
    records: &[ServiceRecord],
    today: NaiveDate,
) -> Vec<ScheduleEntry> {
    // Records arrive ordered by due date; on duplicate keys the latest
    // due date wins, matching the store lookup used for toggles.
    let mut by_key: HashMap<(i64, i64), &ServiceRecord> = HashMap::new();
    for record in records {
        by_key.insert((record.period_number, record.year), record);
    }

    occurrences
        .iter()
        .map(|occ| match by_key.get(&(occ.period_number, occ.year)) {
            Some(record) => ScheduleEntry::from_record(record, contract_type, today),
            None => ScheduleEntry::from_occurrence(contract_id, occ, contract_type, today),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generate_schedule;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        id: &str,
        period_number: i64,
        year: i64,
        due: NaiveDate,
        completed: bool,
        notes: &str,
    ) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            contract_id: "contract-1".to_string(),
            due_date: due,
            period_number,
            year,
            completed,
            completed_date: completed.then(|| due),
            notes: notes.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn persisted_records_win_verbatim() {
        let occurrences = generate_schedule(ContractType::Quarterly, 12, date(2024, 1, 15));
        let records = vec![record(
            "rec-1",
            2,
            2024,
            date(2024, 4, 15),
            true,
            "replaced filter",
        )];

        let merged = merge_schedule(
            "contract-1",
            ContractType::Quarterly,
            &occurrences,
            &records,
            date(2024, 5, 1),
        );

        assert_eq!(merged.len(), 4);

        let q2 = &merged[1];
        assert_eq!(q2.period_label, "Q2 2024");
        assert!(q2.completed);
        assert_eq!(q2.notes, "replaced filter");
        assert_eq!(
            q2.record,
            RecordState::Materialized {
                id: "rec-1".to_string()
            }
        );
        assert!(!q2.is_overdue);
    }

    #[test]
    fn missing_records_become_unmaterialized_shells() {
        let occurrences = generate_schedule(ContractType::Quarterly, 12, date(2024, 1, 15));

        let merged = merge_schedule(
            "contract-1",
            ContractType::Quarterly,
            &occurrences,
            &[],
            date(2024, 1, 1),
        );

        assert!(merged
            .iter()
            .all(|e| e.record == RecordState::Unmaterialized));
        assert!(merged.iter().all(|e| !e.completed && e.notes.is_empty()));
    }

    #[test]
    fn merge_preserves_generator_order() {
        let occurrences = generate_schedule(ContractType::Quarterly, 12, date(2024, 1, 15));
        // Persisted out of schedule order
        let records = vec![
            record("rec-4", 4, 2024, date(2024, 10, 15), false, ""),
            record("rec-1", 1, 2024, date(2024, 1, 15), true, ""),
        ];

        let merged = merge_schedule(
            "contract-1",
            ContractType::Quarterly,
            &occurrences,
            &records,
            date(2024, 1, 1),
        );

        let labels: Vec<_> = merged.iter().map(|e| e.period_label.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2024", "Q2 2024", "Q3 2024", "Q4 2024"]);
    }

    #[test]
    fn overdue_only_when_uncompleted_and_past_due() {
        let occurrences = generate_schedule(ContractType::Quarterly, 12, date(2024, 1, 15));
        let records = vec![record("rec-1", 1, 2024, date(2024, 1, 15), true, "")];

        let today = date(2024, 5, 1);
        let merged = merge_schedule(
            "contract-1",
            ContractType::Quarterly,
            &occurrences,
            &records,
            today,
        );

        // Q1 completed -> not overdue despite being past due
        assert!(!merged[0].is_overdue);
        // Q2 uncompleted, due 2024-04-15 < today -> overdue
        assert!(merged[1].is_overdue);
        // Q3 due in the future -> not overdue
        assert!(!merged[2].is_overdue);
    }

    #[test]
    fn merge_is_idempotent_for_fixed_inputs() {
        let occurrences = generate_schedule(ContractType::HalfYear, 24, date(2023, 3, 10));
        let records = vec![record("rec-1", 2, 2023, date(2023, 9, 10), true, "done")];
        let today = date(2024, 1, 1);

        let first = merge_schedule(
            "contract-1",
            ContractType::HalfYear,
            &occurrences,
            &records,
            today,
        );
        let second = merge_schedule(
            "contract-1",
            ContractType::HalfYear,
            &occurrences,
            &records,
            today,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_keys_resolve_to_latest_due_date() {
        // A stale uncompleted record can coexist with a fresh one for the
        // same slot after a partial regeneration; the later due date wins.
        let occurrences = generate_schedule(ContractType::Annual, 12, date(2024, 2, 1));
        let records = vec![
            record("rec-old", 1, 2024, date(2024, 1, 1), false, "stale"),
            record("rec-new", 1, 2024, date(2024, 2, 1), false, "fresh"),
        ];

        let merged = merge_schedule(
            "contract-1",
            ContractType::Annual,
            &occurrences,
            &records,
            date(2024, 1, 1),
        );

        assert_eq!(
            merged[0].record,
            RecordState::Materialized {
                id: "rec-new".to_string()
            }
        );
        assert_eq!(merged[0].notes, "fresh");
    }
}
