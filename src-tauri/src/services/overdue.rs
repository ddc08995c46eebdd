//! Overdue service notifier
//!
//! Background task that watches for service visits coming due and raises
//! desktop notifications. Each record is announced at most once per app
//! run; the due state itself lives in the store, so nothing is persisted
//! here.

use crate::clock::Clock;
use crate::config::{DUE_SOON_WINDOW_DAYS, OVERDUE_CHECK_INTERVAL_SECS};
use crate::database::{Repository, ServiceRecord};
use crate::error::Result;
use chrono::Duration;
use std::collections::HashSet;
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;

/// Overdue notifier with background scheduler
#[derive(Clone)]
pub struct OverdueService {
    repo: Repository,
    clock: Arc<dyn Clock>,
    app_handle: Arc<Mutex<Option<AppHandle>>>,
    announced: Arc<Mutex<HashSet<String>>>,
}

impl OverdueService {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            app_handle: Arc::new(Mutex::new(None)),
            announced: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Set the app handle for notifications
    pub async fn set_app_handle(&self, handle: AppHandle) {
        let mut app = self.app_handle.lock().await;
        *app = Some(handle);
    }

    /// Start the background scheduler
    pub fn start_scheduler(self) {
        tokio::spawn(async move {
            tracing::info!("Starting overdue service scheduler");

            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(
                OVERDUE_CHECK_INTERVAL_SECS,
            ));

            loop {
                interval.tick().await;

                if let Err(e) = self.check_due_services().await {
                    tracing::error!("Error checking due services: {}", e);
                }
            }
        });
    }

    /// Check for due or soon-due service visits. Returns the records
    /// announced by this pass.
    pub async fn check_due_services(&self) -> Result<Vec<ServiceRecord>> {
        let cutoff = self.clock.today() + Duration::days(DUE_SOON_WINDOW_DAYS);
        let due = self.repo.list_open_records_due_before(cutoff).await?;

        let mut fresh = Vec::new();
        let mut announced = self.announced.lock().await;

        for record in due {
            if !announced.insert(record.id.clone()) {
                continue;
            }

            tracing::info!(
                "Service visit due {} for contract {}",
                record.due_date,
                record.contract_id
            );

            self.send_notification(&record).await;
            fresh.push(record);
        }

        Ok(fresh)
    }

    /// Send notification for a due service visit
    async fn send_notification(&self, record: &ServiceRecord) {
        let app_handle = self.app_handle.lock().await;

        if let Some(handle) = app_handle.as_ref() {
            // Name the customer and equipment in the notification body
            let detail = match self.repo.get_contract(&record.contract_id).await {
                Ok(contract) => match self.repo.get_customer(&contract.customer_id).await {
                    Ok(customer) => {
                        format!("{} {} at {}", contract.brand, contract.equipment_type, customer.company)
                    }
                    Err(e) => {
                        tracing::error!("Failed to get customer for due service: {}", e);
                        return;
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to get contract for due service: {}", e);
                    return;
                }
            };

            use tauri_plugin_notification::NotificationExt;
            if let Err(e) = handle
                .notification()
                .builder()
                .title("Service Visit Due")
                .body(format!("{}, due {}", detail, record.due_date))
                .show()
            {
                tracing::error!("Failed to send notification: {}", e);
            }

            if let Err(e) = handle.emit(
                "service-due",
                DueServiceEvent {
                    record_id: record.id.clone(),
                    contract_id: record.contract_id.clone(),
                    due_date: record.due_date.to_string(),
                },
            ) {
                tracing::error!("Failed to emit service-due event: {}", e);
            }
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
struct DueServiceEvent {
    record_id: String,
    contract_id: String,
    due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::database::{
        initialize_database, CreateContractRequest, CreateCustomerRequest, NewServiceRecord,
    };
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn create_test_service(today: NaiveDate) -> (OverdueService, Repository, String) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let repo = Repository::new(pool);
        let service = OverdueService::new(repo.clone(), Arc::new(FixedClock(today)));

        let customer = repo
            .create_customer(CreateCustomerRequest {
                company: "Acme Air".to_string(),
                contact_person: "Jane Doe".to_string(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let contract = repo
            .create_contract(
                CreateContractRequest {
                    customer_id: customer.id,
                    equipment_type: "Compressor".to_string(),
                    brand: "Hitachi".to_string(),
                    model: None,
                    serial_number: None,
                    last_service_date: None,
                    contract_type: "Quarterly Service".to_string(),
                    contract_period: 12,
                    contract_start_date: Some(date(2024, 1, 15)),
                    remarks: None,
                },
                None,
            )
            .await
            .unwrap();

        (service, repo, contract.id)
    }

    fn record(contract_id: &str, period: i64, due: NaiveDate, completed: bool) -> NewServiceRecord {
        NewServiceRecord {
            contract_id: contract_id.to_string(),
            due_date: due,
            period_number: period,
            year: 2024,
            completed,
            completed_date: completed.then_some(due),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_announces_open_records_inside_window() {
        let (service, repo, contract_id) = create_test_service(date(2024, 4, 14)).await;

        // Overdue, due within the window, due beyond the window, completed
        repo.insert_service_record(record(&contract_id, 1, date(2024, 1, 15), false))
            .await
            .unwrap();
        repo.insert_service_record(record(&contract_id, 2, date(2024, 4, 15), false))
            .await
            .unwrap();
        repo.insert_service_record(record(&contract_id, 3, date(2024, 7, 15), false))
            .await
            .unwrap();
        repo.insert_service_record(record(&contract_id, 4, date(2024, 4, 16), true))
            .await
            .unwrap();

        let announced = service.check_due_services().await.unwrap();

        let periods: Vec<i64> = announced.iter().map(|r| r.period_number).collect();
        assert_eq!(periods, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_each_record_announced_once_per_run() {
        let (service, repo, contract_id) = create_test_service(date(2024, 4, 14)).await;

        repo.insert_service_record(record(&contract_id, 1, date(2024, 1, 15), false))
            .await
            .unwrap();

        let first = service.check_due_services().await.unwrap();
        assert_eq!(first.len(), 1);

        let second = service.check_due_services().await.unwrap();
        assert!(second.is_empty());
    }
}
