//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities. Cascade deletes
//! (customer -> contracts -> service records) are enforced by the schema's
//! foreign keys, which every connection enables.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Customers =====

    /// Create a new customer
    pub async fn create_customer(&self, req: CreateCustomerRequest) -> Result<Customer> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, company, contact_person, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.company)
        .bind(&req.contact_person)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.address)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created customer: {}", id);
        Ok(customer)
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(id.to_string()))?;

        Ok(customer)
    }

    /// List all customers, ordered by company name
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY company")
                .fetch_all(&self.pool)
                .await?;

        Ok(customers)
    }

    /// Update a customer
    pub async fn update_customer(&self, req: UpdateCustomerRequest) -> Result<Customer> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE customers
            SET company = ?, contact_person = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.company)
        .bind(&req.contact_person)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.address)
        .bind(now)
        .bind(&req.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::CustomerNotFound(req.id));
        }

        self.get_customer(&req.id).await
    }

    /// Delete a customer. Cascades to its contracts and their records.
    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::CustomerNotFound(id.to_string()));
        }

        tracing::debug!("Deleted customer: {}", id);
        Ok(())
    }

    /// Count contracts owned by a customer
    pub async fn count_contracts(&self, customer_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE customer_id = ?")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // ===== Contracts =====

    /// Create a new contract. The end date is derived by the caller from
    /// start date + period and stored alongside the raw terms.
    pub async fn create_contract(
        &self,
        req: CreateContractRequest,
        contract_end_date: Option<NaiveDate>,
    ) -> Result<Contract> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                id, customer_id, equipment_type, brand, model, serial_number,
                last_service_date, contract_type, contract_period,
                contract_start_date, contract_end_date, remarks, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.customer_id)
        .bind(&req.equipment_type)
        .bind(&req.brand)
        .bind(&req.model)
        .bind(&req.serial_number)
        .bind(req.last_service_date)
        .bind(&req.contract_type)
        .bind(req.contract_period)
        .bind(req.contract_start_date)
        .bind(contract_end_date)
        .bind(&req.remarks)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created contract: {}", id);
        Ok(contract)
    }

    /// Get a contract by ID
    pub async fn get_contract(&self, id: &str) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ContractNotFound(id.to_string()))?;

        Ok(contract)
    }

    /// List all contracts joined with their owning customer, newest first
    pub async fn list_contracts(&self) -> Result<Vec<ContractWithCustomer>> {
        let contracts = sqlx::query_as::<_, ContractWithCustomer>(
            r#"
            SELECT
                c.id, c.customer_id, cu.company, cu.contact_person,
                c.equipment_type, c.brand, c.model, c.serial_number,
                c.last_service_date, c.contract_type, c.contract_period,
                c.contract_start_date, c.contract_end_date, c.remarks,
                c.created_at, c.updated_at
            FROM contracts c
            JOIN customers cu ON cu.id = c.customer_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    /// Update a contract
    pub async fn update_contract(
        &self,
        req: UpdateContractRequest,
        contract_end_date: Option<NaiveDate>,
    ) -> Result<Contract> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE contracts
            SET customer_id = ?, equipment_type = ?, brand = ?, model = ?,
                serial_number = ?, last_service_date = ?, contract_type = ?,
                contract_period = ?, contract_start_date = ?, contract_end_date = ?,
                remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.customer_id)
        .bind(&req.equipment_type)
        .bind(&req.brand)
        .bind(&req.model)
        .bind(&req.serial_number)
        .bind(req.last_service_date)
        .bind(&req.contract_type)
        .bind(req.contract_period)
        .bind(req.contract_start_date)
        .bind(contract_end_date)
        .bind(&req.remarks)
        .bind(now)
        .bind(&req.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::ContractNotFound(req.id));
        }

        self.get_contract(&req.id).await
    }

    /// Delete a contract. Cascades to its service records.
    pub async fn delete_contract(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM contracts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ContractNotFound(id.to_string()));
        }

        tracing::debug!("Deleted contract: {}", id);
        Ok(())
    }

    // ===== Service Records =====

    /// List service records for a contract, ordered by due date
    pub async fn list_service_records(&self, contract_id: &str) -> Result<Vec<ServiceRecord>> {
        let records = sqlx::query_as::<_, ServiceRecord>(
            "SELECT * FROM service_records WHERE contract_id = ? ORDER BY due_date, created_at",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Look up a service record by its occurrence key. When stale and fresh
    /// records coexist for the same slot, the latest due date wins, the
    /// same row the merged view resolves to.
    pub async fn find_service_record(
        &self,
        contract_id: &str,
        period_number: i64,
        year: i64,
    ) -> Result<Option<ServiceRecord>> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT * FROM service_records
            WHERE contract_id = ? AND period_number = ? AND year = ?
            ORDER BY due_date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(contract_id)
        .bind(period_number)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a single service record
    pub async fn insert_service_record(&self, rec: NewServiceRecord) -> Result<ServiceRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO service_records (
                id, contract_id, due_date, period_number, year,
                completed, completed_date, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&rec.contract_id)
        .bind(rec.due_date)
        .bind(rec.period_number)
        .bind(rec.year)
        .bind(rec.completed)
        .bind(rec.completed_date)
        .bind(&rec.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted service record: {}", id);
        Ok(record)
    }

    /// Insert a batch of service records. Rows are written one at a time;
    /// the store guarantees per-row atomicity only, so an error mid-batch
    /// leaves the earlier rows in place.
    pub async fn insert_service_records(&self, records: &[NewServiceRecord]) -> Result<u64> {
        let mut inserted = 0u64;

        for rec in records {
            self.insert_service_record(rec.clone()).await?;
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Update a record's completion state and completion date
    pub async fn set_service_record_completion(
        &self,
        id: &str,
        completed: bool,
        completed_date: Option<NaiveDate>,
    ) -> Result<ServiceRecord> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE service_records
            SET completed = ?, completed_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(completed)
        .bind(completed_date)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::RecordNotFound(id.to_string()));
        }

        self.get_service_record(id).await
    }

    /// Update a record's notes
    pub async fn set_service_record_notes(&self, id: &str, notes: &str) -> Result<ServiceRecord> {
        let now = Utc::now();

        let rows = sqlx::query(
            "UPDATE service_records SET notes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(notes)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::RecordNotFound(id.to_string()));
        }

        self.get_service_record(id).await
    }

    /// Get a service record by ID
    pub async fn get_service_record(&self, id: &str) -> Result<ServiceRecord> {
        let record =
            sqlx::query_as::<_, ServiceRecord>("SELECT * FROM service_records WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::RecordNotFound(id.to_string()))?;

        Ok(record)
    }

    /// Delete all uncompleted service records for a contract. Completed
    /// records are never touched by this path.
    pub async fn delete_incomplete_service_records(&self, contract_id: &str) -> Result<u64> {
        let rows = sqlx::query(
            "DELETE FROM service_records WHERE contract_id = ? AND completed = 0",
        )
        .bind(contract_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::debug!(
            "Deleted {} uncompleted service records for contract {}",
            rows,
            contract_id
        );
        Ok(rows)
    }

    /// List uncompleted service records across all contracts with a due
    /// date on or before the given cutoff
    pub async fn list_open_records_due_before(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<ServiceRecord>> {
        let records = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT * FROM service_records
            WHERE completed = 0 AND due_date <= ?
            ORDER BY due_date
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
