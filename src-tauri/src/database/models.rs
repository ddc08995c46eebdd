//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to frontend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A customer owning one or more service contracts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: String,
    pub company: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create customer request
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub company: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Update customer request
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub id: String,
    pub company: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A service contract for one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: String,
    pub customer_id: String,
    pub equipment_type: String,
    pub brand: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub last_service_date: Option<NaiveDate>,
    pub contract_type: String,
    /// Total contract duration in months
    pub contract_period: i64,
    pub contract_start_date: Option<NaiveDate>,
    /// Derived from start date + period; recomputed on every write,
    /// never independently authoritative
    pub contract_end_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// The date the schedule is anchored to. Contracts without an explicit
    /// start date fall back to their creation timestamp; this is the single
    /// place that rule lives.
    pub fn effective_start_date(&self) -> NaiveDate {
        self.contract_start_date
            .unwrap_or_else(|| self.created_at.date_naive())
    }

    /// The terms that drive schedule generation
    pub fn terms(&self) -> ContractTerms {
        ContractTerms {
            contract_type: self.contract_type.clone(),
            contract_period: self.contract_period,
            contract_start_date: self.contract_start_date,
        }
    }
}

/// The subset of contract fields that drive schedule generation.
/// When any of these change on an edit, the schedule is regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub contract_type: String,
    pub contract_period: i64,
    pub contract_start_date: Option<NaiveDate>,
}

/// Create contract request
#[derive(Debug, Deserialize)]
pub struct CreateContractRequest {
    pub customer_id: String,
    pub equipment_type: String,
    pub brand: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub last_service_date: Option<NaiveDate>,
    pub contract_type: String,
    pub contract_period: i64,
    pub contract_start_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Update contract request
#[derive(Debug, Deserialize)]
pub struct UpdateContractRequest {
    pub id: String,
    pub customer_id: String,
    pub equipment_type: String,
    pub brand: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub last_service_date: Option<NaiveDate>,
    pub contract_type: String,
    pub contract_period: i64,
    pub contract_start_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Contract joined with its owning customer, for the contract list view
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContractWithCustomer {
    pub id: String,
    pub customer_id: String,
    pub company: String,
    pub contact_person: String,
    pub equipment_type: String,
    pub brand: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub last_service_date: Option<NaiveDate>,
    pub contract_type: String,
    pub contract_period: i64,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted service visit, possibly completed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRecord {
    pub id: String,
    pub contract_id: String,
    pub due_date: NaiveDate,
    pub period_number: i64,
    pub year: i64,
    pub completed: bool,
    /// Set when completed flips false -> true, cleared on true -> false
    pub completed_date: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert request for a service record
#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceRecord {
    pub contract_id: String,
    pub due_date: NaiveDate,
    pub period_number: i64,
    pub year: i64,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub notes: String,
}
