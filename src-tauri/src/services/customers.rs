//! Customers service
//!
//! Customer CRUD with validation, per-customer equipment counts, and the
//! CSV export used by the customer list.

use crate::database::{CreateCustomerRequest, Customer, Repository, UpdateCustomerRequest};
use crate::error::{AppError, Result};
use serde::Serialize;

/// Customer plus the number of contracts (pieces of equipment) it owns
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub customer: Customer,
    pub equipment_count: i64,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomersService {
    repo: Repository,
}

impl CustomersService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new customer
    pub async fn create_customer(&self, req: CreateCustomerRequest) -> Result<Customer> {
        validate_customer(&req.company, &req.contact_person)?;

        tracing::info!("Creating customer: {}", req.company);
        let customer = self.repo.create_customer(req).await?;
        tracing::info!("Customer created successfully: {}", customer.id);

        Ok(customer)
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        self.repo.get_customer(id).await
    }

    /// List all customers with their equipment counts, ordered by company
    pub async fn list_customers(&self) -> Result<Vec<CustomerSummary>> {
        let customers = self.repo.list_customers().await?;

        let mut summaries = Vec::with_capacity(customers.len());
        for customer in customers {
            let equipment_count = self.repo.count_contracts(&customer.id).await?;
            summaries.push(CustomerSummary {
                customer,
                equipment_count,
            });
        }

        Ok(summaries)
    }

    /// Update a customer
    pub async fn update_customer(&self, req: UpdateCustomerRequest) -> Result<Customer> {
        validate_customer(&req.company, &req.contact_person)?;

        tracing::debug!("Updating customer: {}", req.id);
        self.repo.update_customer(req).await
    }

    /// Delete a customer and, through the store's cascade, all of its
    /// contracts and their service records
    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting customer: {}", id);
        self.repo.delete_customer(id).await
    }

    /// Render the customer list as CSV for export
    pub async fn export_csv(&self) -> Result<String> {
        let summaries = self.list_customers().await?;

        let mut lines = vec!["Company,Contact Person,Email,Phone,Equipment Count".to_string()];
        for summary in &summaries {
            lines.push(format!(
                "{},{},{},{},{}",
                summary.customer.company,
                summary.customer.contact_person,
                summary.customer.email.as_deref().unwrap_or(""),
                summary.customer.phone.as_deref().unwrap_or(""),
                summary.equipment_count,
            ));
        }

        Ok(lines.join("\n"))
    }
}

fn validate_customer(company: &str, contact_person: &str) -> Result<()> {
    if company.trim().is_empty() {
        return Err(AppError::Validation("Company is required".to_string()));
    }
    if contact_person.trim().is_empty() {
        return Err(AppError::Validation(
            "Contact person is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, CreateContractRequest, Repository};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> (CustomersService, Repository) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let repo = Repository::new(pool);
        (CustomersService::new(repo.clone()), repo)
    }

    fn customer_req(company: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            company: company.to_string(),
            contact_person: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_company_and_contact() {
        let (service, _repo) = create_test_service().await;

        let missing_company = CreateCustomerRequest {
            company: "  ".to_string(),
            contact_person: "Jane Doe".to_string(),
            email: None,
            phone: None,
            address: None,
        };
        assert!(matches!(
            service.create_customer(missing_company).await,
            Err(AppError::Validation(_))
        ));

        let missing_contact = CreateCustomerRequest {
            company: "Acme Air".to_string(),
            contact_person: String::new(),
            email: None,
            phone: None,
            address: None,
        };
        assert!(matches!(
            service.create_customer(missing_contact).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_includes_equipment_counts() {
        let (service, repo) = create_test_service().await;

        let customer = service.create_customer(customer_req("Acme Air")).await.unwrap();
        service.create_customer(customer_req("Borealis")).await.unwrap();

        repo.create_contract(
            CreateContractRequest {
                customer_id: customer.id.clone(),
                equipment_type: "Compressor".to_string(),
                brand: "Hitachi".to_string(),
                model: None,
                serial_number: None,
                last_service_date: None,
                contract_type: "Annual Service".to_string(),
                contract_period: 12,
                contract_start_date: None,
                remarks: None,
            },
            None,
        )
        .await
        .unwrap();

        let summaries = service.list_customers().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].customer.company, "Acme Air");
        assert_eq!(summaries[0].equipment_count, 1);
        assert_eq!(summaries[1].equipment_count, 0);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (service, _repo) = create_test_service().await;

        service.create_customer(customer_req("Acme Air")).await.unwrap();

        let csv = service.export_csv().await.unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Company,Contact Person,Email,Phone,Equipment Count")
        );
        assert_eq!(
            lines.next(),
            Some("Acme Air,Jane Doe,jane@example.com,555-0100,0")
        );
        assert_eq!(lines.next(), None);
    }
}
