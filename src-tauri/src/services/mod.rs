//! Service layer
//!
//! High-level business logic on top of the repository:
//! - `customers`: customer lifecycle and CSV export
//! - `contracts`: contract lifecycle, validation, regeneration trigger
//! - `schedule`: merged schedule views and service record lifecycle
//! - `overdue`: background due-service notifier

pub mod contracts;
pub mod customers;
pub mod overdue;
pub mod schedule;

pub use contracts::{ContractUpdateResult, ContractsService};
pub use customers::{CustomerSummary, CustomersService};
pub use overdue::OverdueService;
pub use schedule::{RegenerationOutcome, ScheduleService};
