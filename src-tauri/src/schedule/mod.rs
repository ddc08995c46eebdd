//! Service schedule engine
//!
//! The pure core of the application:
//! - `generator`: maps contract terms to an ordered sequence of due
//!   service occurrences
//! - `reconcile`: merges generated occurrences with persisted service
//!   records into the view the display layer renders
//!
//! Everything store-coupled (toggles, notes, regeneration) lives in
//! `services::schedule` on top of these functions.

pub mod generator;
pub mod reconcile;

pub use generator::{generate_schedule, ContractType, ServiceOccurrence};
pub use reconcile::{merge_schedule, RecordState, ScheduleEntry};
