//! Application configuration constants
//!
//! Central location for catalog values, resource limits, and validation
//! boundaries used throughout the application.

// ===== Equipment Catalog =====

/// Equipment categories offered under service contracts
pub const EQUIPMENT_TYPES: &[&str] = &[
    "Heated Dryer",
    "Refrigerant Dryer",
    "Compressor",
    "Vacuum Pump",
];

/// Brands serviced under contract
pub const BRANDS: &[&str] = &[
    "Everair",
    "Beko",
    "Genesis",
    "Friulair",
    "Donaldson",
    "Hitachi",
    "Sullair",
    "Atlas Copco",
    "Kobelco",
    "Ingersoll Rand",
];

// ===== Contract Types =====

/// Recognized contract type names. Any other stored value behaves as an
/// annual contract when the schedule is generated.
pub const CONTRACT_TYPES: &[&str] = &[
    "Quarterly Service",
    "Half-year Service",
    "Annual Service",
];

// ===== Validation Limits =====

/// Minimum contract period in months. Zero or negative periods are
/// rejected before any schedule is generated.
pub const MIN_CONTRACT_PERIOD_MONTHS: i64 = 1;

// ===== Overdue Notifier =====

/// How far ahead of the due date a service visit is announced, in days
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Seconds between background checks for due service visits
pub const OVERDUE_CHECK_INTERVAL_SECS: u64 = 3600;
