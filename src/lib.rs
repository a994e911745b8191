//! Pantry Budget - Household Shopping Budget Tracker Library
//!
//! A small tracker with:
//! - Trip calculator for the shopping days left in the current month
//! - Per-trip budget allocation (truncated to whole cents)
//! - JSON-file state store holding the single budget record
//! - Web server and browser UI for reading and updating the budget
//!
//! # Example
//!
//! ```
//! use pantry_budget::schedule::TripSchedule;
//! use pantry_budget::allocation::per_trip;
//! use rust_decimal_macros::dec;
//!
//! let schedule = TripSchedule::default();
//! let now = chrono::Local::now();
//! let trips = schedule.remaining_trips(now);
//! let share = per_trip(dec!(600), trips);
//! assert!(share >= rust_decimal::Decimal::ZERO);
//! ```

// Core modules
pub mod allocation;
pub mod schedule;
pub mod store;

// Plumbing modules
pub mod assets;
pub mod cli;
pub mod config;
pub mod server;

// Re-export commonly used types for convenience
pub use allocation::per_trip;
pub use config::Config;
pub use schedule::TripSchedule;
pub use store::{BudgetError, BudgetState, BudgetStore};

pub use server::{
    ServerState,
    start as start_server,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Household shopping budget tracker", NAME, VERSION)
}
