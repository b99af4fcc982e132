//! # appointment-engine
//!
//! Time-based save rules for customer appointments.
//!
//! A proposed appointment is save-eligible when its start is before its end,
//! it falls inside the organization's business hours (defined once in a fixed
//! home zone, checked from whatever zone the user is in), and it touches no
//! other stored appointment. Ties count: back-to-back appointments conflict.
//!
//! ## Modules
//!
//! - [`interval`]: chronology check and the inclusive intersection rule
//! - [`hours`]: business-hours policy and zone conversion
//! - [`slots`]: selectable start/end times for pickers
//! - [`conflict`]: overlap lookup against a store
//! - [`schedule`]: save orchestration (`Scheduler`)
//! - [`store`] / [`file_store`]: store contract, in-memory and JSON-file stores
//! - [`directory`]: id-indexed reference tables and login
//! - [`report`]: report data and the next-week/next-month dashboard view
//! - [`config`]: policy configuration
//! - [`model`]: plain records
//! - [`error`]: error types

pub mod config;
pub mod conflict;
pub mod directory;
pub mod error;
pub mod file_store;
pub mod hours;
pub mod interval;
pub mod model;
pub mod report;
pub mod schedule;
pub mod slots;
pub mod store;

pub use conflict::{find_conflicts, ConflictSummary};
pub use error::{ConfigError, ScheduleError, StoreError};
pub use hours::{validate_business_hours, BusinessHours};
pub use interval::validate_chronology;
pub use schedule::Scheduler;
pub use slots::{list_selectable_ends, list_selectable_starts, Slots};
pub use store::{AppointmentStore, Dataset, DirectoryStore, MemoryStore};
