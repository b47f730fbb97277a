//! # HMS Accounting
//!
//! The accounting core of a hospital management system: a hierarchical
//! chart of accounts, financial-year lifecycle, double-entry journal
//! posting, per-account ledger reconstruction, and trial-balance
//! generation.
//!
//! ## Features
//!
//! - **Chart of accounts**: typed, hierarchical accounts with cycle-safe
//!   reparenting and soft deletion
//! - **Financial years**: non-overlapping fiscal periods with ordered
//!   close/reopen and a single current period
//! - **Double-entry posting**: exactly-balanced journal entries applied
//!   atomically to account balances
//! - **Ledger reconstruction**: chronological running-balance views with
//!   pagination
//! - **Trial balance**: point-in-time snapshots with type grouping and a
//!   loudly-surfaced integrity check
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use hms_accounting::{AccountingCore, AccountType, NewAccount, NewFinancialYear};
//! use hms_accounting::utils::MemoryStorage;
//!
//! // The core works over any AccountingStorage implementation;
//! // MemoryStorage is the in-process one used in tests and demos.
//! // let mut core = AccountingCore::new(MemoryStorage::new());
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
