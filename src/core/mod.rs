//! Core algorithms and write-boundary services for the envelope ledger.

pub mod balance;
pub mod consistency;
pub mod guard;
pub mod seed;
pub mod services;

pub use balance::BalanceBook;
pub use consistency::ConsistencyReport;
pub use seed::{SeedReport, SeedService};
