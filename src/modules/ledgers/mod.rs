// Ledgers module: per-student running-balance bookkeeping

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BalanceType, LedgerEntry, LedgerEntryType, NewLedgerEntry, StudentLedger};
pub use repositories::LedgerRepository;
pub use services::{BalanceSummary, LedgerService};
