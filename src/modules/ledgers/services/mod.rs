pub mod balance_aggregator;
pub mod ledger_service;

pub use balance_aggregator::{summarize, BalanceSummary};
pub use ledger_service::{LedgerFilter, LedgerService, ManualEntryRequest, StudentLedgerView};
