mod ledger_entry;
mod student_ledger;

pub use ledger_entry::{BalanceType, LedgerEntry, LedgerEntryType, NewLedgerEntry};
pub use student_ledger::{EditLedgerEntry, StudentLedger};
