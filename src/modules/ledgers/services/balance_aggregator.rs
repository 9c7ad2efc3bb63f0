use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::ledgers::models::{BalanceType, LedgerEntry, LedgerEntryType};

/// Totals over a student's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    /// Absolute value of the net balance
    pub current_balance: Decimal,
    /// `total_debits - total_credits`; positive means the student owes
    pub net_balance: Decimal,
    pub balance_type: BalanceType,
    pub last_entry_date: Option<NaiveDate>,
    pub last_entry_type: Option<LedgerEntryType>,
    pub entry_count: usize,
}

/// Scans `entries` in any order; the last entry is the chronologically latest one
pub fn summarize(entries: &[LedgerEntry]) -> BalanceSummary {
    let total_debits: Decimal = entries.iter().map(|e| e.debit).sum();
    let total_credits: Decimal = entries.iter().map(|e| e.credit).sum();
    let net_balance = total_debits - total_credits;
    let last = entries.iter().max_by_key(|e| (e.date, e.sequence));

    BalanceSummary {
        total_debits,
        total_credits,
        current_balance: net_balance.abs(),
        net_balance,
        balance_type: BalanceType::of(net_balance),
        last_entry_date: last.map(|e| e.date),
        last_entry_type: last.map(|e| e.entry_type),
        entry_count: entries.len(),
    }
}
