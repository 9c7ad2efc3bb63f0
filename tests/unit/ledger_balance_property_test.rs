// Property tests for the running balance of a student ledger

use chrono::{NaiveDate, Utc};
use hostel_backoffice::modules::ledgers::models::{
    BalanceType, EditLedgerEntry, LedgerEntryType, NewLedgerEntry, StudentLedger,
};
use hostel_backoffice::modules::ledgers::services::summarize;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Movement {
    is_debit: bool,
    amount: u32,
    day: u32,
}

fn movement() -> impl Strategy<Value = Movement> {
    (any::<bool>(), 1u32..100_000, 1u32..=28).prop_map(|(is_debit, amount, day)| Movement {
        is_debit,
        amount,
        day,
    })
}

fn to_entry(m: &Movement) -> NewLedgerEntry {
    let date = NaiveDate::from_ymd_opt(2024, 4, m.day).unwrap();
    let amount = Decimal::from(m.amount);
    if m.is_debit {
        NewLedgerEntry::debit("stu-1", LedgerEntryType::Invoice, "Invoice", amount, date, None)
    } else {
        NewLedgerEntry::credit("stu-1", LedgerEntryType::Payment, "Payment", amount, date, None)
    }
}

fn assert_chain(ledger: &StudentLedger) -> Result<(), TestCaseError> {
    let mut running = Decimal::ZERO;
    let mut previous: Option<(NaiveDate, u64)> = None;

    for entry in &ledger.entries {
        if let Some(prev) = previous {
            prop_assert!(prev <= (entry.date, entry.sequence), "entries out of order");
        }
        previous = Some((entry.date, entry.sequence));

        running += entry.debit - entry.credit;
        prop_assert_eq!(entry.balance, running);
        prop_assert_eq!(entry.balance_type, BalanceType::of(running));
    }

    let debits: Decimal = ledger.entries.iter().map(|e| e.debit).sum();
    let credits: Decimal = ledger.entries.iter().map(|e| e.credit).sum();
    prop_assert_eq!(ledger.balance(), debits - credits);
    Ok(())
}

proptest! {
    #[test]
    fn balance_holds_after_backdated_inserts(movements in prop::collection::vec(movement(), 1..40)) {
        let mut ledger = StudentLedger::new("stu-1");
        for m in &movements {
            ledger.append(to_entry(m), Utc::now()).unwrap();
            assert_chain(&ledger)?;
        }
    }

    #[test]
    fn balance_holds_after_edits(
        movements in prop::collection::vec(movement(), 1..30),
        pick in any::<prop::sample::Index>(),
        new_amount in 1u32..100_000,
    ) {
        let mut ledger = StudentLedger::new("stu-1");
        for m in &movements {
            ledger.append(to_entry(m), Utc::now()).unwrap();
        }

        let target = ledger.entries[pick.index(ledger.entries.len())].clone();
        let changes = if target.debit > Decimal::ZERO {
            EditLedgerEntry { debit: Some(Decimal::from(new_amount)), ..Default::default() }
        } else {
            EditLedgerEntry { credit: Some(Decimal::from(new_amount)), ..Default::default() }
        };
        ledger.edit(&target.id, changes, Utc::now()).unwrap();

        assert_chain(&ledger)?;
    }

    #[test]
    fn summary_matches_ledger(movements in prop::collection::vec(movement(), 0..30)) {
        let mut ledger = StudentLedger::new("stu-1");
        for m in &movements {
            ledger.append(to_entry(m), Utc::now()).unwrap();
        }

        let summary = summarize(&ledger.entries);
        prop_assert_eq!(summary.entry_count, ledger.entries.len());
        prop_assert_eq!(summary.net_balance, ledger.balance());
        prop_assert_eq!(summary.total_debits - summary.total_credits, ledger.balance());
    }
}
