// Allocation of payments across open invoices

use chrono::NaiveDate;
use hostel_backoffice::modules::payments::models::PaymentAllocation;
use hostel_backoffice::modules::payments::services::{
    allocate_oldest_first, validate_allocations, OpenInvoice,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn open_invoice(id: usize, due_day: u32, balance: u32) -> OpenInvoice {
    OpenInvoice {
        invoice_id: format!("inv-{}", id),
        student_id: "stu-1".to_string(),
        due_date: NaiveDate::from_ymd_opt(2024, 4, due_day).unwrap(),
        balance_due: Decimal::from(balance),
        paid: false,
    }
}

fn invoices() -> impl Strategy<Value = Vec<OpenInvoice>> {
    prop::collection::vec((1u32..=28, 1u32..50_000), 0..8).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (day, balance))| open_invoice(i, day, balance))
            .collect()
    })
}

proptest! {
    #[test]
    fn allocation_conserves_amount(amount in 1u32..200_000, invoices in invoices()) {
        let amount = Decimal::from(amount);
        let plan = allocate_oldest_first(amount, &invoices);

        let allocated: Decimal = plan.allocations.iter().map(|a| a.amount).sum();
        prop_assert_eq!(allocated + plan.unallocated, amount);
        prop_assert!(plan.unallocated >= Decimal::ZERO);

        for allocation in &plan.allocations {
            let invoice = invoices.iter().find(|i| i.invoice_id == allocation.invoice_id).unwrap();
            prop_assert!(allocation.amount > Decimal::ZERO);
            prop_assert!(allocation.amount <= invoice.balance_due);
        }
    }

    #[test]
    fn earlier_due_invoices_are_settled_first(amount in 1u32..200_000, invoices in invoices()) {
        let plan = allocate_oldest_first(Decimal::from(amount), &invoices);

        // Every allocation but the last settles its invoice in full
        if plan.allocations.len() > 1 {
            for allocation in &plan.allocations[..plan.allocations.len() - 1] {
                let invoice = invoices.iter().find(|i| i.invoice_id == allocation.invoice_id).unwrap();
                prop_assert_eq!(allocation.amount, invoice.balance_due);
            }
        }

        let due_dates: Vec<NaiveDate> = plan
            .allocations
            .iter()
            .map(|a| invoices.iter().find(|i| i.invoice_id == a.invoice_id).unwrap().due_date)
            .collect();
        prop_assert!(due_dates.windows(2).all(|w| w[0] <= w[1]));

        // Money is only left over once every invoice is settled
        if plan.unallocated > Decimal::ZERO {
            prop_assert_eq!(plan.allocations.len(), invoices.len());
        }
    }
}

#[test]
fn test_payment_against_enrollment_invoice() {
    let plan = allocate_oldest_first(dec!(8000), &[open_invoice(1, 15, 8267)]);

    assert_eq!(plan.allocations.len(), 1);
    assert_eq!(plan.allocations[0].amount, dec!(8000));
    assert_eq!(plan.unallocated, dec!(0));
}

#[test]
fn test_paid_invoices_are_skipped() {
    let mut paid = open_invoice(1, 1, 1000);
    paid.paid = true;
    let plan = allocate_oldest_first(dec!(500), &[paid, open_invoice(2, 20, 1000)]);

    assert_eq!(plan.allocations[0].invoice_id, "inv-2");
}

#[test]
fn test_explicit_allocation_leaves_remainder_as_advance() {
    let invoices = vec![open_invoice(1, 10, 5000), open_invoice(2, 20, 5000)];
    let requested = vec![PaymentAllocation {
        invoice_id: "inv-2".to_string(),
        amount: dec!(3000),
    }];

    let plan = validate_allocations(dec!(4000), &requested, &invoices, "stu-1").unwrap();
    assert_eq!(plan.allocations, requested);
    assert_eq!(plan.unallocated, dec!(1000));
}
