// Checkout: final billing or unused-day credit, room release, status change

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use hostel_backoffice::core::{AppError, PageRequest};
use hostel_backoffice::modules::billing::models::BillingMonth;
use hostel_backoffice::modules::invoices::models::InvoiceKind;
use hostel_backoffice::modules::invoices::services::InvoiceFilter;
use hostel_backoffice::modules::ledgers::models::{BalanceType, LedgerEntryType};
use hostel_backoffice::modules::students::models::StudentStatus;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_checkout_in_billed_month_credits_unused_days() {
    let services = services_on(date(2024, 4, 20));
    let (ravi, invoice) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;
    let invoice = invoice.unwrap();
    let room_id = ravi.room_id.clone().unwrap();

    let outcome = services
        .students
        .checkout(&ravi.id, date(2024, 4, 20))
        .await
        .unwrap();

    assert!(outcome.invoice.is_none());
    let credit = outcome.credit.unwrap();
    assert_eq!(credit.entry_type, LedgerEntryType::CheckoutCredit);
    // 10 unused days: 5000 base + 167 laundry
    assert_eq!(credit.credit, dec!(5167));
    assert_eq!(credit.reference_id, Some(invoice.id));

    assert_eq!(outcome.balance.net_balance, dec!(3100));
    assert_eq!(outcome.balance.balance_type, BalanceType::Dr);
    assert_eq!(outcome.student.status, StudentStatus::CheckedOut);
    assert_eq!(outcome.student.checkout_date, Some(date(2024, 4, 20)));
    assert_eq!(outcome.student.current_balance, dec!(3100));

    let room = services.rooms.get(&room_id).await.unwrap();
    assert_eq!(room.occupancy, 0);
}

#[tokio::test]
async fn test_checkout_in_unbilled_month_issues_final_invoice() {
    let services = services_on(date(2024, 5, 20));
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;

    let outcome = services
        .students
        .checkout(&ravi.id, date(2024, 5, 20))
        .await
        .unwrap();

    let invoice = outcome.invoice.unwrap();
    assert_eq!(invoice.kind, InvoiceKind::Checkout);
    assert_eq!(invoice.period_start, date(2024, 5, 1));
    assert_eq!(invoice.period_end, date(2024, 5, 20));
    assert_eq!(invoice.due_date, date(2024, 5, 20));
    // 20 of 31 days: 9677 + 323
    assert_eq!(invoice.total, dec!(10000));
    assert!(outcome.credit.is_none());
    assert_eq!(outcome.balance.net_balance, dec!(18267));
}

#[tokio::test]
async fn test_checked_out_student_is_left_out_of_billing() {
    let services = services_on(date(2024, 4, 20));
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;
    services
        .students
        .checkout(&ravi.id, date(2024, 4, 20))
        .await
        .unwrap();

    let may: BillingMonth = "2024-05".parse().unwrap();
    let outcome = services.monthly_billing.run(may, None).await.unwrap();
    assert_eq!(outcome.success_count, 0);

    let explicit = services
        .monthly_billing
        .run(may, Some(vec![ravi.id.clone()]))
        .await
        .unwrap();
    assert_eq!(explicit.skipped_count, 1);
}

#[tokio::test]
async fn test_invalid_checkouts_are_rejected() {
    let services = services_on(date(2024, 4, 20));
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;

    assert!(matches!(
        services.students.checkout(&ravi.id, date(2024, 4, 10)).await,
        Err(AppError::Validation(_))
    ));

    services
        .students
        .checkout(&ravi.id, date(2024, 4, 25))
        .await
        .unwrap();
    assert!(matches!(
        services.students.checkout(&ravi.id, date(2024, 4, 26)).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_pending_student_checks_out_without_billing() {
    let services = services_on(date(2024, 4, 20));
    let (asha, _) = enroll(&services, "Asha", date(2024, 4, 15), None).await;

    let outcome = services
        .students
        .checkout(&asha.id, date(2024, 4, 18))
        .await
        .unwrap();

    assert!(outcome.invoice.is_none());
    assert!(outcome.credit.is_none());
    assert_eq!(outcome.balance.entry_count, 0);
    assert_eq!(outcome.student.status, StudentStatus::CheckedOut);
}

#[tokio::test]
async fn test_checkout_with_nothing_left_to_bill_still_closes_the_student() {
    let services = services_on(date(2024, 3, 1));
    let (tiny, _) = enroll(
        &services,
        "Tiny",
        date(2024, 1, 1),
        Some(fees(dec!(10), dec!(0), dec!(0))),
    )
    .await;
    let room_id = tiny.room_id.clone().unwrap();

    let outcome = services
        .students
        .checkout(&tiny.id, date(2024, 3, 1))
        .await
        .unwrap();

    assert!(outcome.invoice.is_none());
    assert!(outcome.credit.is_none());
    assert_eq!(outcome.student.status, StudentStatus::CheckedOut);
    assert_eq!(outcome.student.checkout_date, Some(date(2024, 3, 1)));
    // Only the January enrollment invoice was ever issued
    assert_eq!(outcome.balance.net_balance, dec!(10));

    let march = BillingMonth::from_date(date(2024, 3, 1));
    let invoices = services
        .invoices
        .list(
            InvoiceFilter {
                student_id: Some(tiny.id.clone()),
                month: Some(march),
                ..Default::default()
            },
            PageRequest::new(1, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(invoices.pagination.total_items, 0);

    let room = services.rooms.get(&room_id).await.unwrap();
    assert_eq!(room.occupancy, 0);
}
