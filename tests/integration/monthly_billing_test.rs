// Monthly billing cycle over the in-memory back office

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use hostel_backoffice::modules::billing::models::BillingMonth;
use hostel_backoffice::modules::invoices::models::{InvoiceKind, InvoiceStatus};
use hostel_backoffice::modules::invoices::services::InvoiceFilter;
use hostel_backoffice::core::PageRequest;
use rust_decimal_macros::dec;

fn may() -> BillingMonth {
    "2024-05".parse().unwrap()
}

#[tokio::test]
async fn test_bills_active_students_for_full_month() {
    let services = services_on(date(2024, 5, 1));
    let (ravi, enrollment) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;
    enroll(&services, "Asha", date(2024, 4, 20), None).await;

    assert_eq!(enrollment.unwrap().total, dec!(8267));

    let outcome = services.monthly_billing.run(may(), None).await.unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.failed_count, 0);
    assert_eq!(outcome.total_billed, dec!(15500));
    assert_eq!(outcome.successful[0].student_id, ravi.id);

    let invoice = services
        .invoices
        .get(&outcome.successful[0].invoice_id)
        .await
        .unwrap();
    assert_eq!(invoice.kind, InvoiceKind::Monthly);
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    assert_eq!(invoice.period_start, date(2024, 5, 1));
    assert_eq!(invoice.period_end, date(2024, 5, 31));
    assert_eq!(invoice.due_date, date(2024, 5, 10));
    assert!(invoice.line_items.iter().all(|l| !l.is_prorated));

    let student = services.students.get(&ravi.id).await.unwrap();
    assert_eq!(student.current_balance, dec!(23767));
}

#[tokio::test]
async fn test_second_run_for_same_month_creates_nothing() {
    let services = services_on(date(2024, 5, 1));
    enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;

    let first = services.monthly_billing.run(may(), None).await.unwrap();
    let second = services.monthly_billing.run(may(), None).await.unwrap();

    assert_eq!(first.success_count, 1);
    assert_eq!(second.success_count, 0);
    assert_eq!(second.skipped_count, 1);

    let invoices = services
        .invoices
        .list(
            InvoiceFilter {
                month: Some(may()),
                ..Default::default()
            },
            PageRequest::new(1, 10).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(invoices.pagination.total_items, 1);
}

#[tokio::test]
async fn test_student_enrolled_in_month_is_not_billed_twice() {
    let services = services_on(date(2024, 5, 20));
    let (meera, enrollment) = enroll(
        &services,
        "Meera",
        date(2024, 5, 20),
        Some(fees(dec!(12400), dec!(0), dec!(0))),
    )
    .await;
    // 12 of 31 days
    assert_eq!(enrollment.unwrap().total, dec!(4800));

    let outcome = services.monthly_billing.run(may(), None).await.unwrap();
    assert_eq!(outcome.success_count, 0);
    assert_eq!(outcome.skipped[0].student_id, meera.id);
}

#[tokio::test]
async fn test_explicit_student_list_reports_each_student() {
    let services = services_on(date(2024, 6, 1));
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;
    let (asha, _) = enroll(&services, "Asha", date(2024, 4, 20), None).await;

    let june: BillingMonth = "2024-06".parse().unwrap();
    let outcome = services
        .monthly_billing
        .run(
            june,
            Some(vec![ravi.id.clone(), asha.id.clone(), "missing".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.skipped_count, 1);
    assert_eq!(outcome.skipped[0].student_id, asha.id);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.failed[0].student_id, "missing");
    assert_eq!(outcome.failed[0].error, "NotFound");
}

#[tokio::test]
async fn test_generate_for_single_student_rejects_duplicates() {
    let services = services_on(date(2024, 5, 1));
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 4, 15),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;

    let invoice = services
        .invoices
        .generate_for_student(&ravi.id, may())
        .await
        .unwrap();
    assert_eq!(invoice.total, dec!(15500));

    let again = services.invoices.generate_for_student(&ravi.id, may()).await;
    assert!(matches!(
        again,
        Err(hostel_backoffice::core::AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_student_whose_month_bills_nothing_fails_without_stopping_the_run() {
    let services = services_on(date(2024, 1, 31));
    // One day of a 10/month fee rounds to zero, so enrollment issues no invoice
    let (tiny, enrollment) = enroll(
        &services,
        "Tiny",
        date(2024, 1, 31),
        Some(fees(dec!(10), dec!(0), dec!(0))),
    )
    .await;
    assert!(enrollment.is_none());
    let (ravi, _) = enroll(
        &services,
        "Ravi",
        date(2024, 1, 1),
        Some(fees(dec!(15000), dec!(500), dec!(0))),
    )
    .await;

    let january: BillingMonth = "2024-01".parse().unwrap();
    let outcome = services.monthly_billing.run(january, None).await.unwrap();

    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.failed[0].student_id, tiny.id);
    assert_eq!(outcome.failed[0].error, "ValidationError");
    assert!(outcome.failed[0].message.contains("Nothing to bill"));

    // Ravi's enrollment already covers January
    assert_eq!(outcome.success_count, 0);
    assert_eq!(outcome.skipped_count, 1);
    assert_eq!(outcome.skipped[0].student_id, ravi.id);

    let february: BillingMonth = "2024-02".parse().unwrap();
    let outcome = services.monthly_billing.run(february, None).await.unwrap();
    assert_eq!(outcome.failed_count, 0);
    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.total_billed, dec!(15510));
}
