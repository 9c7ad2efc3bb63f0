// HTTP contract for /api/v1/invoices

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_monthly_billing_run() {
    let services = services_on(date(2024, 5, 2));
    let (ravi, _) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    enroll(&services, "Arjun", date(2024, 4, 1), Some(fees(dec!(9000), dec!(0), dec!(0)))).await;
    enroll(&services, "Meera", date(2024, 4, 5), None).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/monthly-billing")
        .set_json(json!({ "month": "2024-05" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["month"], "2024-05");
    assert_eq!(body["data"]["successCount"], 2);
    assert_eq!(body["data"]["failedCount"], 0);
    assert_eq!(money(&body["data"]["totalBilled"]), dec!(24500));

    // repeating the run bills nobody twice
    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/monthly-billing")
        .set_json(json!({ "month": "2024-05", "studentIds": [ravi.id, "ghost"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["successCount"], 0);
    assert_eq!(body["data"]["skippedCount"], 1);
    assert_eq!(body["data"]["failed"][0]["studentId"], "ghost");
    assert_eq!(body["data"]["failed"][0]["error"], "NotFound");

    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/monthly-billing")
        .set_json(json!({ "month": "May 2024" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_list_and_get_invoices() {
    let services = services_on(date(2024, 5, 2));
    let (ravi, invoice) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    let invoice = invoice.unwrap();
    enroll(&services, "Arjun", date(2024, 4, 1), Some(fees(dec!(9000), dec!(0), dec!(0)))).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/invoices?limit=1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["currentPage"], 1);
    assert_eq!(body["data"]["pagination"]["totalItems"], 2);
    assert_eq!(body["data"]["pagination"]["itemsPerPage"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/invoices?studentId={}&status=unpaid", ravi.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);
    assert_eq!(body["data"]["items"][0]["kind"], "enrollment");

    let req = test::TestRequest::get().uri("/api/v1/invoices?limit=101").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ValidationError");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/invoices/{}", invoice.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["billingMonth"], "2024-04");
    assert_eq!(body["data"]["periodStart"], "2024-04-15");
    assert_eq!(body["data"]["periodEnd"], "2024-04-30");
    assert_eq!(money(&body["data"]["balanceDue"]), dec!(8267));
    assert_eq!(body["data"]["lineItems"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/v1/invoices/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_generate_single_invoice() {
    let services = services_on(date(2024, 5, 2));
    let (ravi, _) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    let (meera, _) = enroll(&services, "Meera", date(2024, 4, 5), None).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/generate")
        .set_json(json!({ "studentId": ravi.id, "month": "2024-06" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["kind"], "monthly");
    assert_eq!(money(&body["data"]["total"]), dec!(15500));

    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/generate")
        .set_json(json!({ "studentId": ravi.id, "month": "2024-06" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Conflict");

    // no fees configured yet
    let req = test::TestRequest::post()
        .uri("/api/v1/invoices/generate")
        .set_json(json!({ "studentId": meera.id, "month": "2024-06" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_invoice_stats() {
    let services = services_on(date(2024, 5, 2));
    enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    enroll(&services, "Arjun", date(2024, 4, 1), Some(fees(dec!(9000), dec!(0), dec!(0)))).await;
    services
        .monthly_billing
        .run(hostel_backoffice::billing::BillingMonth::from_date(date(2024, 5, 1)), None)
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/invoices/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["totalInvoices"], 4);
    assert_eq!(money(&data["totalAmount"]), dec!(41767));
    assert_eq!(money(&data["totalOutstanding"]), dec!(41767));
    assert_eq!(data["byStatus"]["unpaid"]["count"], 4);
    assert_eq!(data["byStatus"]["paid"]["count"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/invoices/stats?month=2024-05")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalInvoices"], 2);
    assert_eq!(money(&body["data"]["totalAmount"]), dec!(24500));
}
