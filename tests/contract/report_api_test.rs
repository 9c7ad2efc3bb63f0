// HTTP contract for /api/v1/reports and /api/v1/analytics

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use helpers::*;
use hostel_backoffice::app::AppServices;
use hostel_backoffice::payments::models::{CreatePaymentRequest, PaymentMethod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

async fn pay(services: &AppServices, student_id: &str, amount: Decimal, method: PaymentMethod, day: u32) {
    services
        .payments
        .record(CreatePaymentRequest {
            student_id: student_id.to_string(),
            amount,
            method,
            payment_date: Some(date(2024, 4, day)),
            reference_number: None,
            notes: None,
            allocations: None,
        })
        .await
        .expect("payment recorded");
}

/// April with one part-paying student and one in advance
async fn april() -> AppServices {
    let services = services_on(date(2024, 4, 30));
    let (ravi, _) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    let (arjun, _) = enroll(&services, "Arjun", date(2024, 4, 1), Some(fees(dec!(9000), dec!(0), dec!(0)))).await;
    pay(&services, &ravi.id, dec!(8000), PaymentMethod::Cash, 20).await;
    pay(&services, &arjun.id, dec!(10000), PaymentMethod::Online, 25).await;
    services
}

#[actix_web::test]
async fn test_financial_report() {
    let services = april().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/reports/financial?startDate=2024-04-01&endDate=2024-04-30")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(money(&data["totalInvoiced"]), dec!(17267));
    assert_eq!(money(&data["totalCollected"]), dec!(18000));
    assert_eq!(money(&data["collectedByMethod"]["cash"]), dec!(8000));
    assert_eq!(money(&data["collectedByMethod"]["online"]), dec!(10000));
    assert_eq!(data["paymentCount"], 2);
    assert_eq!(money(&data["outstandingDues"]), dec!(267));
    assert_eq!(money(&data["advanceHeld"]), dec!(1000));
    assert_eq!(data["invoiceCount"], 2);

    // positions as of a date before any payment
    let req = test::TestRequest::get()
        .uri("/api/v1/reports/financial?startDate=2024-04-01&endDate=2024-04-19")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(money(&body["data"]["totalCollected"]), Decimal::ZERO);
    assert_eq!(money(&body["data"]["outstandingDues"]), dec!(17267));
}

#[actix_web::test]
async fn test_financial_report_rejects_bad_ranges() {
    let services = april().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/reports/financial?startDate=2024-04-30&endDate=2024-04-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/v1/reports/financial?startDate=2023-01-01&endDate=2024-04-30")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/v1/reports/financial?startDate=2024-04-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_monthly_report_and_snapshots() {
    let services = april().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/reports/monthly/2024-04").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["periodStart"], "2024-04-01");
    assert_eq!(body["data"]["periodEnd"], "2024-04-30");
    assert_eq!(money(&body["data"]["totalInvoiced"]), dec!(17267));

    let req = test::TestRequest::get().uri("/api/v1/reports/monthly/April").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .set_json(json!({ "kind": "monthly", "month": "2024-04" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["kind"], "monthly");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/reports/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["month"], "2024-04");
    assert_eq!(money(&body["data"]["summary"]["totalCollected"]), dec!(18000));

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .set_json(json!({ "kind": "financial" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/api/v1/reports?kind=monthly").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);

    let req = test::TestRequest::get().uri("/api/v1/reports/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_dashboard() {
    let services = april().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/analytics/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["students"]["total"], 2);
    assert_eq!(data["students"]["active"], 2);
    assert_eq!(data["rooms"]["totalRooms"], 2);
    assert_eq!(data["rooms"]["occupiedBeds"], 2);
    assert_eq!(money(&data["rooms"]["occupancyRate"]), dec!(100));
    assert_eq!(data["currentMonth"]["month"], "2024-04");
    assert_eq!(money(&data["currentMonth"]["invoiced"]), dec!(17267));
    assert_eq!(money(&data["currentMonth"]["collected"]), dec!(18000));
    assert_eq!(money(&data["totalOutstanding"]), dec!(267));
    assert_eq!(money(&data["totalAdvance"]), dec!(1000));
    assert_eq!(data["topDebtors"].as_array().unwrap().len(), 1);
    assert_eq!(data["topDebtors"][0]["studentName"], "Ravi");
}

#[actix_web::test]
async fn test_collection_trend() {
    let services = april().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/analytics/collection-trend").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let trend = body["data"].as_array().unwrap();
    assert_eq!(trend.len(), 6);
    assert_eq!(trend[0]["month"], "2023-11");
    assert_eq!(trend[5]["month"], "2024-04");
    assert_eq!(money(&trend[4]["invoiced"]), Decimal::ZERO);

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/collection-trend?months=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    for months in ["0", "25"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/analytics/collection-trend?months={}", months))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
