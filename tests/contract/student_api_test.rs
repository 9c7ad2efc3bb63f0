// HTTP contract for /api/v1/students

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_list_filters_and_paginates() {
    let services = services_on(date(2024, 4, 20));
    enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    enroll(&services, "Meera", date(2024, 4, 5), None).await;
    enroll(&services, "Arjun", date(2024, 4, 1), Some(fees(dec!(9000), dec!(0), dec!(0)))).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/api/v1/students?limit=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["totalItems"], 3);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);
    // sorted by name
    assert_eq!(body["data"]["items"][0]["name"], "Arjun");

    let req = test::TestRequest::get()
        .uri("/api/v1/students?status=pending_configuration")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Meera");

    let req = test::TestRequest::get().uri("/api/v1/students?search=RAV").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);

    let req = test::TestRequest::get().uri("/api/v1/students?limit=0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_get_and_update_student() {
    let services = services_on(date(2024, 4, 20));
    let (ravi, _) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{}", ravi.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["roomNumber"], "R-Ravi");
    assert_eq!(money(&body["data"]["feeConfiguration"]["baseMonthlyFee"]), dec!(15000));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{}", ravi.id))
        .set_json(json!({ "email": "ravi@example.com" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "ravi@example.com");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{}", ravi.id))
        .set_json(json!({ "phone": "12" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/api/v1/students/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn test_configure_fees_activates_pending_student() {
    let services = services_on(date(2024, 4, 20));
    let (meera, _) = enroll(&services, "Meera", date(2024, 4, 5), None).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{}/fees", meera.id))
        .set_json(json!({ "baseMonthlyFee": -5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{}/fees", meera.id))
        .set_json(json!({ "baseMonthlyFee": 9000 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["student"]["status"], "active");
    // 5th to 30th of April
    assert_eq!(money(&body["data"]["invoice"]["total"]), dec!(7800));
    assert_eq!(money(&body["data"]["student"]["currentBalance"]), dec!(7800));

    // later changes only affect future cycles
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{}/fees", meera.id))
        .set_json(json!({ "baseMonthlyFee": 10000 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["invoice"].is_null());
    assert_eq!(money(&body["data"]["student"]["currentBalance"]), dec!(7800));
}

#[actix_web::test]
async fn test_checkout_and_balance() {
    let services = services_on(date(2024, 4, 20));
    let (ravi, _) = enroll(&services, "Ravi", date(2024, 4, 15), Some(fees(dec!(15000), dec!(500), dec!(0)))).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/students/{}/checkout", ravi.id))
        .set_json(json!({ "checkoutDate": "2024-04-01" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/students/{}/checkout", ravi.id))
        .set_json(json!({ "checkoutDate": "2024-04-20" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["student"]["status"], "checked_out");
    assert_eq!(data["student"]["checkoutDate"], "2024-04-20");
    assert_eq!(money(&data["credit"]["credit"]), dec!(5167));
    assert!(data["invoice"].is_null());
    assert_eq!(money(&data["balance"]["netBalance"]), dec!(3100));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{}/balance", ravi.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(money(&body["data"]["totalDebits"]), dec!(8267));
    assert_eq!(money(&body["data"]["totalCredits"]), dec!(5167));
    assert_eq!(body["data"]["entryCount"], 2);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/students/{}/checkout", ravi.id))
        .set_json(json!({ "checkoutDate": "2024-04-21" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
