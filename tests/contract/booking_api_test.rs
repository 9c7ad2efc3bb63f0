// HTTP contract for /api/v1/booking-requests

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn booking_body(name: &str) -> Value {
    json!({
        "applicantName": name,
        "phone": "9876543210",
        "guardianName": "Suresh",
        "preferredRoomType": "double",
        "checkInDate": "2024-04-15"
    })
}

#[actix_web::test]
async fn test_create_and_fetch_booking() {
    let services = services_on(date(2024, 4, 10));
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(booking_body("Ravi"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["applicantName"], "Ravi");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/booking-requests/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["checkInDate"], "2024-04-15");

    let req = test::TestRequest::get()
        .uri("/api/v1/booking-requests?status=pending")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);
}

#[actix_web::test]
async fn test_create_booking_validation() {
    let services = services_on(date(2024, 4, 10));
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(booking_body("  "))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "ValidationError");

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(json!({ "phone": "9876543210" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_approve_enrolls_and_bills() {
    let services = services_on(date(2024, 4, 15));
    let room = create_room(&services, "101", 2).await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(booking_body("Ravi"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/booking-requests/{}/approve", id))
        .set_json(json!({
            "roomId": room.id,
            "feeConfiguration": { "baseMonthlyFee": 15000, "laundryFee": 500 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["bookingRequest"]["status"], "approved");
    assert_eq!(data["student"]["status"], "active");
    assert_eq!(data["student"]["roomNumber"], "101");
    assert_eq!(data["bookingRequest"]["studentId"], data["student"]["id"]);
    assert_eq!(money(&data["invoice"]["total"]), dec!(8267));
    assert_eq!(money(&data["student"]["currentBalance"]), dec!(8267));

    // a decided booking cannot be processed again
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/booking-requests/{}/approve", id))
        .set_json(json!({ "roomId": room.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Conflict");
}

#[actix_web::test]
async fn test_approve_into_unknown_room() {
    let services = services_on(date(2024, 4, 15));
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(booking_body("Ravi"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/booking-requests/{}/approve", id))
        .set_json(json!({ "roomId": "no-such-room" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // the booking is still open
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/booking-requests/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "pending");
}

#[actix_web::test]
async fn test_reject_booking() {
    let services = services_on(date(2024, 4, 10));
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/booking-requests")
        .set_json(booking_body("Meera"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/booking-requests/{}/reject", id))
        .set_json(json!({ "reason": "No female dormitory beds" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejectionReason"], "No female dormitory beds");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/booking-requests/{}/reject", id))
        .set_json(json!({ "reason": "Again" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/v1/booking-requests/missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
