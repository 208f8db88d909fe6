mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Weekday;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use scheduling_cell::router::scheduling_routes;

fn test_app() -> (tempfile::TempDir, Router) {
    let (dir, _path, service) = empty_service();
    (dir, scheduling_routes(service))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn booking_body(date: &str, start_time: &str) -> Value {
    json!({
        "appointment_type": "consultation",
        "date": date,
        "start_time": start_time,
        "patient": {
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-0100"
        },
        "reason": "Annual checkup"
    })
}

#[tokio::test]
async fn availability_endpoint_returns_the_full_grid() {
    let (_dir, app) = test_app();
    let monday = date_str(upcoming(Weekday::Mon));

    let (status, body) = get_json(
        app,
        &format!("/availability?date={monday}&appointment_type=consultation"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], json!(monday));
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 31);
    assert_eq!(slots[0]["start_time"], json!("09:00"));
    // The grid includes closed slots; 11:45 crosses the lunch break
    let lunch_edge = slots.iter().find(|s| s["start_time"] == json!("11:45")).unwrap();
    assert_eq!(lunch_edge["available"], json!(false));
}

#[tokio::test]
async fn open_slots_endpoint_filters_and_counts() {
    let (_dir, app) = test_app();
    let monday = date_str(upcoming(Weekday::Mon));

    let (status, body) = get_json(
        app,
        &format!("/availability/open?date={monday}&time_preference=morning"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["time_preference"], json!("morning"));
    let slots = body["available_slots"].as_array().unwrap();
    assert_eq!(body["slots_count"], json!(slots.len()));
    assert!(slots.iter().all(|s| s["available"] == json!(true)));
}

#[tokio::test]
async fn unrecognized_preference_means_no_filtering() {
    let (_dir, app) = test_app();
    let monday = date_str(upcoming(Weekday::Mon));

    let (status, body) = get_json(
        app.clone(),
        &format!("/availability/open?date={monday}&time_preference=dawn"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["time_preference"], Value::Null);

    let (_, unfiltered) = get_json(app, &format!("/availability/open?date={monday}")).await;
    assert_eq!(body["slots_count"], unfiltered["slots_count"]);
}

#[tokio::test]
async fn next_dates_and_suggestions_endpoints_respond() {
    let (_dir, app) = test_app();

    let (status, body) = get_json(app.clone(), "/availability/next?max_dates=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_dates"].as_array().unwrap().len(), 3);

    let (status, body) = get_json(app, "/suggestions?num_suggestions=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn booking_flow_over_http() {
    let (_dir, app) = test_app();
    let monday = date_str(upcoming(Weekday::Mon));

    let (status, confirmed) =
        post_json(app.clone(), "/bookings", booking_body(&monday, "10:00")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], json!("confirmed"));
    let booking_id = confirmed["booking_id"].as_str().unwrap().to_string();
    assert_eq!(confirmed["details"]["end_time"], json!("10:30"));

    // The same slot fails as a value, not as an HTTP error
    let (status, taken) =
        post_json(app.clone(), "/bookings", booking_body(&monday, "10:00")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(taken["status"], json!("failed"));

    let (status, fetched) = get_json(app.clone(), &format!("/bookings/{booking_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["booking_id"], json!(booking_id));
    assert_eq!(fetched["status"], json!("confirmed"));

    let (status, cancelled) =
        post_json(app.clone(), &format!("/bookings/{booking_id}/cancel"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["cancelled"], json!(true));

    let (status, _) = get_json(app, "/bookings/APPT-00000000-XXXXXX").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validate_endpoint_lists_missing_fields() {
    let (_dir, app) = test_app();

    let (status, body) = post_json(
        app,
        "/bookings/validate",
        json!({"patient_name": "Jane Doe", "reason": "checkup"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], json!(false));
    assert_eq!(body["missing_fields"], json!(["email", "phone"]));
}
