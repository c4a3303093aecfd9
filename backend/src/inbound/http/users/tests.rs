//! Handler tests for registration, login, and user records.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::routes::configure;
use crate::inbound::http::test_utils::test_state;

async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri(path)
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

fn registration() -> Value {
    json!({
        "firstName": "ada",
        "lastName": "Lovelace",
        "email": "Ada@Example.com",
        "password": "engine",
        "phone": "0700"
    })
}

#[actix_web::test]
async fn register_returns_token_and_profile() {
    let (status, body) = post_json("/auth/register", registration()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Registration successful");
    let data = &body["data"];
    assert!(!data["accessToken"].as_str().unwrap_or_default().is_empty());
    assert_eq!(data["user"]["email"], "Ada@example.com");
    assert_eq!(data["user"]["firstName"], "ada");
    assert!(data["user"].get("password").is_none());
}

#[rstest]
#[case("firstName", "")]
#[case("lastName", "   ")]
#[case("email", "not-an-email")]
#[case("password", "")]
#[actix_web::test]
async fn register_names_the_first_invalid_field(#[case] field: &str, #[case] value: &str) {
    let mut payload = registration();
    payload[field] = Value::from(value);

    let (status, body) = post_json("/auth/register", payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["statusCode"], 422);
    assert_eq!(body["errors"][0]["field"], field);
}

#[rstest]
#[case("firstName")]
#[case("email")]
#[case("password")]
#[actix_web::test]
async fn register_treats_null_fields_as_missing(#[case] field: &str) {
    let mut payload = registration();
    payload[field] = Value::Null;

    let (status, body) = post_json("/auth/register", payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], field);
}

#[actix_web::test]
async fn register_accepts_blank_and_null_phone() {
    for phone in [Value::from(""), Value::Null] {
        let mut payload = registration();
        payload["phone"] = phone;

        let (status, body) = post_json("/auth/register", payload).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["user"]["phone"], Value::Null);
    }
}

#[actix_web::test]
async fn register_with_missing_fields_reports_first_name() {
    let (status, body) = post_json("/auth/register", json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "firstName");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();

    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "Bad request");
}

#[rstest]
#[case(json!({"email": "", "password": "pw"}))]
#[case(json!({"email": "ada@example.com", "password": ""}))]
#[case(json!({"email": "nobody@example.com", "password": "pw"}))]
#[case(json!({"email": null, "password": "pw"}))]
#[case(json!({"email": "ada@example.com", "password": null}))]
#[actix_web::test]
async fn login_failures_share_one_response(#[case] payload: Value) {
    let (status, body) = post_json("/auth/login", payload).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "status": "Bad request",
            "message": "Authentication failed",
            "statusCode": 401
        })
    );
}

#[actix_web::test]
async fn user_record_requires_a_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/api/users/00000000-0000-0000-0000-000000000000")
        .to_request();

    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
