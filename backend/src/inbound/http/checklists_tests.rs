//! Handler tests for the checklist routes.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Role;
use crate::inbound::http::test_utils::{TestHarness, login_and_get_cookie};

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

fn opening_payload() -> Value {
    json!({
        "date": "2024-05-01",
        "name": "Alex",
        "openingChecks": [{ "label": "fridges ok", "yes": true }]
    })
}

struct Kitchen {
    harness: TestHarness,
}

impl Kitchen {
    async fn staffed() -> Self {
        let harness = TestHarness::new();
        harness.seed_account(Role::Editor, "eddie@example.com").await;
        harness.seed_account(Role::Editor, "erin@example.com").await;
        harness.seed_account(Role::Viewer, "val@example.com").await;
        Self { harness }
    }
}

#[actix_web::test]
async fn editor_creates_a_checklist() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let cookie = login_and_get_cookie(&app, "eddie@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(cookie.clone())
            .set_json(opening_payload())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["message"], json!("Created"));
    assert_eq!(body["checklist"]["date"], json!("2024-05-01"));
    assert_eq!(body["checklist"]["openingChecks"][0]["yes"], json!(true));

    let me = read_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(body["checklist"]["author"], me["id"]);
}

#[actix_web::test]
async fn second_create_for_a_date_conflicts_with_the_first() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    let erin = login_and_get_cookie(&app, "erin@example.com").await;

    let first = read_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/checklist")
                .cookie(eddie)
                .set_json(opening_payload())
                .to_request(),
        )
        .await,
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(erin)
            .set_json(json!({ "date": "2024-05-01", "name": "Erin" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("conflict"));
    assert_eq!(body["details"]["existingId"], first["checklist"]["id"]);
    assert_eq!(body["details"]["checklist"]["name"], json!("Alex"));
}

#[actix_web::test]
async fn viewers_read_but_cannot_write() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    let val = login_and_get_cookie(&app, "val@example.com").await;
    actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(eddie)
            .set_json(opening_payload())
            .to_request(),
    )
    .await;

    let denied = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(val.clone())
            .set_json(json!({ "date": "2024-05-02", "name": "Val" }))
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let list = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist")
            .cookie(val.clone())
            .to_request(),
    )
    .await;
    assert_eq!(list.status(), StatusCode::OK);
    assert_eq!(read_json(list).await.as_array().map(Vec::len), Some(1));

    let by_date = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist/2024-05-01")
            .cookie(val)
            .to_request(),
    )
    .await;
    assert_eq!(by_date.status(), StatusCode::OK);
}

#[actix_web::test]
async fn list_is_newest_date_first() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    for date in ["2024-05-01", "2024-05-03", "2024-05-02"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/checklist")
                .cookie(eddie.clone())
                .set_json(json!({ "date": date, "name": "Eddie" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist")
            .cookie(eddie)
            .to_request(),
    )
    .await;

    let body = read_json(res).await;
    let dates: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|record| record["date"].as_str())
        .collect();
    assert_eq!(dates, ["2024-05-03", "2024-05-02", "2024-05-01"]);
}

#[rstest]
#[case("2099-01-01", StatusCode::NOT_FOUND)]
#[case("2024-13-01", StatusCode::BAD_REQUEST)]
#[case("01-05-2024", StatusCode::BAD_REQUEST)]
#[actix_rt::test]
async fn get_by_date_distinguishes_missing_from_malformed(
    #[case] date: &str,
    #[case] status: StatusCode,
) {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let val = login_and_get_cookie(&app, "val@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/checklist/{date}"))
            .cookie(val)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
}

#[actix_web::test]
async fn empty_sections_are_returned_as_empty_arrays() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(eddie.clone())
            .set_json(json!({ "date": "2024-05-04", "name": "Eddie" }))
            .to_request(),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist/2024-05-04")
            .cookie(eddie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["dishwasherChecks"], json!([]));
    assert_eq!(body["incidentReport"], json!([]));
}

#[actix_web::test]
async fn update_merges_and_keeps_identity() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    let created = read_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/checklist")
                .cookie(eddie.clone())
                .set_json(opening_payload())
                .to_request(),
        )
        .await,
    )
    .await;
    let original = created["checklist"].clone();
    kitchen.harness.clock.advance_minutes(90);

    let mut resubmitted = original.clone();
    resubmitted["closingComment"] = json!("all clean");
    resubmitted["author"] = json!("3fa85f64-5717-4562-b3fc-2c963f66afa6");
    resubmitted["createdAt"] = json!("1999-01-01T00:00:00Z");
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/api/v1/checklist/{}",
                original["id"].as_str().expect("id")
            ))
            .cookie(eddie)
            .set_json(resubmitted)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["message"], json!("Updated"));
    let updated = &body["checklist"];
    assert_eq!(updated["id"], original["id"]);
    assert_eq!(updated["author"], original["author"]);
    assert_eq!(updated["createdAt"], original["createdAt"]);
    assert_ne!(updated["updatedAt"], original["updatedAt"]);
    assert_eq!(updated["closingComment"], json!("all clean"));
    assert_eq!(updated["openingChecks"], original["openingChecks"]);
}

#[actix_web::test]
async fn non_owner_cannot_delete_and_record_survives() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;
    let erin = login_and_get_cookie(&app, "erin@example.com").await;
    let created = read_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/checklist")
                .cookie(eddie.clone())
                .set_json(opening_payload())
                .to_request(),
        )
        .await,
    )
    .await;
    let uri = format!(
        "/api/v1/checklist/{}",
        created["checklist"]["id"].as_str().expect("id")
    );

    let denied = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .cookie(erin)
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json(denied).await["message"],
        json!("Checklist not found or not authorized")
    );

    let still_there = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist/2024-05-01")
            .cookie(eddie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(still_there.status(), StatusCode::OK);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .cookie(eddie)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(
        read_json(deleted).await,
        json!({ "message": "Deleted successfully!" })
    );
}

#[rstest]
#[case(json!({ "date": "2024-05-01", "name": "Alex", "dishwasherChecks": [{ "period": "Morning" }] }), "dishwasherChecks[0].period")]
#[case(json!({ "name": "Alex" }), "date")]
#[case(json!({ "date": "2024-05-01", "name": "  " }), "name")]
#[actix_rt::test]
async fn invalid_payloads_are_rejected_without_storing(#[case] payload: Value, #[case] field: &str) {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(eddie.clone())
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["details"]["field"], json!(field));

    let list = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/checklist")
            .cookie(eddie)
            .to_request(),
    )
    .await;
    assert_eq!(read_json(list).await, json!([]));
}

#[actix_web::test]
async fn unknown_keys_are_rejected() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/checklist")
            .cookie(eddie)
            .set_json(json!({ "date": "2024-05-01", "name": "Alex", "temperatureLog": [] }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}

#[actix_web::test]
async fn malformed_checklist_id_is_a_bad_request() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let eddie = login_and_get_cookie(&app, "eddie@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/checklist/42")
            .cookie(eddie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["details"]["field"], json!("id"));
}

#[rstest]
#[case::delete_malformed_id(actix_test::TestRequest::delete().uri("/api/v1/checklist/42"))]
#[case::update_malformed_id(
    actix_test::TestRequest::put()
        .uri("/api/v1/checklist/42")
        .set_json(json!({ "name": "Val" }))
)]
#[actix_rt::test]
async fn viewers_are_refused_before_the_id_is_checked(#[case] request: actix_test::TestRequest) {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;
    let val = login_and_get_cookie(&app, "val@example.com").await;

    let res = actix_test::call_service(&app, request.cookie(val).to_request()).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = read_json(res).await;
    assert_eq!(body["details"]["requiredRoles"], json!(["admin", "editor"]));
    assert_eq!(body["details"]["userRole"], json!("viewer"));
}

#[actix_web::test]
async fn anonymous_callers_cannot_list() {
    let kitchen = Kitchen::staffed().await;
    let app = actix_test::init_service(kitchen.harness.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/checklist").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(res).await["message"], json!("Not authenticated"));
}
