//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::AppState;
use api::config::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use directory::{AffiliationGroup, Person, Status};
use metrics_exporter_prometheus::PrometheusHandle;
use roster::{InMemoryPeopleProvider, ProviderError};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn roster() -> Vec<Person> {
    vec![
        Person::new("stu-2", "2", "Ron Weasley", AffiliationGroup::Gryffindor)
            .with_hometown("Ottery St Catchpole")
            .with_phone("+44 2")
            .with_contact_handle("@ron"),
        Person::new("stu-10", "10", "Luna Lovegood", AffiliationGroup::Ravenclaw)
            .with_hometown("Ottery St Catchpole")
            .with_blood_group("B+"),
        Person::new("stu-1", "1", "Hermione Granger", AffiliationGroup::Gryffindor)
            .with_hometown("Hampstead")
            .with_blood_group("A+"),
        Person::new("stu-7", "7", "Draco Malfoy", AffiliationGroup::Slytherin)
            .with_hometown("Wiltshire")
            .with_status(Status::Inactive),
    ]
}

async fn setup_with_state() -> (axum::Router, Arc<AppState>, InMemoryPeopleProvider) {
    let provider = InMemoryPeopleProvider::new(roster());
    let state = api::create_state(provider.clone(), &Config::default());
    state.store.load().await;
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state, provider)
}

async fn setup() -> axum::Router {
    setup_with_state().await.0
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (status, json) = send(setup().await, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["roster"], "ready");
}

#[tokio::test]
async fn test_health_degraded_before_load() {
    let state = api::create_state(InMemoryPeopleProvider::default(), &Config::default());
    let app = api::create_app(state, get_metrics_handle());

    let (status, json) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["roster"], "uninitialized");
}

#[tokio::test]
async fn test_list_people_sorted_by_roll() {
    let (status, json) = send(setup().await, get("/people")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&json),
        vec!["Hermione Granger", "Ron Weasley", "Draco Malfoy", "Luna Lovegood"]
    );
}

#[tokio::test]
async fn test_list_people_filter_and_sort() {
    let (status, json) = send(setup().await, get("/people?q=OTTERY&sort=name")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json), vec!["Luna Lovegood", "Ron Weasley"]);
}

#[tokio::test]
async fn test_list_people_rejects_unknown_sort() {
    let (status, json) = send(setup().await, get("/people?sort=house")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("house"));
}

#[tokio::test]
async fn test_guest_does_not_see_contact_details() {
    let (_, json) = send(setup().await, get("/people/stu-2")).await;
    assert_eq!(json["name"], "Ron Weasley");
    assert!(json.get("phone").is_none());
    assert!(json.get("contactHandle").is_none());
}

#[tokio::test]
async fn test_member_sees_contact_details() {
    let request = Request::builder()
        .uri("/people/stu-2")
        .header("x-role", "member")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(setup().await, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phone"], "+44 2");
    assert_eq!(json["contactHandle"], "@ron");
}

#[tokio::test]
async fn test_unknown_role_is_bad_request() {
    let request = Request::builder()
        .uri("/people")
        .header("x-role", "headmaster")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(setup().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_nonexistent_person() {
    let (status, _) = send(setup().await, get("/people/stu-404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary() {
    let (status, json) = send(setup().await, get("/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 4);
    assert_eq!(json["active"], 3);
    assert_eq!(json["inactive"], 1);
    assert_eq!(json["per_group"]["Gryffindor"], 2);
    assert_eq!(json["per_group"]["Hufflepuff"], 0);
}

#[tokio::test]
async fn test_directory_query_updates_store() {
    let (app, state, _) = setup_with_state().await;

    let request = Request::builder()
        .method("PUT")
        .uri("/directory/query")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "q": "g", "sort": "bloodGroup" }).to_string(),
        ))
        .unwrap();
    let (status, json) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"]["freeTextQuery"], "g");
    assert_eq!(json["query"]["sortKey"], "bloodGroup");
    assert_eq!(
        names(&json["people"]),
        vec!["Hermione Granger", "Luna Lovegood"]
    );

    assert_eq!(state.store.derived_result().len(), 2);

    let (_, json) = send(app, get("/directory")).await;
    assert_eq!(json["query"]["freeTextQuery"], "g");
    assert_eq!(json["status"]["state"], "ready");
}

#[tokio::test]
async fn test_directory_query_keeps_omitted_fields() {
    let (app, state, _) = setup_with_state().await;
    state.store.set_free_text_query("luna");

    let request = Request::builder()
        .method("PUT")
        .uri("/directory/query")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "sort": "name" }).to_string()))
        .unwrap();
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"]["freeTextQuery"], "luna");
    assert_eq!(names(&json["people"]), vec!["Luna Lovegood"]);
}

#[tokio::test]
async fn test_reload_requires_manage_roster() {
    let request = Request::builder()
        .method("POST")
        .uri("/roster/reload")
        .header("x-role", "member")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(setup().await, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reload_picks_up_new_roster() {
    let (app, _, provider) = setup_with_state().await;
    provider.set_people(vec![Person::new(
        "stu-99",
        "99",
        "Neville Longbottom",
        AffiliationGroup::Gryffindor,
    )]);

    let request = Request::builder()
        .method("POST")
        .uri("/roster/reload")
        .header("x-role", "admin")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "loaded");
    assert_eq!(json["people"], 1);

    let (_, json) = send(app, get("/people")).await;
    assert_eq!(names(&json), vec!["Neville Longbottom"]);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving_previous_roster() {
    let (app, _, provider) = setup_with_state().await;
    provider.set_fail_with(Some(ProviderError::Transport("owl post delayed".to_string())));

    let request = Request::builder()
        .method("POST")
        .uri("/roster/reload")
        .header("x-role", "moderator")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["error"]["kind"], "transport");

    let (_, json) = send(app.clone(), get("/roster/status")).await;
    assert_eq!(json["state"], "error");
    assert_eq!(json["roster_len"], 4);

    let (_, json) = send(app, get("/people")).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_signup_check() {
    let app = setup().await;

    let check = |email: &str| {
        Request::builder()
            .method("POST")
            .uri("/signup/check")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "email": email }).to_string()))
            .unwrap()
    };

    let (status, json) = send(app.clone(), check("Ginny@Hogwarts.EDU")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], "Ginny@hogwarts.edu");
    assert_eq!(json["allowed"], true);

    let (status, _) = send(app.clone(), check("viktor@durmstrang.edu")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app, check("not-an-email")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_from_config() {
    let (status, json) = send(setup().await, get("/preferences")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["theme"], "system");
    assert_eq!(json["motion"], "full");
    assert_eq!(json["layout"], "grid");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
