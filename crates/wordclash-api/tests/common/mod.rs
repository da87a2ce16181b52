//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wordclash_core::clock::Clock;
use wordclash_core::rng::DeterministicRng;
use wordclash_core::validator::WordValidator;
use wordclash_session::domain::aggregates::Session;
use wordclash_session::domain::settings::{GameVariant, SessionSettings};
use wordclash_store::memory_session_repository::InMemorySessionRepository;
use wordclash_test_support::{FixedClock, MockRng, StubValidator};

use wordclash_api::broadcast::ChannelBroadcaster;
use wordclash_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Single-word rules with a budget of six guesses.
pub fn single_word() -> GameVariant {
    GameVariant::SingleWord { guess_budget: 6 }
}

/// Multi-word rules with two words each.
pub fn two_words() -> GameVariant {
    GameVariant::MultiWord {
        word_count: 2,
        turn_limit: 20,
    }
}

/// Build application state with an in-memory store, an accepting dictionary
/// and deterministic Clock/RNG.
pub fn build_test_state(variant: GameVariant) -> AppState {
    build_test_state_with_validator(variant, Arc::new(StubValidator::accepting()))
}

/// Same as [`build_test_state`] with a custom dictionary.
pub fn build_test_state_with_validator(
    variant: GameVariant,
    validator: Arc<dyn WordValidator>,
) -> AppState {
    let settings =
        SessionSettings::new(["Ashima".to_owned(), "Anjali".to_owned()], variant).unwrap();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    AppState::new(
        settings,
        fixed_clock(),
        rng,
        Arc::new(InMemorySessionRepository::<Session>::new()),
        validator,
        ChannelBroadcaster::default(),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    wordclash_api::build_router(state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Join as `name` and return the issued connection id.
pub async fn join(state: &AppState, name: &str) -> String {
    let (status, json) = post_json(
        build_test_app(state.clone()),
        "/api/v1/session/join",
        &serde_json::json!({ "player_name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["connection_id"].as_str().unwrap().to_owned()
}

/// Submit `words` for `connection_id`.
pub async fn submit(
    state: &AppState,
    connection_id: &str,
    words: &[&str],
) -> (StatusCode, serde_json::Value) {
    post_json(
        build_test_app(state.clone()),
        "/api/v1/session/submit-words",
        &serde_json::json!({ "connection_id": connection_id, "words": words }),
    )
    .await
}

/// Guess `letter` for `connection_id`.
pub async fn guess_letter(
    state: &AppState,
    connection_id: &str,
    letter: &str,
) -> (StatusCode, serde_json::Value) {
    post_json(
        build_test_app(state.clone()),
        "/api/v1/session/guess-letter",
        &serde_json::json!({ "connection_id": connection_id, "letter": letter }),
    )
    .await
}

/// Fetch the snapshot.
pub async fn snapshot(state: &AppState) -> serde_json::Value {
    let (status, json) = get_json(build_test_app(state.clone()), "/api/v1/session").await;
    assert_eq!(status, StatusCode::OK);
    json["session"].clone()
}
