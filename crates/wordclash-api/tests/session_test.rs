//! Integration tests for the Session bounded context.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use wordclash_test_support::StubValidator;

#[tokio::test]
async fn test_full_single_word_game_ends_in_tie() {
    let state = common::build_test_state(common::single_word());

    // Seat both players.
    let a = common::join(&state, "Ashima").await;
    let b = common::join(&state, "Anjali").await;
    assert_eq!(common::snapshot(&state).await["phase"], "setup");

    // Submit secret words; A's word is guessed by B and vice versa.
    assert_eq!(common::submit(&state, &a, &["dog"]).await.0, StatusCode::OK);
    assert_eq!(common::submit(&state, &b, &["cat"]).await.0, StatusCode::OK);
    let session = common::snapshot(&state).await;
    assert_eq!(session["phase"], "playing");
    assert_eq!(session["current_turn"], "A");

    // A reveals "cat" while B is one letter short of "dog".
    for (who, letter) in [(&a, "c"), (&b, "d"), (&a, "a"), (&b, "o"), (&a, "t")] {
        let (status, _) = common::guess_letter(&state, who, letter).await;
        assert_eq!(status, StatusCode::OK);
    }
    let session = common::snapshot(&state).await;
    assert_eq!(session["phase"], "playing");
    assert_eq!(session["tie_break"]["state"], "awaiting_tie");
    assert_eq!(session["current_turn"], "B");

    // B's bonus turn completes "dog".
    let (status, _) = common::guess_letter(&state, &b, "g").await;
    assert_eq!(status, StatusCode::OK);

    let session = common::snapshot(&state).await;
    assert_eq!(session["phase"], "finished");
    assert_eq!(session["result"]["kind"], "tie");
    assert_eq!(session["participants"][0]["outcome"], "won");
    assert_eq!(session["participants"][1]["outcome"], "won");
}

#[tokio::test]
async fn test_multi_word_scoring_round_trip() {
    let state = common::build_test_state(common::two_words());
    let a = common::join(&state, "Ashima").await;
    let b = common::join(&state, "Anjali").await;
    common::submit(&state, &a, &["dog", "owl"]).await;
    common::submit(&state, &b, &["cat", "emu"]).await;

    for (who, letter) in [(&a, "c"), (&b, "z"), (&a, "a"), (&b, "q"), (&a, "t")] {
        common::guess_letter(&state, who, letter).await;
    }

    let session = common::snapshot(&state).await;
    let solver = &session["participants"][0];
    assert_eq!(solver["score"], 10);
    assert_eq!(solver["guessed_letters"].as_array().unwrap().len(), 0);
    let owner = &session["participants"][1];
    assert_eq!(owner["remaining_words"], serde_json::json!(["emu"]));
    assert_eq!(owner["active_word"], "emu");
}

#[tokio::test]
async fn test_out_of_turn_guess_returns_409() {
    let state = common::build_test_state(common::single_word());
    let a = common::join(&state, "Ashima").await;
    let b = common::join(&state, "Anjali").await;
    common::submit(&state, &a, &["dog"]).await;
    common::submit(&state, &b, &["cat"]).await;

    let (status, json) = common::guess_letter(&state, &b, "a").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "turn_violation");
}

#[tokio::test]
async fn test_repeated_letter_returns_400() {
    let state = common::build_test_state(common::two_words());
    let a = common::join(&state, "Ashima").await;
    let b = common::join(&state, "Anjali").await;
    common::submit(&state, &a, &["dog", "owl"]).await;
    common::submit(&state, &b, &["cat", "emu"]).await;
    common::guess_letter(&state, &a, "x").await;
    common::guess_letter(&state, &b, "x").await;

    let (status, json) = common::guess_letter(&state, &a, "x").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "input_validation");
}

#[tokio::test]
async fn test_dictionary_rejection_returns_422() {
    let state = common::build_test_state_with_validator(
        common::single_word(),
        Arc::new(StubValidator::rejecting(&["zzxq"])),
    );
    let a = common::join(&state, "Ashima").await;
    common::join(&state, "Anjali").await;

    let (status, json) = common::submit(&state, &a, &["zzxq"]).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "word_rejected");
    let session = common::snapshot(&state).await;
    assert_eq!(session["participants"][0]["words"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unreachable_dictionary_accepts_word() {
    let state = common::build_test_state_with_validator(
        common::single_word(),
        Arc::new(StubValidator::unreachable()),
    );
    let a = common::join(&state, "Ashima").await;
    common::join(&state, "Anjali").await;

    let (status, _) = common::submit(&state, &a, &["xyzzytest"]).await;

    assert_eq!(status, StatusCode::OK);
    let session = common::snapshot(&state).await;
    assert_eq!(session["participants"][0]["words"], serde_json::json!(["xyzzytest"]));
}

#[tokio::test]
async fn test_reset_discards_session() {
    let state = common::build_test_state(common::single_word());
    let a = common::join(&state, "Ashima").await;

    let (status, _) = common::post_json(
        common::build_test_app(state.clone()),
        "/api/v1/session/reset",
        &serde_json::json!({ "connection_id": a }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(common::snapshot(&state).await.is_null());
}

#[tokio::test]
async fn test_disconnect_discards_session_and_allows_new_game() {
    let state = common::build_test_state(common::single_word());
    common::join(&state, "Ashima").await;
    let b = common::join(&state, "Anjali").await;

    let (status, json) = common::post_json(
        common::build_test_app(state.clone()),
        "/api/v1/session/disconnect",
        &serde_json::json!({ "connection_id": b }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["left"], true);
    assert!(common::snapshot(&state).await.is_null());

    common::join(&state, "Anjali").await;
    let session = common::snapshot(&state).await;
    assert_eq!(session["phase"], "waiting");
    assert_eq!(session["participants"][0]["name"], "Anjali");
}
