//! Line protocol round trips through the service.

use serde_json::{json, Value};

use gomoku::{Arcade, EngineConfig, Service, SuggestionEngine};

fn service() -> Service {
    let engine = SuggestionEngine::with_config(EngineConfig {
        depth: 2,
        max_candidates: 8,
        radius: 2,
    });
    Service::new(Arcade::new(), engine)
}

/// Send one request, parse the response line
fn call(svc: &Service, request: Value) -> Value {
    let line = svc.handle_line(&request.to_string());
    assert!(!line.contains('\n'), "responses are single lines");
    serde_json::from_str(&line).unwrap()
}

fn post(svc: &Service, id: u64, player: u8, x: i32, y: i32) -> Value {
    call(
        svc,
        json!({"op": "post_move", "id": id, "player_id": player, "pos_x": x, "pos_y": y}),
    )
}

#[test]
fn human_match_capture_and_undo() {
    let svc = service();
    let created = call(&svc, json!({"op": "new_match"}));
    assert_eq!(created["status"], 200);
    assert_eq!(created["body"]["suggestion"], json!({"row": 9, "col": 9}));
    let id = created["body"]["id"].as_u64().unwrap();

    // Row 5: black (5,5), white (5,6),(5,7), black closes at (5,8)
    for (player, x) in [(1, 5), (2, 6)] {
        assert_eq!(post(&svc, id, player, x, 5)["status"], 200);
    }
    assert_eq!(post(&svc, id, 1, 0, 0)["status"], 200);
    assert_eq!(post(&svc, id, 2, 7, 5)["status"], 200);

    let captured = post(&svc, id, 1, 8, 5);
    assert_eq!(captured["status"], 200);
    let body = &captured["body"];
    assert_eq!(body["board"][5][6], 0);
    assert_eq!(body["board"][5][7], 0);
    assert_eq!(body["p1"]["captured"], 1);
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["history"][1]["captured"].as_array().unwrap().len(), 2);
    assert_eq!(body["current_player"], 2);

    let undone = call(&svc, json!({"op": "undo", "id": id}));
    assert_eq!(undone["status"], 200);
    assert_eq!(undone["body"]["board"][5][6], 2);
    assert_eq!(undone["body"]["board"][5][7], 2);
    assert_eq!(undone["body"]["p1"]["captured"], 0);
    assert_eq!(undone["body"]["current_player"], 1);
}

#[test]
fn win_then_match_over() {
    let svc = service();
    let id = call(&svc, json!({"op": "new_match"}))["body"]["id"]
        .as_u64()
        .unwrap();

    for c in 0..4 {
        post(&svc, id, 1, c, 10);
        post(&svc, id, 2, c * 3, 16);
    }
    let won = post(&svc, id, 1, 4, 10);
    assert_eq!(won["body"]["winner"], 1);
    assert_eq!(won["body"]["result"]["win_type"], "five_in_row");
    assert_eq!(won["body"]["current_player"], Value::Null);

    let late = post(&svc, id, 2, 18, 18);
    assert_eq!(late["status"], 400);
    assert_eq!(late["error"], "match_over");
}

#[test]
fn rejected_requests() {
    let svc = service();
    let id = call(&svc, json!({"op": "new_match"}))["body"]["id"]
        .as_u64()
        .unwrap();

    let cases = [
        (json!({"op": "get_match", "id": id + 1}), "unknown_match"),
        (json!({"op": "undo", "id": id}), "no_move_to_undo"),
        (
            json!({"op": "post_move", "id": id, "player_id": "abc", "pos_x": 1, "pos_y": 1}),
            "bad_player_id",
        ),
        (
            json!({"op": "post_move", "id": id, "player_id": 3, "pos_x": 1, "pos_y": 1}),
            "unknown_player",
        ),
        (
            json!({"op": "post_move", "id": id, "player_id": 2, "pos_x": 1, "pos_y": 1}),
            "wrong_turn",
        ),
        (
            json!({"op": "post_move", "id": id, "player_id": 1, "pos_x": -1, "pos_y": 1}),
            "out_of_bounds",
        ),
        (
            json!({"op": "post_move", "id": id, "player_id": 1}),
            "missing_coordinates",
        ),
        (json!({"op": "launch"}), "bad_request"),
    ];

    for (request, kind) in cases {
        let response = call(&svc, request);
        assert_eq!(response["status"], 400, "{kind}");
        assert_eq!(response["error"], kind);
        assert!(response["message"].is_string());
    }

    // Nothing above changed the match
    let view = call(&svc, json!({"op": "get_match", "id": id}));
    assert_eq!(view["body"]["history"].as_array().unwrap().len(), 0);
}

#[test]
fn engine_opponent_plays_a_short_game() {
    let svc = service();
    let created = call(&svc, json!({"op": "new_match", "player2_ai": true}));
    let id = created["body"]["id"].as_u64().unwrap();

    // Far-apart corners, out of reach of the engine's neighbourhood
    for (x, y) in [(0, 0), (18, 0), (0, 18), (18, 18)] {
        let response = post(&svc, id, 1, x, y);
        assert_eq!(response["status"], 200);
        let body = &response["body"];

        // Human moved, engine answered
        assert_eq!(body["current_player"], 1);
        assert_eq!(body["history"][1]["player"], 2);
        let suggestion = &body["suggestion"];
        let (row, col) = (
            suggestion["row"].as_u64().unwrap() as usize,
            suggestion["col"].as_u64().unwrap() as usize,
        );
        assert_eq!(body["board"][row][col], 0, "suggestion must be empty");
    }
}

#[test]
fn engine_match_opens_at_center_and_delete() {
    let svc = service();
    let created = call(&svc, json!({"op": "new_match", "player1_ai": true, "player2_ai": false}));
    let body = &created["body"];
    assert_eq!(body["board"][9][9], 1);
    assert_eq!(body["p1"]["control"], "engine");
    assert_eq!(body["current_player"], 2);

    let id = body["id"].as_u64().unwrap();
    let deleted = call(&svc, json!({"op": "delete_match", "id": id}));
    assert_eq!(deleted["body"]["deleted"], id);
    assert_eq!(
        call(&svc, json!({"op": "get_match", "id": id}))["error"],
        "unknown_match"
    );
}
