//! HTTP-level tests for players, racquets, string types, stringers and
//! tournaments: CRUD, validation, deletion guards and role gates.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, create_player, create_racquet, create_string_type, create_stringer,
    create_tournament, delete_auth, get, get_auth, post_json_auth, put_json_auth,
    seed_pending_job, stringer_token, user_token,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn player_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = stringer_token();

    let response = post_json_auth(
        app.clone(),
        "/api/players",
        json!({ "name": "  Rafael ", "lastName": "Nadal", "countryCode": "ESP" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Rafael");
    assert!(created.get("version").is_none(), "version is not exposed");

    let response = get_auth(app.clone(), &format!("/api/players/{id}"), &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/players/{id}"),
        json!({ "name": "Rafa", "lastName": "Nadal" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Rafa");
    assert!(updated["countryCode"].is_null(), "update is a full overwrite");

    let response = delete_auth(app.clone(), &format!("/api/players/{id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/players/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_player_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/players",
        json!({ "name": "   ", "lastName": "Nadal" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_of_missing_player_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/players/999999",
        json!({ "name": "A", "lastName": "B" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn player_with_racquet_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Roger", "Federer").await;
    create_racquet(&app, player_id).await;

    let response =
        delete_auth(app.clone(), &format!("/api/players/{player_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GUARD_VIOLATION");
    assert!(json["error"].as_str().unwrap().contains("racquet"));

    let response = get_auth(app, &format!("/api/players/{player_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Racquets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn racquet_for_unknown_player_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/racquets",
        json!({ "playerId": 424242, "brand": "Wilson", "model": "Pro Staff" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn racquet_is_returned_with_its_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Iga", "Swiatek").await;
    let racquet_id = create_racquet(&app, player_id).await;

    let response = get_auth(app, &format!("/api/racquets/{racquet_id}"), &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["playerId"], player_id);
    assert_eq!(json["player"]["lastName"], "Swiatek");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn racquets_can_be_listed_per_player(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = create_player(&app, "Coco", "Gauff").await;
    let second = create_player(&app, "Jannik", "Sinner").await;
    create_racquet(&app, first).await;
    create_racquet(&app, first).await;
    create_racquet(&app, second).await;

    let response = get_auth(app.clone(), "/api/racquets", &user_token()).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    let response = get_auth(
        app.clone(),
        &format!("/api/racquets?playerId={first}"),
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|r| r["player"]["id"] == first));

    let response = get_auth(app, "/api/racquets?playerId=999999", &user_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn racquet_used_by_a_job_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_player_id, racquet_id, _job_id) = seed_pending_job(&app).await;

    let response =
        delete_auth(app, &format!("/api/racquets/{racquet_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "GUARD_VIOLATION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn racquet_owner_cannot_be_changed_by_update(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (player_id, racquet_id, job_id) = seed_pending_job(&app).await;
    let other_id = create_player(&app, "Roger", "Federer").await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/racquets/{racquet_id}"),
        json!({ "playerId": other_id, "brand": " Head ", "model": "Speed MP" }),
        &stringer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["playerId"], player_id);
    assert_eq!(json["player"]["id"], player_id);
    assert_eq!(json["brand"], "Head");

    let response = get_auth(app.clone(), &format!("/api/racquets/{racquet_id}"), &user_token()).await;
    assert_eq!(body_json(response).await["playerId"], player_id);

    let response = get_auth(app, &format!("/api/string-jobs/{job_id}"), &user_token()).await;
    let job = body_json(response).await;
    assert_eq!(job["racquet"]["brand"], "Head");
    assert_eq!(job["racquet"]["playerId"], job["playerId"]);
}

// ---------------------------------------------------------------------------
// String types and stringers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unused_string_type_can_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_string_type(&app, "Luxilon", "ALU Power").await;

    let response = delete_auth(app.clone(), &format!("/api/string-types/{id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &format!("/api/string-types/{id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn string_type_used_as_cross_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Andy", "Murray").await;
    let racquet_id = create_racquet(&app, player_id).await;
    let cross_id = create_string_type(&app, "Babolat", "VS Touch").await;
    common::create_job(
        &app,
        json!({
            "playerId": player_id,
            "racquetId": racquet_id,
            "crossStringId": cross_id,
            "mainTension": 25.0
        }),
    )
    .await;

    let response = delete_auth(app, &format!("/api/string-types/{cross_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stringer_with_jobs_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Novak", "Djokovic").await;
    let racquet_id = create_racquet(&app, player_id).await;
    let stringer_id = create_stringer(&app, "Ron").await;
    common::create_job(
        &app,
        json!({
            "playerId": player_id,
            "racquetId": racquet_id,
            "stringerId": stringer_id,
            "mainTension": 26.0
        }),
    )
    .await;

    let response =
        delete_auth(app, &format!("/api/stringers/{stringer_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "GUARD_VIOLATION");
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn tournament_with_end_before_start_is_rejected_and_not_stored(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app.clone(),
        "/api/tournaments",
        json!({ "name": "Backwards Open", "startDate": "2024-06-01", "endDate": "2024-05-01" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = get_auth(app, "/api/tournaments", &admin_token()).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tournament_update_rechecks_date_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_tournament(&app, "Queen's", "2024-06-17", "2024-06-23").await;

    let response = put_json_auth(
        app,
        &format!("/api/tournaments/{id}"),
        json!({ "name": "Queen's", "startDate": "2024-06-23", "endDate": "2024-06-17" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tournament_with_jobs_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let tournament_id = create_tournament(&app, "Roland Garros", "2024-05-26", "2024-06-09").await;
    let player_id = create_player(&app, "Iga", "Swiatek").await;
    let racquet_id = create_racquet(&app, player_id).await;
    let job = common::create_job(
        &app,
        json!({
            "playerId": player_id,
            "racquetId": racquet_id,
            "tournamentId": tournament_id,
            "mainTension": 23.5
        }),
    )
    .await;
    assert_eq!(job["tournamentId"], tournament_id);
    let job_id = job["id"].as_i64().unwrap();

    let response = delete_auth(
        app.clone(),
        &format!("/api/tournaments/{tournament_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "GUARD_VIOLATION");

    let response = delete_auth(app.clone(), &format!("/api/string-jobs/{job_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        app.clone(),
        &format!("/api/tournaments/{tournament_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/tournaments/{tournament_id}"), &user_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn current_tournament_follows_the_clock(pool: PgPool) {
    // The test clock is pinned to 2024-06-10.
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/tournaments/current", &user_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    create_tournament(&app, "Past Cup", "2024-05-01", "2024-05-07").await;
    let later = create_tournament(&app, "Late Start", "2024-06-09", "2024-06-16").await;
    let earlier = create_tournament(&app, "Early Start", "2024-06-03", "2024-06-10").await;

    let response = get_auth(app, "/api/tournaments/current", &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], earlier, "earliest start wins when tournaments overlap");
    assert_ne!(json["id"], later);
    assert_eq!(json["startDate"], "2024-06-03");
}

// ---------------------------------------------------------------------------
// Role gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn reads_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/players").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/players", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn plain_users_cannot_write_catalog_entries(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/players",
        json!({ "name": "A", "lastName": "B" }),
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stringers_cannot_manage_tournaments_or_stringers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/tournaments",
        json!({ "name": "Open", "startDate": "2024-01-01", "endDate": "2024-01-07" }),
        &stringer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        "/api/stringers",
        json!({ "name": "New", "lastName": "Hire" }),
        &stringer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_admins_delete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Stan", "Wawrinka").await;

    let response =
        delete_auth(app.clone(), &format!("/api/players/{player_id}"), &stringer_token()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app, &format!("/api/players/{player_id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
