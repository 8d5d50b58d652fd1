//! HTTP-level tests for racquet labels and QR payloads.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_job, create_player, create_racquet, create_string_type, get_auth,
    patch_json_auth, post_json_auth, seed_pending_job, stringer_token, user_token,
};
use serde_json::{json, Value};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn full_label_includes_every_section(pool: PgPool) {
    let app = common::build_test_app(pool);
    let player_id = create_player(&app, "Rafael", "Nadal").await;
    let racquet_id = create_racquet(&app, player_id).await;
    let main_id = create_string_type(&app, "Babolat", "RPM Blast").await;
    let cross_id = create_string_type(&app, "Babolat", "VS Touch").await;
    let job = create_job(
        &app,
        json!({
            "playerId": player_id,
            "racquetId": racquet_id,
            "mainStringId": main_id,
            "crossStringId": cross_id,
            "mainTension": 25,
            "crossTension": 24,
            "logo": "Babolat"
        }),
    )
    .await;
    let job_id = job["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        "/api/labels",
        json!({ "jobId": job_id, "labelSize": "large" }),
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let label = body_json(response).await;

    assert_eq!(label["jobId"], job_id);
    assert_eq!(label["labelSize"], "large");
    assert_eq!(label["playerLastName"], "Nadal");
    assert_eq!(label["racquetModel"], "Pure Aero");
    assert_eq!(label["stringModel"], "RPM Blast");
    assert_eq!(label["crossStringModel"], "VS Touch");
    assert_eq!(label["tensionText"], "25/24 kg");
    assert_eq!(label["dateCompleted"], "2024-06-10");
    assert_eq!(label["logo"], "Babolat");

    let qr: Value = serde_json::from_str(label["qrCodeData"].as_str().unwrap()).unwrap();
    assert_eq!(qr["id"], job_id);
    assert_eq!(qr["player"], "Rafael Nadal");
    assert_eq!(qr["crossString"], "Babolat VS Touch");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn excluded_sections_are_null(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, _, job_id) = seed_pending_job(&app).await;

    let response = post_json_auth(
        app,
        "/api/labels",
        json!({
            "jobId": job_id,
            "includePlayerInfo": false,
            "includeTensionInfo": false,
            "generateQrCode": false
        }),
        &user_token(),
    )
    .await;
    let label = body_json(response).await;

    assert!(label["playerName"].is_null());
    assert!(label["mainTension"].is_null());
    assert!(label["tensionText"].is_null());
    assert!(label["qrCodeData"].is_null());
    assert_eq!(label["labelSize"], "medium");
    assert_eq!(label["racquetBrand"], "Babolat");
    assert_eq!(label["stringBrand"], "Unknown");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn label_date_switches_to_completion(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, _, job_id) = seed_pending_job(&app).await;
    patch_json_auth(
        app.clone(),
        &format!("/api/string-jobs/{job_id}/complete"),
        json!({ "completedAt": "2024-06-12T08:30:00Z" }),
        &stringer_token(),
    )
    .await;

    let response = get_auth(app, &format!("/api/labels/{job_id}/qrcode"), &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["jobId"], job_id);

    let qr: Value = serde_json::from_str(body["qrCodeData"].as_str().unwrap()).unwrap();
    assert_eq!(qr["date"], "2024-06-12");
    assert_eq!(qr["tension"], "24 kg");
    assert_eq!(qr["racquet"], "Babolat Pure Aero");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn label_for_missing_job_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/labels",
        json!({ "jobId": 999999 }),
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/labels/999999/qrcode", &user_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
