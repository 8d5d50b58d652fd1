//! Integration tests for the catalog repositories: round trips, version
//! checks, dependency counts and the current-tournament lookup.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;
use stringdesk_core::error::CoreError;
use stringdesk_db::models::player::CreatePlayer;
use stringdesk_db::models::racquet::{CreateRacquet, UpdateRacquet};
use stringdesk_db::models::string_type::CreateStringType;
use stringdesk_db::models::tournament::CreateTournament;
use stringdesk_db::repositories::{PlayerRepo, RacquetRepo, StringTypeRepo, TournamentRepo};
use stringdesk_db::versioned::{self, Versioned};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_player(name: &str, last_name: &str) -> CreatePlayer {
    CreatePlayer {
        name: name.to_string(),
        last_name: last_name.to_string(),
        country_code: None,
    }
}

fn new_racquet(player_id: i64, brand: &str) -> CreateRacquet {
    CreateRacquet {
        player_id,
        brand: brand.to_string(),
        model: "Pure Aero".to_string(),
        serial_number: None,
        head_size: Some(100.0),
        notes: None,
    }
}

fn new_tournament(name: &str, start: NaiveDate, end: NaiveDate) -> CreateTournament {
    CreateTournament {
        name: name.to_string(),
        start_date: start,
        end_date: end,
        location: None,
        category: None,
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_player_round_trip(pool: PgPool) {
    let created = PlayerRepo::create(&pool, &new_player("Rafael", "Nadal"))
        .await
        .unwrap();
    assert_eq!(created.version, 1);

    let first = PlayerRepo::find_by_id(&pool, created.id).await.unwrap();
    let second = PlayerRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(first, Some(created.clone()));
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_bumps_version_and_rejects_stale_writes(pool: PgPool) {
    let player = PlayerRepo::create(&pool, &new_player("Roger", "Federer"))
        .await
        .unwrap();

    let mut edit = new_player("Roger", "Federer");
    edit.country_code = Some("SUI".into());
    let updated = PlayerRepo::update(&pool, player.id, player.version, &edit)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.version, player.version + 1);
    assert_eq!(updated.country_code.as_deref(), Some("SUI"));

    // Second writer still holds the old version.
    let stale = PlayerRepo::update(&pool, player.id, player.version, &edit)
        .await
        .unwrap();
    assert!(stale.is_none());
    let outcome = versioned::resolve(&pool, PlayerRepo::TABLE, player.id, stale)
        .await
        .unwrap();
    assert_eq!(outcome, Versioned::Stale);
    assert_matches!(
        outcome.into_core("Player", player.id),
        Err(CoreError::Conflict(_))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_of_missing_row_resolves_to_missing(pool: PgPool) {
    let outcome = PlayerRepo::update(&pool, 999, 1, &new_player("A", "B"))
        .await
        .unwrap();
    let resolved = versioned::resolve(&pool, PlayerRepo::TABLE, 999, outcome)
        .await
        .unwrap();
    assert_eq!(resolved, Versioned::Missing);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_player_dependency_counts(pool: PgPool) {
    let player = PlayerRepo::create(&pool, &new_player("Iga", "Swiatek"))
        .await
        .unwrap();
    assert_eq!(PlayerRepo::count_racquets(&pool, player.id).await.unwrap(), 0);

    RacquetRepo::create(&pool, &new_racquet(player.id, "Tecnifibre"))
        .await
        .unwrap();
    assert_eq!(PlayerRepo::count_racquets(&pool, player.id).await.unwrap(), 1);
    assert_eq!(PlayerRepo::count_jobs(&pool, player.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_player_with_racquet_cannot_be_deleted_at_db_level(pool: PgPool) {
    let player = PlayerRepo::create(&pool, &new_player("Coco", "Gauff"))
        .await
        .unwrap();
    RacquetRepo::create(&pool, &new_racquet(player.id, "Head"))
        .await
        .unwrap();

    let err = PlayerRepo::delete(&pool, player.id).await.unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.constraint(), Some("fk_racquets_player"));
}

// ---------------------------------------------------------------------------
// Racquets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_racquet_list_filters_by_player(pool: PgPool) {
    let a = PlayerRepo::create(&pool, &new_player("A", "One")).await.unwrap();
    let b = PlayerRepo::create(&pool, &new_player("B", "Two")).await.unwrap();
    RacquetRepo::create(&pool, &new_racquet(a.id, "Babolat")).await.unwrap();
    RacquetRepo::create(&pool, &new_racquet(b.id, "Wilson")).await.unwrap();
    RacquetRepo::create(&pool, &new_racquet(b.id, "Yonex")).await.unwrap();

    assert_eq!(RacquetRepo::list(&pool, None).await.unwrap().len(), 3);
    let of_b = RacquetRepo::list(&pool, Some(b.id)).await.unwrap();
    assert_eq!(of_b.len(), 2);
    assert!(of_b.iter().all(|r| r.racquet.player_id == b.id));
    assert!(of_b
        .iter()
        .all(|r| r.player.as_ref().map(|p| p.last_name.as_str()) == Some("Two")));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_racquet_update_keeps_owner(pool: PgPool) {
    let owner = PlayerRepo::create(&pool, &new_player("A", "One")).await.unwrap();
    let racquet = RacquetRepo::create(&pool, &new_racquet(owner.id, "Babolat"))
        .await
        .unwrap();

    let updated = RacquetRepo::update(
        &pool,
        racquet.id,
        racquet.version,
        &UpdateRacquet {
            brand: "Head".to_string(),
            model: "Speed MP".to_string(),
            serial_number: None,
            head_size: Some(100.0),
            notes: None,
        },
    )
    .await
    .unwrap()
    .expect("version matched");

    assert_eq!(updated.player_id, owner.id);
    assert_eq!(updated.brand, "Head");
    assert_eq!(updated.version, racquet.version + 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_racquet_requires_existing_player(pool: PgPool) {
    let err = RacquetRepo::create(&pool, &new_racquet(424242, "Head"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("fk_racquets_player")
    );
}

// ---------------------------------------------------------------------------
// String types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_string_type_delete_without_jobs(pool: PgPool) {
    let string = StringTypeRepo::create(
        &pool,
        &CreateStringType {
            brand: "Luxilon".into(),
            model: "ALU Power".into(),
            gauge: Some("1.25".into()),
            material: Some("Polyester".into()),
            color: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(StringTypeRepo::count_jobs(&pool, string.id).await.unwrap(), 0);
    assert!(StringTypeRepo::delete(&pool, string.id).await.unwrap());
    assert!(!StringTypeRepo::exists(&pool, string.id).await.unwrap());
    assert!(!StringTypeRepo::delete(&pool, string.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_tournament_end_before_start_rejected_by_schema(pool: PgPool) {
    let err = TournamentRepo::create(
        &pool,
        &new_tournament("Backwards", d(2024, 6, 1), d(2024, 5, 1)),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("ck_tournaments_date_range")
    );
    assert!(TournamentRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_active_tournament_earliest_start_wins(pool: PgPool) {
    let later = TournamentRepo::create(
        &pool,
        &new_tournament("Later", d(2024, 6, 3), d(2024, 6, 10)),
    )
    .await
    .unwrap();
    let earlier = TournamentRepo::create(
        &pool,
        &new_tournament("Earlier", d(2024, 6, 1), d(2024, 6, 5)),
    )
    .await
    .unwrap();

    let on_4th = TournamentRepo::find_active_on(&pool, d(2024, 6, 4))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(on_4th.id, earlier.id);

    let on_8th = TournamentRepo::find_active_on(&pool, d(2024, 6, 8))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(on_8th.id, later.id);

    // Both bounds inclusive.
    assert!(TournamentRepo::find_active_on(&pool, d(2024, 6, 10))
        .await
        .unwrap()
        .is_some());
    assert!(TournamentRepo::find_active_on(&pool, d(2024, 6, 11))
        .await
        .unwrap()
        .is_none());
}
