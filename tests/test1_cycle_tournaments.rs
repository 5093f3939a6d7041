mod common;

use rusty_clubhouse::controller::cycle::data_service;
use rusty_clubhouse::controller::roles::Role;
use rusty_clubhouse::error::ServiceError;
use rusty_clubhouse::model::types::{Cycle, CycleTournament, PlayerRoundScore};

const FIXTURE: &str = r"
INSERT INTO player (id, nick, whs, role) VALUES (1, 'boss', 10.0, 'admin');
INSERT INTO player (id, nick, whs, role) VALUES (2, 'bob', 18.4, 'player');
INSERT INTO cycle (id, name, status, player_id, best_rounds, max_whs)
    VALUES (1, 'Spring Cycle', 1, 1, 5, 54.0);
";

fn tournament(cycle_id: i64, name: &str) -> CycleTournament {
    CycleTournament {
        id: None,
        cycle_id,
        name: name.to_string(),
        rounds: 1,
        best_of: false,
    }
}

fn round(player_name: &str, r: [i32; 4]) -> PlayerRoundScore {
    PlayerRoundScore {
        player_name: player_name.to_string(),
        whs: 18.4,
        r,
    }
}

#[tokio::test]
async fn remove_last_on_empty_cycle_is_a_noop() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::remove_last_cycle_tournament(&ctx.config_and_pool, Role::Admin, 1).await?;

    let tournaments = data_service::find_cycle_tournaments(&ctx.config_and_pool, 1).await?;
    assert!(tournaments.is_empty());
    let results = data_service::find_cycle_results(&ctx.config_and_pool, 1).await?;
    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn remove_last_of_two_tournaments_rolls_results_back()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "April Open"),
        &[round("bob", [40, 0, 0, 0])],
    )
    .await?;
    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "May Open"),
        &[round("bob", [30, 0, 0, 0])],
    )
    .await?;

    data_service::remove_last_cycle_tournament(&ctx.config_and_pool, Role::Admin, 1).await?;

    let tournaments = data_service::find_cycle_tournaments(&ctx.config_and_pool, 1).await?;
    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0].name, "April Open");

    let results = data_service::find_cycle_results(&ctx.config_and_pool, 1).await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].results, vec![40, 0, 0, 0]);
    assert_eq!(results[0].cycle_score, 40);
    assert_eq!(results[0].total, 40);
    Ok(())
}

#[tokio::test]
async fn remove_last_of_only_tournament_deletes_result_rows()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "April Open"),
        &[round("bob", [40, 0, 0, 0])],
    )
    .await?;

    data_service::remove_last_cycle_tournament(&ctx.config_and_pool, Role::Admin, 1).await?;

    let tournaments = data_service::find_cycle_tournaments(&ctx.config_and_pool, 1).await?;
    assert!(tournaments.is_empty());
    let results = data_service::find_cycle_results(&ctx.config_and_pool, 1).await?;
    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn add_tournament_pads_absent_players_and_recomputes()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "April Open"),
        &[round("bob", [40, 0, 0, 0]), round("alice", [35, 1, 0, 0])],
    )
    .await?;
    // alice skips the second tournament
    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "May Open"),
        &[round("bob", [30, 0, 0, 0])],
    )
    .await?;

    let results = data_service::find_cycle_results(&ctx.config_and_pool, 1).await?;
    let alice = results
        .iter()
        .find(|r| r.player_name == "alice")
        .expect("alice has a result row");
    assert_eq!(alice.results, vec![35, 1, 0, 0, 0, 0, 0, 0]);
    assert_eq!(alice.total, 36);

    let bob = results
        .iter()
        .find(|r| r.player_name == "bob")
        .expect("bob has a result row");
    assert_eq!(bob.results, vec![40, 0, 0, 0, 30, 0, 0, 0]);
    assert_eq!(bob.total, 70);
    // best_rounds 5 covers both tournaments, so the score is the total
    assert_eq!(bob.cycle_score, 70);
    Ok(())
}

#[tokio::test]
async fn cycle_score_keeps_only_best_rounds_lowest_subtotals()
-> Result<(), Box<dyn std::error::Error>> {
    let fixture = r"
INSERT INTO player (id, nick, whs, role) VALUES (1, 'boss', 10.0, 'admin');
INSERT INTO cycle (id, name, status, player_id, best_rounds, max_whs)
    VALUES (1, 'Tight Cycle', 1, 1, 2, 54.0);
";
    let ctx = common::setup_test_context(fixture).await?;

    for (name, score) in [("T1", 40), ("T2", 30), ("T3", 35)] {
        data_service::add_cycle_tournament(
            &ctx.config_and_pool,
            Role::Admin,
            &tournament(1, name),
            &[round("bob", [score, 0, 0, 0])],
        )
        .await?;
    }

    let results = data_service::find_cycle_results(&ctx.config_and_pool, 1).await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].total, 105);
    // the two lowest subtotals are 30 and 35
    assert_eq!(results[0].cycle_score, 65);
    Ok(())
}

#[tokio::test]
async fn closed_cycle_rejects_new_tournaments() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::close_cycle(&ctx.config_and_pool, Role::Admin, 1).await?;

    let err = data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "Late Open"),
        &[round("bob", [40, 0, 0, 0])],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::CycleClosed));
    Ok(())
}

#[tokio::test]
async fn mutations_on_a_missing_cycle_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    // the cycle row is re-read inside the write transaction, so a
    // vanished cycle surfaces as NotFound rather than an orphan insert
    let err = data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(99, "Ghost Open"),
        &[round("bob", [40, 0, 0, 0])],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = data_service::remove_last_cycle_tournament(&ctx.config_and_pool, Role::Admin, 99)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = data_service::close_cycle(&ctx.config_and_pool, Role::Admin, 99)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_mutate_cycles() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::add_cycle(
        &ctx.config_and_pool,
        Role::Player(2),
        &Cycle {
            id: None,
            name: "Rogue Cycle".to_string(),
            status: Cycle::STATUS_OPEN,
            player_id: 2,
            best_rounds: 5,
            max_whs: 54.0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let err = data_service::remove_last_cycle_tournament(&ctx.config_and_pool, Role::Player(2), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn delete_cycle_removes_tournaments_and_results()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_cycle_tournament(
        &ctx.config_and_pool,
        Role::Admin,
        &tournament(1, "April Open"),
        &[round("bob", [40, 0, 0, 0])],
    )
    .await?;

    data_service::delete_cycle(&ctx.config_and_pool, Role::Admin, 1).await?;

    let err = data_service::get_cycle(&ctx.config_and_pool, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    let tournaments = data_service::find_cycle_tournaments(&ctx.config_and_pool, 1).await?;
    assert!(tournaments.is_empty());
    Ok(())
}
