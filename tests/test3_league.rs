mod common;

use rusty_clubhouse::controller::league::data_service;
use rusty_clubhouse::controller::roles::Role;
use rusty_clubhouse::error::ServiceError;
use rusty_clubhouse::model::types::{League, LeagueMatch, LeaguePlayer};

const FIXTURE: &str = r"
INSERT INTO player (id, nick, whs, role) VALUES (1, 'boss', 10.0, 'admin');
INSERT INTO player (id, nick, whs, role) VALUES (2, 'bob', 18.4, 'player');
INSERT INTO player (id, nick, whs, role) VALUES (3, 'alice', 12.1, 'player');
INSERT INTO league (id, name, status, player_id) VALUES (1, 'Club League', 1, 2);
";

fn member(league_id: i64, player_id: i64) -> LeaguePlayer {
    LeaguePlayer {
        id: None,
        league_id,
        player_id,
        nick: String::new(),
    }
}

fn league_match(league_id: i64, winner_id: i64, looser_id: i64) -> LeagueMatch {
    LeagueMatch {
        id: None,
        league_id,
        winner_id,
        looser_id,
        result: "3&2".to_string(),
    }
}

#[tokio::test]
async fn leagues_list_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league(
        &ctx.config_and_pool,
        &League {
            id: None,
            name: "Winter League".to_string(),
            status: League::STATUS_OPEN,
            player_id: 3,
        },
    )
    .await?;

    let leagues = data_service::find_all_leagues(&ctx.config_and_pool).await?;
    assert_eq!(leagues.len(), 2);
    assert_eq!(leagues[0].name, "Winter League");
    assert_eq!(leagues[1].name, "Club League");
    Ok(())
}

#[tokio::test]
async fn league_player_nick_is_copied_from_player_row()
-> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;

    let players = data_service::get_league_players(&ctx.config_and_pool, 1).await?;
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].nick, "alice");
    Ok(())
}

#[tokio::test]
async fn duplicate_league_player_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;
    let err = data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicatePlayerInLeague));
    Ok(())
}

#[tokio::test]
async fn unknown_player_cannot_join_a_league() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 99))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn only_the_owner_manages_the_roster() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    let err = data_service::add_league_player(&ctx.config_and_pool, Role::Player(3), &member(1, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    // an admin passes the owner check
    data_service::add_league_player(&ctx.config_and_pool, Role::Admin, &member(1, 3)).await?;
    Ok(())
}

#[tokio::test]
async fn match_participants_must_be_members() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 2)).await?;

    let err =
        data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 2, 3))
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::MatchPlayerNotInLeague));

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;
    data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 2, 3))
        .await?;

    let matches = data_service::get_league_matches(&ctx.config_and_pool, 1).await?;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].result, "3&2");
    Ok(())
}

#[tokio::test]
async fn duplicate_match_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 2)).await?;
    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;
    data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 2, 3))
        .await?;

    let err =
        data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 2, 3))
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateMatchInLeague));

    // the reverse pairing is a different match
    data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 3, 2))
        .await?;
    Ok(())
}

#[tokio::test]
async fn delete_match_and_close_league() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 2)).await?;
    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;
    data_service::add_league_match(&ctx.config_and_pool, Role::Player(2), &league_match(1, 2, 3))
        .await?;

    data_service::delete_league_match(&ctx.config_and_pool, Role::Player(2), 1, 2, 3).await?;
    assert!(data_service::get_league_matches(&ctx.config_and_pool, 1)
        .await?
        .is_empty());

    data_service::close_league(&ctx.config_and_pool, Role::Player(2), 1).await?;
    let league = data_service::get_league(&ctx.config_and_pool, 1).await?;
    assert_eq!(league.status, League::STATUS_CLOSE);
    Ok(())
}

#[tokio::test]
async fn delete_league_players_clears_the_roster() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::setup_test_context(FIXTURE).await?;

    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 2)).await?;
    data_service::add_league_player(&ctx.config_and_pool, Role::Player(2), &member(1, 3)).await?;

    data_service::delete_league_player(&ctx.config_and_pool, Role::Player(2), 1, 3).await?;
    let players = data_service::get_league_players(&ctx.config_and_pool, 1).await?;
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].player_id, 2);

    data_service::delete_league_players(&ctx.config_and_pool, Role::Player(2), 1).await?;
    assert!(data_service::get_league_players(&ctx.config_and_pool, 1)
        .await?
        .is_empty());
    Ok(())
}
