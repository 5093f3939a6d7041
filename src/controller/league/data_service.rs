use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::RowValues as RowValues2;
use sql_middleware::middleware::{ConfigAndPool, MiddlewarePoolConnection};

use crate::controller::roles::{self, Role};
use crate::error::ServiceError;
use crate::model::database::{
    execute_in_tx, execute_query, get_connection, league_from_row, league_match_from_row,
    league_player_from_row, player_from_row, query_in_tx,
};
use crate::model::types::{League, LeagueMatch, LeaguePlayer};

/// # Errors
///
/// Will return `Err` if the league does not exist or the query fails
pub async fn get_league(
    config_and_pool: &ConfigAndPool,
    league_id: i64,
) -> Result<League, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, name, status, player_id FROM league WHERE id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, name, status, player_id FROM league WHERE id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(league_id)]).await?;
    res.results
        .first()
        .map(league_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("league {league_id}")))
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn find_all_leagues(
    config_and_pool: &ConfigAndPool,
) -> Result<Vec<League>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = "SELECT id, name, status, player_id FROM league ORDER BY id DESC";

    let res = execute_query(&conn, query, vec![]).await?;
    Ok(res.results.iter().map(league_from_row).collect())
}

/// Anyone may open a league; the creator becomes its owner.
///
/// # Errors
///
/// Will return `Err` if the insert fails
pub async fn add_league(
    config_and_pool: &ConfigAndPool,
    league: &League,
) -> Result<i64, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let league = league.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO league (name, status, player_id) VALUES (?1, ?2, ?3)",
                        &[
                            RowValues2::Text(league.name),
                            RowValues2::Int(league.status),
                            RowValues2::Int(league.player_id),
                        ],
                    )?;
                    let id = tx.last_insert_rowid();
                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(id)
                })
                .await??;
            Ok(id)
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_league_players(
    config_and_pool: &ConfigAndPool,
    league_id: i64,
) -> Result<Vec<LeaguePlayer>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, league_id, player_id, nick FROM league_player WHERE league_id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, league_id, player_id, nick FROM league_player WHERE league_id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(league_id)]).await?;
    Ok(res.results.iter().map(league_player_from_row).collect())
}

/// Only the league owner may add players; the nick is copied from the player
/// row so later renames don't rewrite league history. Lookup, checks and
/// insert share one transaction.
///
/// # Errors
///
/// Will return `Err` if the league or player is missing, the actor is not the
/// owner, or the player is already in the league
pub async fn add_league_player(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_player: &LeaguePlayer,
) -> Result<(), ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let league_id = league_player.league_id;
    let player_id = league_player.player_id;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;

                    let league = league_in_tx(&tx, league_id)?;
                    roles::verify_owner(
                        role,
                        league.player_id,
                        "Attempt to add player by unauthorized user",
                    )?;

                    let player_rows = query_in_tx(
                        &tx,
                        "SELECT id, nick, whs, role FROM player WHERE id = ?1",
                        &[RowValues2::Int(player_id)],
                    )?;
                    let player = player_rows
                        .results
                        .first()
                        .map(player_from_row)
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("player {player_id}"))
                        })?;

                    if member_exists_in_tx(&tx, league_id, player_id)? {
                        return Err(ServiceError::DuplicatePlayerInLeague);
                    }

                    execute_in_tx(
                        &tx,
                        "INSERT INTO league_player (league_id, player_id, nick) VALUES (?1, ?2, ?3)",
                        &[
                            RowValues2::Int(league_id),
                            RowValues2::Int(player_id),
                            RowValues2::Text(player.nick),
                        ],
                    )?;
                    tx.commit()?;
                    Ok::<_, ServiceError>(())
                })
                .await??;
            Ok(())
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// # Errors
///
/// Will return `Err` if the league is missing, the actor is not the owner, or
/// the delete fails
pub async fn delete_league_player(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_id: i64,
    player_id: i64,
) -> Result<(), ServiceError> {
    // TODO: refuse deletion while league_match rows reference this player;
    // the guard has never been enforced and match history can end up
    // pointing at a removed member.
    owner_statement(
        config_and_pool,
        role,
        league_id,
        "Attempt to delete league player by unauthorized user",
        "DELETE FROM league_player WHERE league_id = ?1 AND player_id = ?2",
        vec![RowValues2::Int(league_id), RowValues2::Int(player_id)],
    )
    .await
}

/// # Errors
///
/// Will return `Err` if the league is missing, the actor is not the owner, or
/// the delete fails
pub async fn delete_league_players(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_id: i64,
) -> Result<(), ServiceError> {
    // TODO: same missing guard as delete_league_player.
    owner_statement(
        config_and_pool,
        role,
        league_id,
        "Attempt to delete league players by unauthorized user",
        "DELETE FROM league_player WHERE league_id = ?1",
        vec![RowValues2::Int(league_id)],
    )
    .await
}

/// # Errors
///
/// Will return `Err` if the league is missing, the actor is not the owner, or
/// the update fails
pub async fn close_league(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_id: i64,
) -> Result<(), ServiceError> {
    owner_statement(
        config_and_pool,
        role,
        league_id,
        "Attempt to close league by unauthorized user",
        "UPDATE league SET status = ?1 WHERE id = ?2",
        vec![
            RowValues2::Int(League::STATUS_CLOSE),
            RowValues2::Int(league_id),
        ],
    )
    .await
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_league_matches(
    config_and_pool: &ConfigAndPool,
    league_id: i64,
) -> Result<Vec<LeagueMatch>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, league_id, winner_id, looser_id, result FROM league_match WHERE league_id = $1 ORDER BY id"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, league_id, winner_id, looser_id, result FROM league_match WHERE league_id = ?1 ORDER BY id"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(league_id)]).await?;
    Ok(res.results.iter().map(league_match_from_row).collect())
}

/// A match can be recorded once per (winner, looser) pair, and both sides
/// must already be league members. All checks run in the insert transaction.
///
/// # Errors
///
/// Will return `Err` on a duplicate match, a non-member participant, a
/// missing league, an unauthorized actor, or a failed statement
pub async fn add_league_match(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_match: &LeagueMatch,
) -> Result<(), ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let league_match = league_match.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;

                    let league = league_in_tx(&tx, league_match.league_id)?;
                    roles::verify_owner(
                        role,
                        league.player_id,
                        "Attempt to add match by unauthorized user",
                    )?;

                    let dup = query_in_tx(
                        &tx,
                        "SELECT id FROM league_match WHERE league_id = ?1 AND winner_id = ?2 AND looser_id = ?3",
                        &[
                            RowValues2::Int(league_match.league_id),
                            RowValues2::Int(league_match.winner_id),
                            RowValues2::Int(league_match.looser_id),
                        ],
                    )?;
                    if !dup.results.is_empty() {
                        return Err(ServiceError::DuplicateMatchInLeague);
                    }

                    if !member_exists_in_tx(&tx, league_match.league_id, league_match.winner_id)?
                        || !member_exists_in_tx(
                            &tx,
                            league_match.league_id,
                            league_match.looser_id,
                        )?
                    {
                        return Err(ServiceError::MatchPlayerNotInLeague);
                    }

                    execute_in_tx(
                        &tx,
                        "INSERT INTO league_match (league_id, winner_id, looser_id, result) VALUES (?1, ?2, ?3, ?4)",
                        &[
                            RowValues2::Int(league_match.league_id),
                            RowValues2::Int(league_match.winner_id),
                            RowValues2::Int(league_match.looser_id),
                            RowValues2::Text(league_match.result),
                        ],
                    )?;
                    tx.commit()?;
                    Ok::<_, ServiceError>(())
                })
                .await??;
            Ok(())
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// # Errors
///
/// Will return `Err` if the league is missing, the actor is not the owner, or
/// the delete fails
pub async fn delete_league_match(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_id: i64,
    winner_id: i64,
    looser_id: i64,
) -> Result<(), ServiceError> {
    owner_statement(
        config_and_pool,
        role,
        league_id,
        "Attempt to delete match by unauthorized user",
        "DELETE FROM league_match WHERE league_id = ?1 AND winner_id = ?2 AND looser_id = ?3",
        vec![
            RowValues2::Int(league_id),
            RowValues2::Int(winner_id),
            RowValues2::Int(looser_id),
        ],
    )
    .await
}

fn league_in_tx(tx: &rusqlite::Transaction, league_id: i64) -> Result<League, ServiceError> {
    let rows = query_in_tx(
        tx,
        "SELECT id, name, status, player_id FROM league WHERE id = ?1",
        &[RowValues2::Int(league_id)],
    )?;
    rows.results
        .first()
        .map(league_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("league {league_id}")))
}

fn member_exists_in_tx(
    tx: &rusqlite::Transaction,
    league_id: i64,
    player_id: i64,
) -> Result<bool, ServiceError> {
    let rows = query_in_tx(
        tx,
        "SELECT id FROM league_player WHERE league_id = ?1 AND player_id = ?2",
        &[RowValues2::Int(league_id), RowValues2::Int(player_id)],
    )?;
    Ok(!rows.results.is_empty())
}

/// One statement gated by the league owner check, all in one transaction.
async fn owner_statement(
    config_and_pool: &ConfigAndPool,
    role: Role,
    league_id: i64,
    action: &'static str,
    sql: &'static str,
    params: Vec<RowValues2>,
) -> Result<(), ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    let league = league_in_tx(&tx, league_id)?;
                    roles::verify_owner(role, league.player_id, action)?;
                    execute_in_tx(&tx, sql, &params)?;
                    tx.commit()?;
                    Ok::<_, ServiceError>(())
                })
                .await??;
            Ok(())
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}
