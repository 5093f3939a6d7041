use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::RowValues as RowValues2;
use sql_middleware::middleware::{ConfigAndPool, MiddlewarePoolConnection};

use crate::controller::bets::settle;
use crate::controller::roles::{self, Role};
use crate::error::ServiceError;
use crate::model::database::{
    bet_game_result_from_row, execute_in_tx, execute_query, get_connection, query_in_tx,
    tournament_bet_from_row, winning_hole_from_row,
};
use crate::model::types::{BetGameResult, PlayerWinningHole, TournamentBet};

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_tournament_bets(
    config_and_pool: &ConfigAndPool,
    tournament_id: i64,
) -> Result<Vec<TournamentBet>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, tournament_id, bet_amount, bet_game, is_skin_game, is_ctp_game FROM tournament_bet WHERE tournament_id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, tournament_id, bet_amount, bet_game, is_skin_game, is_ctp_game FROM tournament_bet WHERE tournament_id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(tournament_id)]).await?;
    Ok(res.results.iter().map(tournament_bet_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_winning_holes(
    config_and_pool: &ConfigAndPool,
    tournament_id: i64,
) -> Result<Vec<PlayerWinningHole>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, player_id, round_id, tournament_id, hole_id, is_skin_hole, is_ctp_hole, skin_amount, ctp_amount FROM player_winning_hole WHERE tournament_id = $1 ORDER BY id"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, player_id, round_id, tournament_id, hole_id, is_skin_hole, is_ctp_hole, skin_amount, ctp_amount FROM player_winning_hole WHERE tournament_id = ?1 ORDER BY id"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(tournament_id)]).await?;
    Ok(res.results.iter().map(winning_hole_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_bet_game_results(
    config_and_pool: &ConfigAndPool,
    tournament_id: i64,
) -> Result<Vec<BetGameResult>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, tournament_id, player_id, skins_count, ctp_count, total_skins_amount, total_ctp_amount FROM tournament_bet_game_result WHERE tournament_id = $1 ORDER BY player_id"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, tournament_id, player_id, skins_count, ctp_count, total_skins_amount, total_ctp_amount FROM tournament_bet_game_result WHERE tournament_id = ?1 ORDER BY player_id"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(tournament_id)]).await?;
    Ok(res.results.iter().map(bet_game_result_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the actor is not an admin or the insert fails
pub async fn add_tournament_bet(
    config_and_pool: &ConfigAndPool,
    role: Role,
    bet: &TournamentBet,
) -> Result<i64, ServiceError> {
    roles::verify_admin(role, "Attempt to configure bet game by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    let bet = bet.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO tournament_bet (tournament_id, bet_amount, bet_game, is_skin_game, is_ctp_game) VALUES (?1, ?2, ?3, ?4, ?5)",
                        &[
                            RowValues2::Int(bet.tournament_id),
                            RowValues2::Int(bet.bet_amount),
                            RowValues2::Text(bet.bet_game),
                            RowValues2::Int(i64::from(bet.is_skin_game)),
                            RowValues2::Int(i64::from(bet.is_ctp_game)),
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

/// Record one hole won in a side-game during play. No roster
/// cross-validation here; that belongs to the administrative workflow that
/// feeds us.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin or the insert fails
pub async fn add_winning_hole(
    config_and_pool: &ConfigAndPool,
    role: Role,
    hole: &PlayerWinningHole,
) -> Result<i64, ServiceError> {
    roles::verify_admin(role, "Attempt to record winning hole by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    let hole = hole.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO player_winning_hole (player_id, round_id, tournament_id, hole_id, is_skin_hole, is_ctp_hole, skin_amount, ctp_amount) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        &[
                            RowValues2::Int(hole.player_id),
                            RowValues2::Int(hole.round_id),
                            RowValues2::Int(hole.tournament_id),
                            RowValues2::Int(hole.hole_id),
                            RowValues2::Int(i64::from(hole.is_skin_hole)),
                            RowValues2::Int(i64::from(hole.is_ctp_hole)),
                            RowValues2::Float(f64::from(hole.skin_amount)),
                            RowValues2::Float(f64::from(hole.ctp_amount)),
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

/// Turn the recorded winning-hole markers into the authoritative per-player
/// settlement rows for a tournament. Upserts one row per player and takes
/// ownership of the hole rows that produced it, all in one transaction.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin or any statement fails
pub async fn settle_bet_game(
    config_and_pool: &ConfigAndPool,
    role: Role,
    tournament_id: i64,
) -> Result<Vec<BetGameResult>, ServiceError> {
    roles::verify_admin(role, "Attempt to settle bet game by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    let settled_at = chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let results = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;

                    let hole_rows = query_in_tx(
                        &tx,
                        "SELECT id, player_id, round_id, tournament_id, hole_id, is_skin_hole, is_ctp_hole, skin_amount, ctp_amount FROM player_winning_hole WHERE tournament_id = ?1 ORDER BY id",
                        &[RowValues2::Int(tournament_id)],
                    )?;
                    let holes: Vec<_> =
                        hole_rows.results.iter().map(winning_hole_from_row).collect();

                    let existing = query_in_tx(
                        &tx,
                        "SELECT id, tournament_id, player_id, skins_count, ctp_count, total_skins_amount, total_ctp_amount FROM tournament_bet_game_result WHERE tournament_id = ?1",
                        &[RowValues2::Int(tournament_id)],
                    )?;
                    let existing: Vec<_> = existing
                        .results
                        .iter()
                        .map(bet_game_result_from_row)
                        .collect();

                    let mut settled = settle::aggregate_winning_holes(tournament_id, &holes);
                    for result in &mut settled {
                        let prior_id = existing
                            .iter()
                            .find(|r| r.player_id == result.player_id)
                            .and_then(|r| r.id);
                        let result_id = match prior_id {
                            Some(id) => {
                                execute_in_tx(
                                    &tx,
                                    "UPDATE tournament_bet_game_result SET skins_count = ?1, ctp_count = ?2, total_skins_amount = ?3, total_ctp_amount = ?4, ins_ts = ?5 WHERE id = ?6",
                                    &[
                                        RowValues2::Int(result.skins_count),
                                        RowValues2::Int(result.ctp_count),
                                        RowValues2::Float(f64::from(result.total_skins_amount)),
                                        RowValues2::Float(f64::from(result.total_ctp_amount)),
                                        RowValues2::Text(settled_at.clone()),
                                        RowValues2::Int(id),
                                    ],
                                )?;
                                id
                            }
                            None => {
                                execute_in_tx(
                                    &tx,
                                    "INSERT INTO tournament_bet_game_result (tournament_id, player_id, skins_count, ctp_count, total_skins_amount, total_ctp_amount, ins_ts) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                                    &[
                                        RowValues2::Int(result.tournament_id),
                                        RowValues2::Int(result.player_id),
                                        RowValues2::Int(result.skins_count),
                                        RowValues2::Int(result.ctp_count),
                                        RowValues2::Float(f64::from(result.total_skins_amount)),
                                        RowValues2::Float(f64::from(result.total_ctp_amount)),
                                        RowValues2::Text(settled_at.clone()),
                                    ],
                                )?;
                                tx.last_insert_rowid()
                            }
                        };
                        result.id = Some(result_id);

                        // ownership transfer, not a copy: the holes now belong
                        // to the settlement row
                        execute_in_tx(
                            &tx,
                            "UPDATE player_winning_hole SET bet_game_result_id = ?1 WHERE tournament_id = ?2 AND player_id = ?3",
                            &[
                                RowValues2::Int(result_id),
                                RowValues2::Int(tournament_id),
                                RowValues2::Int(result.player_id),
                            ],
                        )?;
                    }

                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(settled)
                })
                .await??;
            Ok(results)
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// Delete a tournament's bet configuration together with its settlement rows
/// and winning holes. Children go first, same transaction; there is no
/// foreign-key cascade to lean on.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin or any delete fails
pub async fn delete_tournament_bets(
    config_and_pool: &ConfigAndPool,
    role: Role,
    tournament_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(role, "Attempt to delete bet game by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM player_winning_hole WHERE tournament_id = ?1",
                        &[RowValues2::Int(tournament_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM tournament_bet_game_result WHERE tournament_id = ?1",
                        &[RowValues2::Int(tournament_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM tournament_bet WHERE tournament_id = ?1",
                        &[RowValues2::Int(tournament_id)],
                    )?;
                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(())
                })
                .await??;
            Ok(())
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}
