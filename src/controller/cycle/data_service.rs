use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::RowValues as RowValues2;
use sql_middleware::middleware::{ConfigAndPool, MiddlewarePoolConnection};

use crate::controller::cycle::recalc;
use crate::controller::roles::{self, Role};
use crate::error::ServiceError;
use crate::model::database::{
    cycle_from_row, cycle_result_from_row, cycle_tournament_from_row, execute_in_tx,
    execute_query, get_connection, query_in_tx,
};
use crate::model::types::{Cycle, CycleResult, CycleTournament, PlayerRoundScore};

/// # Errors
///
/// Will return `Err` if the cycle does not exist or the query fails
pub async fn get_cycle(
    config_and_pool: &ConfigAndPool,
    cycle_id: i64,
) -> Result<Cycle, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, name, status, player_id, best_rounds, max_whs FROM cycle WHERE id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, name, status, player_id, best_rounds, max_whs FROM cycle WHERE id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(cycle_id)]).await?;
    res.results
        .first()
        .map(cycle_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("cycle {cycle_id}")))
}

/// Newest cycle first, matching the listing the frontend shows.
///
/// # Errors
///
/// Will return `Err` if the query fails
pub async fn find_all_cycles(
    config_and_pool: &ConfigAndPool,
) -> Result<Vec<Cycle>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query =
        "SELECT id, name, status, player_id, best_rounds, max_whs FROM cycle ORDER BY id DESC";

    let res = execute_query(&conn, query, vec![]).await?;
    Ok(res.results.iter().map(cycle_from_row).collect())
}

/// Ascending id, which is also chronological order of play.
///
/// # Errors
///
/// Will return `Err` if the query fails
pub async fn find_cycle_tournaments(
    config_and_pool: &ConfigAndPool,
    cycle_id: i64,
) -> Result<Vec<CycleTournament>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, cycle_id, name, rounds, best_of FROM cycle_tournament WHERE cycle_id = $1 ORDER BY id"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, cycle_id, name, rounds, best_of FROM cycle_tournament WHERE cycle_id = ?1 ORDER BY id"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(cycle_id)]).await?;
    Ok(res.results.iter().map(cycle_tournament_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the query fails or a stored results column is malformed
pub async fn find_cycle_results(
    config_and_pool: &ConfigAndPool,
    cycle_id: i64,
) -> Result<Vec<CycleResult>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, cycle_id, player_name, whs, results, cycle_score, total FROM cycle_result WHERE cycle_id = $1 ORDER BY cycle_score"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, cycle_id, player_name, whs, results, cycle_score, total FROM cycle_result WHERE cycle_id = ?1 ORDER BY cycle_score"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(cycle_id)]).await?;
    res.results
        .iter()
        .map(|row| cycle_result_from_row(row).map_err(ServiceError::from))
        .collect()
}

/// # Errors
///
/// Will return `Err` if the actor is not an admin or the insert fails
pub async fn add_cycle(
    config_and_pool: &ConfigAndPool,
    role: Role,
    cycle: &Cycle,
) -> Result<i64, ServiceError> {
    roles::verify_admin(role, "Attempt to add cycle by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    let cycle = cycle.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO cycle (name, status, player_id, best_rounds, max_whs) VALUES (?1, ?2, ?3, ?4, ?5)",
                        &[
                            RowValues2::Text(cycle.name),
                            RowValues2::Int(cycle.status),
                            RowValues2::Int(cycle.player_id),
                            RowValues2::Int(cycle.best_rounds),
                            RowValues2::Float(f64::from(cycle.max_whs)),
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

/// Append a played tournament to an open cycle and fold each player's 4-slot
/// breakdown into their running result row, creating rows for first-time
/// players and zero-padding everyone else. Runs in one transaction.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin, the cycle is missing or
/// closed, or any statement fails
pub async fn add_cycle_tournament(
    config_and_pool: &ConfigAndPool,
    role: Role,
    tournament: &CycleTournament,
    round_scores: &[PlayerRoundScore],
) -> Result<i64, ServiceError> {
    roles::verify_admin(role, "Attempt to add cycle tournament by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    let tournament = tournament.clone();
    let round_scores = round_scores.to_vec();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;

                    // status and best_rounds must be read under the same
                    // transaction as the writes, or a concurrent close could
                    // slip a tournament into a closed cycle
                    let cycle = cycle_in_tx(&tx, tournament.cycle_id)?;
                    if cycle.status != Cycle::STATUS_OPEN {
                        return Err(ServiceError::CycleClosed);
                    }
                    let best_rounds = cycle.best_rounds;

                    let tournaments_so_far = query_in_tx(
                        &tx,
                        "SELECT id FROM cycle_tournament WHERE cycle_id = ?1 ORDER BY id",
                        &[RowValues2::Int(tournament.cycle_id)],
                    )?
                    .results
                    .len();

                    let existing = query_in_tx(
                        &tx,
                        "SELECT id, cycle_id, player_name, whs, results, cycle_score, total FROM cycle_result WHERE cycle_id = ?1",
                        &[RowValues2::Int(tournament.cycle_id)],
                    )?;
                    let mut rows = existing
                        .results
                        .iter()
                        .map(cycle_result_from_row)
                        .collect::<Result<Vec<_>, _>>()?;

                    for score in &round_scores {
                        if let Some(row) =
                            rows.iter_mut().find(|r| r.player_name == score.player_name)
                        {
                            recalc::append_tournament(
                                &mut row.results,
                                tournaments_so_far,
                                &score.r,
                            );
                            row.whs = score.whs;
                        } else {
                            let mut results = Vec::new();
                            recalc::append_tournament(&mut results, tournaments_so_far, &score.r);
                            rows.push(CycleResult {
                                id: None,
                                cycle_id: tournament.cycle_id,
                                player_name: score.player_name.clone(),
                                whs: score.whs,
                                results,
                                cycle_score: 0,
                                total: 0,
                            });
                        }
                    }

                    for row in &mut rows {
                        // players absent from this tournament still get their
                        // zero slot group
                        row.results
                            .resize((tournaments_so_far + 1) * recalc::RESULT_SLOTS, 0);
                        row.total = recalc::total_score(&row.results);
                        row.cycle_score = recalc::cycle_score(&row.results, best_rounds);
                        upsert_cycle_result(&tx, row)?;
                    }

                    execute_in_tx(
                        &tx,
                        "INSERT INTO cycle_tournament (cycle_id, name, rounds, best_of) VALUES (?1, ?2, ?3, ?4)",
                        &[
                            RowValues2::Int(tournament.cycle_id),
                            RowValues2::Text(tournament.name),
                            RowValues2::Int(tournament.rounds),
                            RowValues2::Int(i64::from(tournament.best_of)),
                        ],
                    )?;
                    let id = tx.last_insert_rowid();
                    tx.commit()?;
                    Ok::<_, ServiceError>(id)
                })
                .await??;
            Ok(id)
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// Remove the most recently added tournament from a cycle and bring every
/// result row back in line: truncate its slot group, recompute the
/// aggregates, drop rows that end up empty. A cycle without tournaments is a
/// no-op. Reads, updates and deletes share one transaction.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin, the cycle is missing, or
/// any statement fails
pub async fn remove_last_cycle_tournament(
    config_and_pool: &ConfigAndPool,
    role: Role,
    cycle_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(
        role,
        "Attempt to delete cycle tournament by unauthorized user",
    )?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;

                    let best_rounds = cycle_in_tx(&tx, cycle_id)?.best_rounds;

                    let tournaments = query_in_tx(
                        &tx,
                        "SELECT id FROM cycle_tournament WHERE cycle_id = ?1 ORDER BY id",
                        &[RowValues2::Int(cycle_id)],
                    )?;
                    let Some(last) = tournaments.results.last() else {
                        // nothing to remove; idempotent
                        tx.commit()?;
                        return Ok(());
                    };
                    let last_id = last
                        .get("id")
                        .and_then(|v| v.as_int())
                        .copied()
                        .unwrap_or_default();

                    let result_rows = query_in_tx(
                        &tx,
                        "SELECT id, cycle_id, player_name, whs, results, cycle_score, total FROM cycle_result WHERE cycle_id = ?1",
                        &[RowValues2::Int(cycle_id)],
                    )?;

                    for row in &result_rows.results {
                        let cycle_result = cycle_result_from_row(row)?;
                        let row_id = cycle_result.id.unwrap_or_default();
                        match recalc::strip_last_tournament(&cycle_result.results, best_rounds) {
                            Some(stripped) => {
                                let results_json = serde_json::to_string(&stripped.results)
                                    .map_err(|e| SqlMiddlewareDbError::Other(e.to_string()))?;
                                execute_in_tx(
                                    &tx,
                                    "UPDATE cycle_result SET results = ?1, cycle_score = ?2, total = ?3 WHERE id = ?4",
                                    &[
                                        RowValues2::Text(results_json),
                                        RowValues2::Int(i64::from(stripped.cycle_score)),
                                        RowValues2::Int(i64::from(stripped.total)),
                                        RowValues2::Int(row_id),
                                    ],
                                )?;
                            }
                            None => {
                                execute_in_tx(
                                    &tx,
                                    "DELETE FROM cycle_result WHERE id = ?1",
                                    &[RowValues2::Int(row_id)],
                                )?;
                            }
                        }
                    }

                    execute_in_tx(
                        &tx,
                        "DELETE FROM cycle_tournament WHERE id = ?1",
                        &[RowValues2::Int(last_id)],
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
/// Will return `Err` if the actor is not an admin, the cycle is missing, or
/// the update fails
pub async fn close_cycle(
    config_and_pool: &ConfigAndPool,
    role: Role,
    cycle_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(role, "Attempt to close cycle by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    cycle_in_tx(&tx, cycle_id)?;
                    execute_in_tx(
                        &tx,
                        "UPDATE cycle SET status = ?1 WHERE id = ?2",
                        &[
                            RowValues2::Int(Cycle::STATUS_CLOSE),
                            RowValues2::Int(cycle_id),
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

/// Delete a cycle with its tournaments and result rows, one transaction.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin, the cycle is missing, or
/// any delete fails
pub async fn delete_cycle(
    config_and_pool: &ConfigAndPool,
    role: Role,
    cycle_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(role, "Attempt to delete cycle by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    cycle_in_tx(&tx, cycle_id)?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM cycle_result WHERE cycle_id = ?1",
                        &[RowValues2::Int(cycle_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM cycle_tournament WHERE cycle_id = ?1",
                        &[RowValues2::Int(cycle_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM cycle WHERE id = ?1",
                        &[RowValues2::Int(cycle_id)],
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

fn cycle_in_tx(tx: &rusqlite::Transaction, cycle_id: i64) -> Result<Cycle, ServiceError> {
    let rows = query_in_tx(
        tx,
        "SELECT id, name, status, player_id, best_rounds, max_whs FROM cycle WHERE id = ?1",
        &[RowValues2::Int(cycle_id)],
    )?;
    rows.results
        .first()
        .map(cycle_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("cycle {cycle_id}")))
}

fn upsert_cycle_result(
    tx: &rusqlite::Transaction,
    row: &CycleResult,
) -> Result<(), SqlMiddlewareDbError> {
    let results_json =
        serde_json::to_string(&row.results).map_err(|e| SqlMiddlewareDbError::Other(e.to_string()))?;
    match row.id {
        Some(id) => {
            execute_in_tx(
                tx,
                "UPDATE cycle_result SET whs = ?1, results = ?2, cycle_score = ?3, total = ?4 WHERE id = ?5",
                &[
                    RowValues2::Float(f64::from(row.whs)),
                    RowValues2::Text(results_json),
                    RowValues2::Int(i64::from(row.cycle_score)),
                    RowValues2::Int(i64::from(row.total)),
                    RowValues2::Int(id),
                ],
            )?;
        }
        None => {
            execute_in_tx(
                tx,
                "INSERT INTO cycle_result (cycle_id, player_name, whs, results, cycle_score, total) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    RowValues2::Int(row.cycle_id),
                    RowValues2::Text(row.player_name.clone()),
                    RowValues2::Float(f64::from(row.whs)),
                    RowValues2::Text(results_json),
                    RowValues2::Int(i64::from(row.cycle_score)),
                    RowValues2::Int(i64::from(row.total)),
                ],
            )?;
        }
    }
    Ok(())
}
