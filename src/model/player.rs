use sql_middleware::middleware::{ConfigAndPool, MiddlewarePoolConnection};
use sql_middleware::middleware::RowValues as RowValues2;

use crate::cache::{self, PlayerCacheMap};
use crate::controller::roles::{self, Role};
use crate::error::ServiceError;
use crate::model::database::{execute_query, get_connection, player_from_row};
use crate::model::types::Player;

/// Cached player lookup: cache `get` first, database on a miss, then `put`.
///
/// # Errors
///
/// Will return `Err` if the player does not exist or the query fails
pub async fn get_player(
    config_and_pool: &ConfigAndPool,
    cache_map: &PlayerCacheMap,
    player_id: i64,
) -> Result<Player, ServiceError> {
    if let Some(player) = cache::get(cache_map, player_id).await {
        return Ok(player);
    }

    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, nick, whs, role FROM player WHERE id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, nick, whs, role FROM player WHERE id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(player_id)]).await?;
    let player = res
        .results
        .first()
        .map(player_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("player {player_id}")))?;

    cache::put(cache_map, player.clone()).await;
    Ok(player)
}

/// Handicap update; the player themselves or an admin. Evicts the cached row
/// so the next read sees the new handicap.
///
/// # Errors
///
/// Will return `Err` if the actor may not update this player or the update fails
pub async fn update_player_whs(
    config_and_pool: &ConfigAndPool,
    cache_map: &PlayerCacheMap,
    role: Role,
    player_id: i64,
    whs: f32,
) -> Result<(), ServiceError> {
    roles::verify_owner(role, player_id, "Attempt to update player by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    crate::model::database::execute_in_tx(
                        &tx,
                        "UPDATE player SET whs = ?1 WHERE id = ?2",
                        &[
                            RowValues2::Float(f64::from(whs)),
                            RowValues2::Int(player_id),
                        ],
                    )?;
                    tx.commit()?;
                    Ok::<_, sql_middleware::SqlMiddlewareDbError>(())
                })
                .await??;
        }
        _ => {
            return Err(ServiceError::db_not_supported());
        }
    }

    cache::invalidate(cache_map, player_id).await;
    Ok(())
}
