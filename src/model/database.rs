use sql_middleware::middleware::{
    ConfigAndPool, ConversionMode, CustomDbRow, MiddlewarePool, MiddlewarePoolConnection,
    ResultSet,
};
use sql_middleware::middleware::{QueryAndParams as QueryAndParams2, RowValues as RowValues2};
use sql_middleware::{
    convert_sql_params, SqlMiddlewareDbError, SqliteParamsExecute, SqliteParamsQuery,
};

use crate::model::types::{
    BetGameResult, Course, CourseTee, Cycle, CycleResult, CycleTournament, Hole, League,
    LeagueMatch, LeaguePlayer, Player, PlayerWinningHole,
};

pub fn parse_json_field<T>(
    row: &CustomDbRow,
    field_name: &str,
) -> Result<T, SqlMiddlewareDbError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let json_text = row
        .get(field_name)
        .and_then(|v| v.as_text())
        .unwrap_or_default();

    serde_json::from_str(json_text).map_err(|e| {
        SqlMiddlewareDbError::Other(format!("Failed to parse {field_name} field: {e}"))
    })
}

fn get_int(row: &CustomDbRow, field_name: &str) -> i64 {
    row.get(field_name)
        .and_then(|v| v.as_int())
        .copied()
        .unwrap_or_default()
}

fn get_text(row: &CustomDbRow, field_name: &str) -> String {
    row.get(field_name)
        .and_then(|v| v.as_text())
        .unwrap_or_default()
        .to_string()
}

fn get_float(row: &CustomDbRow, field_name: &str) -> f32 {
    row.get(field_name)
        .and_then(|v| v.as_float())
        .map(|v| v as f32)
        .unwrap_or_default()
}

fn get_bool(row: &CustomDbRow, field_name: &str) -> bool {
    get_int(row, field_name) != 0
}

/// # Errors
///
/// Will return `Err` if no connection can be checked out of the pool
pub async fn get_connection(
    config_and_pool: &ConfigAndPool,
) -> Result<MiddlewarePoolConnection, SqlMiddlewareDbError> {
    let pool = config_and_pool.pool.get().await?;
    MiddlewarePool::get_connection(pool).await
}

/// Read inside an open transaction, so a mutating operation sees the rows it
/// is about to rewrite.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub fn query_in_tx(
    tx: &rusqlite::Transaction,
    sql: &str,
    params: &[RowValues2],
) -> Result<ResultSet, SqlMiddlewareDbError> {
    let converted_params = convert_sql_params::<SqliteParamsQuery>(params, ConversionMode::Query)?;
    let mut stmt = tx.prepare(sql)?;
    sql_middleware::sqlite_build_result_set(&mut stmt, &converted_params.0)
}

/// # Errors
///
/// Will return `Err` if the statement fails
pub fn execute_in_tx(
    tx: &rusqlite::Transaction,
    sql: &str,
    params: &[RowValues2],
) -> Result<usize, SqlMiddlewareDbError> {
    let converted_params =
        convert_sql_params::<SqliteParamsExecute>(params, ConversionMode::Execute)?;
    let mut stmt = tx.prepare(sql)?;
    Ok(stmt.execute(converted_params.0)?)
}

/// Run a single read-only query on an already-checked-out connection.
///
/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn execute_query(
    conn: &MiddlewarePoolConnection,
    query: &str,
    params: Vec<RowValues2>,
) -> Result<ResultSet, SqlMiddlewareDbError> {
    let query_and_params = QueryAndParams2 {
        query: query.to_string(),
        params,
    };

    match conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let result = sqlite_conn
                .interact(move |db_conn| {
                    let converted_params = convert_sql_params::<SqliteParamsQuery>(
                        &query_and_params.params,
                        ConversionMode::Query,
                    )?;
                    let tx = db_conn.transaction()?;

                    let result_set = {
                        let mut stmt = tx.prepare(&query_and_params.query)?;

                        sql_middleware::sqlite_build_result_set(&mut stmt, &converted_params.0)?
                    };
                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(result_set)
                })
                .await??;

            Ok(result)
        }
        _ => Err(SqlMiddlewareDbError::Other(
            "Database type not supported for this operation".to_string(),
        )),
    }
}

/// # Errors
///
/// Will return `Err` if any statement in the batch fails
pub async fn execute_batch_sql(
    config_and_pool: &ConfigAndPool,
    query: &str,
) -> Result<(), SqlMiddlewareDbError> {
    let conn = get_connection(config_and_pool).await?;
    let script = query.to_string();

    match conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    tx.execute_batch(&script)?;
                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(())
                })
                .await??;
            Ok(())
        }
        _ => Err(SqlMiddlewareDbError::Other(
            "Database type not supported for this operation".to_string(),
        )),
    }
}

/// # Errors
///
/// Will return `Err` if the database query fails
pub async fn create_tables(config_and_pool: &ConfigAndPool) -> Result<(), SqlMiddlewareDbError> {
    let ddl = [
        include_str!("../sql/schema/sqlite/00_player.sql"),
        include_str!("../sql/schema/sqlite/01_cycle.sql"),
        include_str!("../sql/schema/sqlite/02_cycle_tournament.sql"),
        include_str!("../sql/schema/sqlite/03_cycle_result.sql"),
        include_str!("../sql/schema/sqlite/04_league.sql"),
        include_str!("../sql/schema/sqlite/05_league_player.sql"),
        include_str!("../sql/schema/sqlite/06_league_match.sql"),
        include_str!("../sql/schema/sqlite/07_tournament_bet.sql"),
        include_str!("../sql/schema/sqlite/08_tournament_bet_game_result.sql"),
        include_str!("../sql/schema/sqlite/09_player_winning_hole.sql"),
        include_str!("../sql/schema/sqlite/10_course.sql"),
        include_str!("../sql/schema/sqlite/11_hole.sql"),
        include_str!("../sql/schema/sqlite/12_course_tee.sql"),
        include_str!("../sql/schema/sqlite/13_favourite_course.sql"),
    ]
    .join("\n");

    execute_batch_sql(config_and_pool, &ddl).await
}

pub fn player_from_row(row: &CustomDbRow) -> Player {
    Player {
        id: Some(get_int(row, "id")),
        nick: get_text(row, "nick"),
        whs: get_float(row, "whs"),
        role: get_text(row, "role"),
    }
}

pub fn cycle_from_row(row: &CustomDbRow) -> Cycle {
    Cycle {
        id: Some(get_int(row, "id")),
        name: get_text(row, "name"),
        status: get_int(row, "status"),
        player_id: get_int(row, "player_id"),
        best_rounds: get_int(row, "best_rounds"),
        max_whs: get_float(row, "max_whs"),
    }
}

pub fn cycle_tournament_from_row(row: &CustomDbRow) -> CycleTournament {
    CycleTournament {
        id: Some(get_int(row, "id")),
        cycle_id: get_int(row, "cycle_id"),
        name: get_text(row, "name"),
        rounds: get_int(row, "rounds"),
        best_of: get_bool(row, "best_of"),
    }
}

pub fn cycle_result_from_row(row: &CustomDbRow) -> Result<CycleResult, SqlMiddlewareDbError> {
    Ok(CycleResult {
        id: Some(get_int(row, "id")),
        cycle_id: get_int(row, "cycle_id"),
        player_name: get_text(row, "player_name"),
        whs: get_float(row, "whs"),
        results: parse_json_field(row, "results")?,
        cycle_score: get_int(row, "cycle_score") as i32,
        total: get_int(row, "total") as i32,
    })
}

pub fn winning_hole_from_row(row: &CustomDbRow) -> PlayerWinningHole {
    PlayerWinningHole {
        id: Some(get_int(row, "id")),
        player_id: get_int(row, "player_id"),
        round_id: get_int(row, "round_id"),
        tournament_id: get_int(row, "tournament_id"),
        hole_id: get_int(row, "hole_id"),
        is_skin_hole: get_bool(row, "is_skin_hole"),
        is_ctp_hole: get_bool(row, "is_ctp_hole"),
        skin_amount: get_float(row, "skin_amount"),
        ctp_amount: get_float(row, "ctp_amount"),
    }
}

pub fn tournament_bet_from_row(row: &CustomDbRow) -> crate::model::types::TournamentBet {
    crate::model::types::TournamentBet {
        id: Some(get_int(row, "id")),
        tournament_id: get_int(row, "tournament_id"),
        bet_amount: get_int(row, "bet_amount"),
        bet_game: get_text(row, "bet_game"),
        is_skin_game: get_bool(row, "is_skin_game"),
        is_ctp_game: get_bool(row, "is_ctp_game"),
    }
}

pub fn bet_game_result_from_row(row: &CustomDbRow) -> BetGameResult {
    BetGameResult {
        id: Some(get_int(row, "id")),
        tournament_id: get_int(row, "tournament_id"),
        player_id: get_int(row, "player_id"),
        skins_count: get_int(row, "skins_count"),
        ctp_count: get_int(row, "ctp_count"),
        total_skins_amount: get_float(row, "total_skins_amount"),
        total_ctp_amount: get_float(row, "total_ctp_amount"),
    }
}

pub fn course_from_row(row: &CustomDbRow) -> Course {
    Course {
        id: Some(get_int(row, "id")),
        name: get_text(row, "name"),
        par: get_int(row, "par"),
        hole_nbr: get_int(row, "hole_nbr"),
        historical: get_bool(row, "historical"),
    }
}

pub fn hole_from_row(row: &CustomDbRow) -> Hole {
    Hole {
        id: Some(get_int(row, "id")),
        course_id: get_int(row, "course_id"),
        number: get_int(row, "number"),
        par: get_int(row, "par"),
        si: get_int(row, "si"),
    }
}

pub fn course_tee_from_row(row: &CustomDbRow) -> CourseTee {
    CourseTee {
        id: Some(get_int(row, "id")),
        course_id: get_int(row, "course_id"),
        tee: get_text(row, "tee"),
        cr: get_float(row, "cr"),
        sr: get_int(row, "sr"),
        tee_type: get_int(row, "tee_type"),
        sex: get_bool(row, "sex"),
    }
}

pub fn league_from_row(row: &CustomDbRow) -> League {
    League {
        id: Some(get_int(row, "id")),
        name: get_text(row, "name"),
        status: get_int(row, "status"),
        player_id: get_int(row, "player_id"),
    }
}

pub fn league_player_from_row(row: &CustomDbRow) -> LeaguePlayer {
    LeaguePlayer {
        id: Some(get_int(row, "id")),
        league_id: get_int(row, "league_id"),
        player_id: get_int(row, "player_id"),
        nick: get_text(row, "nick"),
    }
}

pub fn league_match_from_row(row: &CustomDbRow) -> LeagueMatch {
    LeagueMatch {
        id: Some(get_int(row, "id")),
        league_id: get_int(row, "league_id"),
        winner_id: get_int(row, "winner_id"),
        looser_id: get_int(row, "looser_id"),
        result: get_text(row, "result"),
    }
}
