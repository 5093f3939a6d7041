use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::RowValues as RowValues2;
use sql_middleware::middleware::{ConfigAndPool, MiddlewarePoolConnection};

use crate::controller::roles::{self, Role};
use crate::error::ServiceError;
use crate::model::database::{
    course_from_row, course_tee_from_row, execute_in_tx, execute_query, get_connection,
    hole_from_row, query_in_tx,
};
use crate::model::types::{Course, CourseTee, Hole};

/// Shorter search strings match too much of the catalog to be useful.
pub const MIN_SEARCH_LENGTH: usize = 3;
/// Page length for the paged catalog listing.
pub const COURSE_PAGE_SIZE: i64 = 25;

/// # Errors
///
/// Will return `Err` if the course does not exist or the query fails
pub async fn get_course(
    config_and_pool: &ConfigAndPool,
    course_id: i64,
) -> Result<Course, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(course_id)]).await?;
    res.results
        .first()
        .map(course_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("course {course_id}")))
}

/// Active catalog, alphabetical. Historical courses are excluded.
///
/// # Errors
///
/// Will return `Err` if the query fails
pub async fn list_courses(config_and_pool: &ConfigAndPool) -> Result<Vec<Course>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query =
        "SELECT id, name, par, hole_nbr, historical FROM course WHERE historical = 0 ORDER BY name";

    let res = execute_query(&conn, query, vec![]).await?;
    Ok(res.results.iter().map(course_from_row).collect())
}

/// One page of the active catalog, alphabetical, `COURSE_PAGE_SIZE` rows.
///
/// # Errors
///
/// Will return `Err` if the query fails
pub async fn list_courses_page(
    config_and_pool: &ConfigAndPool,
    page_no: i64,
) -> Result<Vec<Course>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE historical = 0 ORDER BY name LIMIT $1 OFFSET $2"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE historical = 0 ORDER BY name LIMIT ?1 OFFSET ?2"
        }
    };

    let res = execute_query(
        &conn,
        query,
        vec![
            RowValues2::Int(COURSE_PAGE_SIZE),
            RowValues2::Int(page_no.max(0) * COURSE_PAGE_SIZE),
        ],
    )
    .await?;
    Ok(res.results.iter().map(course_from_row).collect())
}

/// Case-insensitive substring search over active courses.
///
/// # Errors
///
/// Will return `Err` if the search string is under `MIN_SEARCH_LENGTH`
/// characters or the query fails
pub async fn search_for_courses(
    config_and_pool: &ConfigAndPool,
    course_name: &str,
) -> Result<Vec<Course>, ServiceError> {
    if course_name.chars().count() < MIN_SEARCH_LENGTH {
        return Err(ServiceError::SearchStringTooShort);
    }

    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE historical = 0 AND name ILIKE '%' || $1 || '%' ORDER BY name"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, name, par, hole_nbr, historical FROM course WHERE historical = 0 AND name LIKE '%' || ?1 || '%' ORDER BY name"
        }
    };

    let res = execute_query(
        &conn,
        query,
        vec![RowValues2::Text(course_name.to_string())],
    )
    .await?;
    Ok(res.results.iter().map(course_from_row).collect())
}

/// Insert a course with its holes and tees, one transaction. The course is
/// always stored active; only `move_course_to_history` retires it.
///
/// # Errors
///
/// Will return `Err` if any insert fails
pub async fn add_course(
    config_and_pool: &ConfigAndPool,
    course: &Course,
    holes: &[Hole],
    tees: &[CourseTee],
) -> Result<i64, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let course = course.clone();
    let holes = holes.to_vec();
    let tees = tees.to_vec();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO course (name, par, hole_nbr, historical) VALUES (?1, ?2, ?3, 0)",
                        &[
                            RowValues2::Text(course.name),
                            RowValues2::Int(course.par),
                            RowValues2::Int(course.hole_nbr),
                        ],
                    )?;
                    let course_id = tx.last_insert_rowid();

                    for hole in &holes {
                        execute_in_tx(
                            &tx,
                            "INSERT INTO hole (course_id, number, par, si) VALUES (?1, ?2, ?3, ?4)",
                            &[
                                RowValues2::Int(course_id),
                                RowValues2::Int(hole.number),
                                RowValues2::Int(hole.par),
                                RowValues2::Int(hole.si),
                            ],
                        )?;
                    }
                    for tee in &tees {
                        insert_tee_in_tx(&tx, course_id, tee)?;
                    }

                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(course_id)
                })
                .await??;
            Ok(id)
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// Add one tee set to an existing course. Rejects a tee whose
/// `(sex, tee, tee_type)` triple the course already has; check and insert
/// share one transaction.
///
/// # Errors
///
/// Will return `Err` if the course is missing, the tee already exists, or the
/// insert fails
pub async fn add_tee(
    config_and_pool: &ConfigAndPool,
    tee: &CourseTee,
    course_id: i64,
) -> Result<i64, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let tee = tee.clone();
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let id = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    course_in_tx(&tx, course_id)?;

                    let dup = query_in_tx(
                        &tx,
                        "SELECT id FROM course_tee WHERE course_id = ?1 AND sex = ?2 AND tee = ?3 AND tee_type = ?4",
                        &[
                            RowValues2::Int(course_id),
                            RowValues2::Int(i64::from(tee.sex)),
                            RowValues2::Text(tee.tee.clone()),
                            RowValues2::Int(tee.tee_type),
                        ],
                    )?;
                    if !dup.results.is_empty() {
                        return Err(ServiceError::TeeAlreadyExists);
                    }

                    insert_tee_in_tx(&tx, course_id, &tee)?;
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

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_holes(
    config_and_pool: &ConfigAndPool,
    course_id: i64,
) -> Result<Vec<Hole>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, course_id, number, par, si FROM hole WHERE course_id = $1 ORDER BY number"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, course_id, number, par, si FROM hole WHERE course_id = ?1 ORDER BY number"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(course_id)]).await?;
    Ok(res.results.iter().map(hole_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn get_tees(
    config_and_pool: &ConfigAndPool,
    course_id: i64,
) -> Result<Vec<CourseTee>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, course_id, tee, cr, sr, tee_type, sex FROM course_tee WHERE course_id = $1 ORDER BY id"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, course_id, tee, cr, sr, tee_type, sex FROM course_tee WHERE course_id = ?1 ORDER BY id"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(course_id)]).await?;
    Ok(res.results.iter().map(course_tee_from_row).collect())
}

/// # Errors
///
/// Will return `Err` if the tee does not exist or the query fails
pub async fn get_tee(
    config_and_pool: &ConfigAndPool,
    tee_id: i64,
) -> Result<CourseTee, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT id, course_id, tee, cr, sr, tee_type, sex FROM course_tee WHERE id = $1"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT id, course_id, tee, cr, sr, tee_type, sex FROM course_tee WHERE id = ?1"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(tee_id)]).await?;
    res.results
        .first()
        .map(course_tee_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("tee {tee_id}")))
}

/// # Errors
///
/// Will return `Err` if the actor may not edit this player's favourites or
/// the insert fails
pub async fn add_to_favourites(
    config_and_pool: &ConfigAndPool,
    role: Role,
    player_id: i64,
    course_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_owner(
        role,
        player_id,
        "Attempt to add favourite course by unauthorized user",
    )?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    execute_in_tx(
                        &tx,
                        "INSERT INTO favourite_course (player_id, course_id) VALUES (?1, ?2)",
                        &[RowValues2::Int(player_id), RowValues2::Int(course_id)],
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

/// Returns the number of favourite rows removed.
///
/// # Errors
///
/// Will return `Err` if the actor may not edit this player's favourites or
/// the delete fails
pub async fn delete_from_favourites(
    config_and_pool: &ConfigAndPool,
    role: Role,
    player_id: i64,
    course_id: i64,
) -> Result<usize, ServiceError> {
    roles::verify_owner(
        role,
        player_id,
        "Attempt to delete favourite course by unauthorized user",
    )?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            let removed = sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    let removed = execute_in_tx(
                        &tx,
                        "DELETE FROM favourite_course WHERE player_id = ?1 AND course_id = ?2",
                        &[RowValues2::Int(player_id), RowValues2::Int(course_id)],
                    )?;
                    tx.commit()?;
                    Ok::<_, SqlMiddlewareDbError>(removed)
                })
                .await??;
            Ok(removed)
        }
        _ => Err(ServiceError::db_not_supported()),
    }
}

/// # Errors
///
/// Will return `Err` if the query fails
pub async fn list_favourites(
    config_and_pool: &ConfigAndPool,
    player_id: i64,
) -> Result<Vec<Course>, ServiceError> {
    let conn = get_connection(config_and_pool).await?;
    let query = match &conn {
        MiddlewarePoolConnection::Postgres(_) => {
            "SELECT c.id, c.name, c.par, c.hole_nbr, c.historical FROM course c JOIN favourite_course f ON f.course_id = c.id WHERE f.player_id = $1 ORDER BY c.name"
        }
        MiddlewarePoolConnection::Sqlite(_) => {
            "SELECT c.id, c.name, c.par, c.hole_nbr, c.historical FROM course c JOIN favourite_course f ON f.course_id = c.id WHERE f.player_id = ?1 ORDER BY c.name"
        }
    };

    let res = execute_query(&conn, query, vec![RowValues2::Int(player_id)]).await?;
    Ok(res.results.iter().map(course_from_row).collect())
}

/// Delete a course with its holes, tees and favourite entries, one
/// transaction. Admin only.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin, the course is missing, or
/// any delete fails
pub async fn delete_course(
    config_and_pool: &ConfigAndPool,
    role: Role,
    course_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(role, "Attempt to delete course by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    course_in_tx(&tx, course_id)?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM favourite_course WHERE course_id = ?1",
                        &[RowValues2::Int(course_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM hole WHERE course_id = ?1",
                        &[RowValues2::Int(course_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM course_tee WHERE course_id = ?1",
                        &[RowValues2::Int(course_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM course WHERE id = ?1",
                        &[RowValues2::Int(course_id)],
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

/// Retire a course: flag it historical and drop it from every player's
/// favourites, one transaction. Admin only.
///
/// # Errors
///
/// Will return `Err` if the actor is not an admin, the course is missing, or
/// any statement fails
pub async fn move_course_to_history(
    config_and_pool: &ConfigAndPool,
    role: Role,
    course_id: i64,
) -> Result<(), ServiceError> {
    roles::verify_admin(role, "Attempt to move course to history by unauthorized user")?;

    let conn = get_connection(config_and_pool).await?;
    match &conn {
        MiddlewarePoolConnection::Sqlite(sqlite_conn) => {
            sqlite_conn
                .interact(move |db_conn| {
                    let tx = db_conn.transaction()?;
                    course_in_tx(&tx, course_id)?;
                    execute_in_tx(
                        &tx,
                        "UPDATE course SET historical = 1 WHERE id = ?1",
                        &[RowValues2::Int(course_id)],
                    )?;
                    execute_in_tx(
                        &tx,
                        "DELETE FROM favourite_course WHERE course_id = ?1",
                        &[RowValues2::Int(course_id)],
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

fn course_in_tx(tx: &rusqlite::Transaction, course_id: i64) -> Result<Course, ServiceError> {
    let rows = query_in_tx(
        tx,
        "SELECT id, name, par, hole_nbr, historical FROM course WHERE id = ?1",
        &[RowValues2::Int(course_id)],
    )?;
    rows.results
        .first()
        .map(course_from_row)
        .ok_or_else(|| ServiceError::NotFound(format!("course {course_id}")))
}

fn insert_tee_in_tx(
    tx: &rusqlite::Transaction,
    course_id: i64,
    tee: &CourseTee,
) -> Result<usize, SqlMiddlewareDbError> {
    execute_in_tx(
        tx,
        "INSERT INTO course_tee (course_id, tee, cr, sr, tee_type, sex) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        &[
            RowValues2::Int(course_id),
            RowValues2::Text(tee.tee.clone()),
            RowValues2::Float(f64::from(tee.cr)),
            RowValues2::Int(tee.sr),
            RowValues2::Int(tee.tee_type),
            RowValues2::Int(i64::from(tee.sex)),
        ],
    )
}
