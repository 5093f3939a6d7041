use std::time::{SystemTime, UNIX_EPOCH};

use rusty_clubhouse::model::database::{create_tables, execute_batch_sql};
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::ConfigAndPool;

pub struct TestContext {
    pub config_and_pool: ConfigAndPool,
}

pub async fn setup_test_context(fixture_sql: &str) -> Result<TestContext, SqlMiddlewareDbError> {
    let db_name = format!(
        "file:test_db_{}?mode=memory&cache=shared",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time went backwards")
            .as_nanos()
    );

    let config_and_pool = ConfigAndPool::new_sqlite(db_name).await?;
    create_tables(&config_and_pool).await?;
    if !fixture_sql.is_empty() {
        execute_batch_sql(&config_and_pool, fixture_sql).await?;
    }

    Ok(TestContext { config_and_pool })
}
