pub mod queries;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

pub use queries::categories::Category;
pub use queries::questions::Question;

use crate::settings::DatabaseSettings;

pub const IN_MEMORY: &str = ":memory:";

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(format!("sqlite:{}", settings.path).as_str())?
        .create_if_missing(true)
        .foreign_keys(true);

    // every connection to :memory: opens its own database, so keep exactly one alive
    let pool_options = if settings.path == IN_MEMORY {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections)
    };
    pool_options.connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let settings = DatabaseSettings {
        path: IN_MEMORY.to_owned(),
        max_connections: 1,
    };
    let pool = establish_connection(&settings).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
