pub mod agenda;
pub mod customers;
pub mod database;
pub mod migrate_days;
pub mod one_off;
pub mod status;

use std::sync::Arc;

use orchard::Config;
use orchard_schedule::{Command, SqliteStore};
use time::Date;

/// Local store from `database.url`, mirrored to `remote.url` when set.
pub async fn command(config: &Config) -> anyhow::Result<Command> {
    let pool = orchard::create_pool(&config.database.url, config.database.max_connections).await?;
    let command = Command::new(Arc::new(SqliteStore(pool)));

    let Some(remote_url) = &config.remote.url else {
        return Ok(command);
    };

    let remote = orchard::create_pool(remote_url, config.database.max_connections).await?;
    tracing::info!("Mirroring writes to remote store {remote_url}");

    Ok(command.with_remote(Arc::new(SqliteStore(remote))))
}

pub fn parse_date(value: &str) -> Result<Date, String> {
    orchard_shared::parse_date_key(value).map_err(|e| e.to_string())
}

pub fn today(config: &Config) -> Date {
    orchard_shared::today(&config.schedule.timezone)
}
