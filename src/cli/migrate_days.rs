use anyhow::Result;
use orchard_schedule::{Confirmation, DateRange};

/// Rewrites stored Sunday-first day indices as Monday-first. Only runs when
/// `confirm` is the literal `MIGRATE`.
#[tracing::instrument(skip_all)]
pub async fn run(config: &orchard::Config, confirm: String) -> Result<()> {
    let confirmation = Confirmation::parse(&confirm)?;

    let command = crate::cli::command(config).await?;
    let mut snapshot = command
        .load(DateRange::day(crate::cli::today(config)))
        .await?;
    let count = command
        .migrate_day_indexes(&mut snapshot, confirmation)
        .await?;

    println!("{count} customers migrated");

    Ok(())
}
