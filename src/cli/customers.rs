use std::path::PathBuf;

use anyhow::{Context, Result};
use orchard_schedule::{Customer, DateRange};

/// Loads a JSON array of customers and upserts them by id.
#[tracing::instrument(skip(config))]
pub async fn load(config: &orchard::Config, file: PathBuf) -> Result<()> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let customers = serde_json::from_str::<Vec<Customer>>(&content)
        .with_context(|| format!("parsing {}", file.display()))?;

    let inactive = customers
        .iter()
        .filter(|c| c.schedule.resolve().is_none())
        .count();
    if inactive > 0 {
        tracing::warn!(inactive, "customers without an active schedule");
    }

    let command = crate::cli::command(config).await?;
    let mut snapshot = command.load(DateRange::day(crate::cli::today(config))).await?;
    let count = command.import_customers(&mut snapshot, customers).await?;

    println!("{count} customers loaded");

    Ok(())
}
