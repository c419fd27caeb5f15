use anyhow::Result;
use clap::Subcommand;
use orchard_schedule::{CreateOneOffInput, DateRange, Kind, OneOffItem};
use time::Date;

#[derive(Subcommand)]
pub enum OneOffCommands {
    /// Add a one-off item
    Add {
        /// expected_order, pack or delivery
        #[arg(long)]
        kind: Kind,

        #[arg(long, value_parser = crate::cli::parse_date)]
        date: Date,

        /// Required for deliveries
        #[arg(long)]
        customer: Option<String>,

        #[arg(long)]
        rep: Option<String>,

        #[arg(long, default_value = "")]
        note: String,
    },
    /// Soft delete a one-off item
    Delete { id: String },
    /// Bring back a deleted one-off item
    Restore { id: String },
    /// Move a one-off item by a number of days
    Shift {
        id: String,

        #[arg(long, allow_hyphen_values = true)]
        days: i64,
    },
}

fn print(action: &str, item: &OneOffItem) {
    println!(
        "{action} {} {} on {}{}",
        item.kind,
        item.id,
        orchard_shared::format_date_key(item.date),
        if item.is_deleted { " (deleted)" } else { "" }
    );
}

#[tracing::instrument(skip_all)]
pub async fn run(config: &orchard::Config, command: OneOffCommands) -> Result<()> {
    let service = crate::cli::command(config).await?;
    let mut snapshot = service
        .load(DateRange::day(crate::cli::today(config)))
        .await?;

    match command {
        OneOffCommands::Add {
            kind,
            date,
            customer,
            rep,
            note,
        } => {
            let input = CreateOneOffInput {
                kind,
                date,
                customer_id: customer,
                rep_id: rep,
                note,
            };
            let item = service.create_one_off(&mut snapshot, input).await?;
            print("created", &item);
        }
        OneOffCommands::Delete { id } => {
            let item = service.delete_one_off(&mut snapshot, &id).await?;
            print("deleted", &item);
        }
        OneOffCommands::Restore { id } => {
            let item = service.restore_one_off(&mut snapshot, &id).await?;
            print("restored", &item);
        }
        OneOffCommands::Shift { id, days } => {
            let item = service.shift_one_off(&mut snapshot, &id, days).await?;
            print("moved", &item);
        }
    }

    Ok(())
}
