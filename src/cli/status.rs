use anyhow::Result;
use clap::{Args, Subcommand};
use orchard_schedule::{
    AgendaQuery, Change, DateRange, EventKey, SkipDetails, SkipReason, TargetStatus,
};

#[derive(Args)]
pub struct StatusArgs {
    /// Selection id as printed by `agenda`
    selection_id: EventKey,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Mark the item as done
    Done,
    /// Put the item back to pending
    Undo,
    /// Mark the item as skipped
    Skip {
        #[arg(long)]
        reason: SkipReason,

        /// Required when the reason is CUSTOM
        #[arg(long)]
        text: Option<String>,
    },
}

#[tracing::instrument(skip_all, fields(key = %args.selection_id))]
pub async fn set(config: &orchard::Config, args: StatusArgs) -> Result<()> {
    let target = match args.action {
        Action::Done => TargetStatus::Done,
        Action::Undo => TargetStatus::Pending,
        Action::Skip { reason, text } => TargetStatus::Skipped(SkipDetails::new(reason, text)),
    };

    let range = DateRange::day(args.selection_id.date());
    let command = crate::cli::command(config).await?;
    let mut snapshot = command.load(range).await?;

    let Some(item) = snapshot
        .agenda(&AgendaQuery::new(range))
        .into_iter()
        .find(|item| item.selection_id == args.selection_id)
    else {
        anyhow::bail!("no scheduled item matches {}", args.selection_id);
    };

    match command
        .set_status(&mut snapshot, &item.occurrence, target)
        .await?
    {
        Change::Unchanged => println!("{} already pending", args.selection_id),
        Change::Put(record) => println!("{} is now {}", args.selection_id, record.status),
        Change::Remove(_) => println!("{} is now PENDING", args.selection_id),
    }

    Ok(())
}
