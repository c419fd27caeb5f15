use anyhow::Result;
use clap::{Args, ValueEnum};
use orchard_schedule::{
    AgendaItem, AgendaQuery, DateRange, Filters, RepFilter, StatusFilter, Summary, Toggles,
    day::day_label, day::weekday_index,
};
use serde::Serialize;
use time::Date;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Day,
    Week,
    Month,
}

#[derive(Args)]
pub struct AgendaArgs {
    #[arg(long, value_enum, default_value = "week")]
    view: View,

    /// Day inside the window to show (defaults to today)
    #[arg(long, value_parser = crate::cli::parse_date)]
    date: Option<Date>,

    /// Explicit window start, overrides --view
    #[arg(long, value_parser = crate::cli::parse_date, requires = "to")]
    from: Option<Date>,

    #[arg(long, value_parser = crate::cli::parse_date, requires = "from")]
    to: Option<Date>,

    #[arg(long, default_value = "all")]
    rep: RepFilter,

    #[arg(long, default_value = "all")]
    status: StatusFilter,

    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    no_orders: bool,

    #[arg(long)]
    no_packs: bool,

    #[arg(long)]
    no_deliveries: bool,

    /// Print items and summary as JSON
    #[arg(long)]
    json: bool,
}

impl AgendaArgs {
    fn range(&self, today: Date) -> Result<DateRange> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            return Ok(DateRange::new(from, to)?);
        }

        let date = self.date.unwrap_or(today);
        Ok(match self.view {
            View::Day => DateRange::day(date),
            View::Week => DateRange::week(date),
            View::Month => DateRange::month_grid(date)?,
        })
    }

    fn filters(&self) -> Filters {
        Filters {
            toggles: Toggles {
                expected_orders: !self.no_orders,
                packs: !self.no_packs,
                deliveries: !self.no_deliveries,
            },
            status: self.status,
            rep: self.rep.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(with = "orchard_shared::date_key")]
    start: Date,
    #[serde(with = "orchard_shared::date_key")]
    end: Date,
    summary: Summary,
    items: &'a [AgendaItem],
}

fn print_text(range: DateRange, items: &[AgendaItem]) {
    let mut current = None;

    for item in items {
        let occurrence = &item.occurrence;
        if current != Some(occurrence.date) {
            current = Some(occurrence.date);
            println!(
                "\n{} {}",
                day_label(weekday_index(occurrence.date)).unwrap_or_default(),
                orchard_shared::format_date_key(occurrence.date)
            );
        }

        let mut line = format!(
            "  [{:<7}] {:<14} {}",
            item.status.as_ref(),
            occurrence.kind.as_ref(),
            occurrence.title
        );
        if !occurrence.subtitle.is_empty() {
            line.push_str(&format!(" ({})", occurrence.subtitle));
        }
        if let Some(reason) = item.skipped_reason {
            line.push_str(&format!(" skipped: {reason}"));
        }
        if let Some(text) = &item.skipped_reason_text {
            line.push_str(&format!(" \"{text}\""));
        }
        println!("{line}\n      {}", item.selection_id);
    }

    let summary = Summary::of(items);
    println!(
        "\n{} to {}: {} expected orders, {} packs, {} deliveries",
        orchard_shared::format_date_key(range.start()),
        orchard_shared::format_date_key(range.end()),
        summary.expected_orders,
        summary.packs,
        summary.deliveries
    );
}

#[tracing::instrument(skip_all)]
pub async fn show(config: &orchard::Config, args: AgendaArgs) -> Result<()> {
    let range = args.range(crate::cli::today(config))?;
    let query = AgendaQuery {
        range,
        filters: args.filters(),
    };

    let command = crate::cli::command(config).await?;
    let snapshot = command.load(range).await?;
    let items = snapshot.agenda(&query);

    if args.json {
        let output = Output {
            start: range.start(),
            end: range.end(),
            summary: Summary::of(&items),
            items: &items,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(range, &items);
    }

    Ok(())
}
