use std::collections::HashSet;

use time::Date;

use crate::day::{is_weekday_index, next_weekday_index, weekday_index};
use crate::occurrence::{Kind, Occurrence, Origin};
use crate::range::DateRange;
use crate::schedule::{Customer, Plan, Run};

fn push_run(due: &mut Vec<(Kind, Option<u8>)>, run: &Run, day: u8) {
    if run.order_day == Some(day) {
        due.push((Kind::ExpectedOrder, Some(run.index)));
    }
    if run.resolved_pack_day() == Some(day) {
        due.push((Kind::Pack, Some(run.index)));
    }
    if run.resolved_deliver_day() == Some(day) {
        due.push((Kind::Delivery, Some(run.index)));
    }
}

/// Work kinds a plan produces on weekday `day`, with their run index.
fn due_on(plan: &Plan, day: u8) -> Vec<(Kind, Option<u8>)> {
    let mut due = Vec::new();

    match plan {
        Plan::WeGetOrder { first, second } => {
            push_run(&mut due, first, day);
            if let Some(second) = second {
                push_run(&mut due, second, day);
            }
        }
        Plan::TheyPutOrder {
            order_days,
            pack_days,
            deliver_days,
        } => {
            if order_days.contains(&day) {
                due.push((Kind::ExpectedOrder, None));
            }

            let pack_days = if pack_days.is_empty() {
                order_days
            } else {
                pack_days
            };
            if pack_days.contains(&day) {
                due.push((Kind::Pack, None));
            }

            let delivers = if deliver_days.is_empty() {
                order_days.iter().any(|d| next_weekday_index(*d) == day)
            } else {
                deliver_days.contains(&day)
            };
            if delivers {
                due.push((Kind::Delivery, None));
            }
        }
    }

    due
}

/// Expands every customer's schedule over `range` into dated occurrences.
///
/// Weekends never produce work. Candidates sharing the same customer, kind,
/// date and run index collapse into the first one emitted.
pub fn generate(customers: &[Customer], range: DateRange) -> Vec<Occurrence> {
    let active = customers
        .iter()
        .filter_map(|customer| customer.schedule.resolve().map(|s| (customer, s)))
        .collect::<Vec<_>>();

    let mut seen: HashSet<(&str, Kind, Date, Option<u8>)> = HashSet::new();
    let mut occurrences = Vec::new();

    for date in range.days() {
        let day = weekday_index(date);
        if !is_weekday_index(day) {
            continue;
        }

        for (customer, schedule) in &active {
            if !schedule.applies_on(date) {
                continue;
            }

            for (kind, run_index) in due_on(&schedule.plan, day) {
                if !seen.insert((customer.id.as_str(), kind, date, run_index)) {
                    continue;
                }

                occurrences.push(Occurrence {
                    kind,
                    date,
                    customer_id: Some(customer.id.to_owned()),
                    rep_id: customer.assigned_rep_id.to_owned(),
                    origin: Origin::Recurring { run_index },
                    title: customer.store_name.to_owned(),
                    subtitle: customer.contact_name.to_owned(),
                    order_mode: Some(schedule.plan.mode()),
                });
            }
        }
    }

    tracing::debug!(
        customers = customers.len(),
        active = active.len(),
        occurrences = occurrences.len(),
        "generated recurring occurrences"
    );

    occurrences
}
