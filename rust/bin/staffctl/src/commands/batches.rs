//! `staffctl batches ...`

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value;
use staffdesk_staff::model::{DOMAIN_OPTIONS, DURATION_OPTIONS, TIMING_OPTIONS};
use staffdesk_staff::service::BatchQuery;
use staffdesk_staff::{BatchRecord, BatchStatus, StaffService};

use crate::output::{print_json, render_pairs, render_table, Output};

const HEADERS: [&str; 7] = ["ID", "CODE", "NAME", "DOMAIN", "STATUS", "START", "SEATS"];

fn batch_rows(batches: &[BatchRecord]) -> Vec<Vec<String>> {
    batches
        .iter()
        .map(|b| {
            let seats = match (b.enrolled_students, b.capacity) {
                (Some(e), Some(c)) => format!("{}/{}", e, c),
                (Some(e), None) => e.to_string(),
                (None, Some(c)) => format!("0/{}", c),
                (None, None) => "-".to_string(),
            };
            vec![
                b.id.clone(),
                b.batch_code.clone(),
                b.batch_name.clone(),
                b.domain.clone(),
                b.status.to_string(),
                b.start_date.clone().unwrap_or_else(|| "-".to_string()),
                seats,
            ]
        })
        .collect()
}

fn print_batches(batches: &[BatchRecord], out: Output) -> Result<()> {
    match out {
        Output::Json => print_json(batches),
        Output::Table => {
            if batches.is_empty() {
                println!("No batches found.");
            } else {
                println!("{}", render_table(&HEADERS, &batch_rows(batches)));
            }
            Ok(())
        }
    }
}

pub fn list(
    service: &StaffService,
    search: Option<String>,
    domain: Option<String>,
    status: Option<String>,
    out: Output,
) -> Result<()> {
    let defaults = BatchQuery::default();
    let query = BatchQuery {
        text: search.unwrap_or(defaults.text),
        domain: domain.unwrap_or(defaults.domain),
        status: status.unwrap_or(defaults.status),
    };
    print_batches(&service.search_batches(&query), out)
}

pub fn create(service: &StaffService, body: Value, out: Output) -> Result<()> {
    let batch: BatchRecord =
        serde_json::from_value(body).map_err(|e| anyhow::anyhow!("Invalid batch: {}", e))?;
    let batch = service.create_batch(batch)?;
    match out {
        Output::Json => print_json(&batch),
        Output::Table => {
            println!("batch {} created (id {}).", batch.batch_code, batch.id);
            Ok(())
        }
    }
}

pub fn set_status(service: &StaffService, id: &str, status: BatchStatus, out: Output) -> Result<()> {
    let batch = service.set_batch_status(id, status)?;
    match out {
        Output::Json => print_json(&batch),
        Output::Table => {
            println!("batch {} is now {}.", id, batch.status);
            Ok(())
        }
    }
}

pub fn remove(service: &StaffService, id: &str) -> Result<()> {
    service.delete_batch(id)?;
    println!("batch {} deleted.", id);
    Ok(())
}

/// Choices offered by the batch form, plus the filter's domain list
/// built from existing batches.
pub fn options(service: &StaffService, out: Output) -> Result<()> {
    let filter_domains = service.batch_domain_options();
    match out {
        Output::Json => print_json(&serde_json::json!({
            "domains": DOMAIN_OPTIONS,
            "timings": TIMING_OPTIONS,
            "durations": DURATION_OPTIONS,
            "filterDomains": filter_domains,
        })),
        Output::Table => {
            println!(
                "{}",
                render_pairs(&[
                    ("domains", DOMAIN_OPTIONS.join(", ")),
                    ("timings", TIMING_OPTIONS.join(", ")),
                    ("durations", DURATION_OPTIONS.join(", ")),
                    ("filter domains", filter_domains.join(", ")),
                ])
            );
            Ok(())
        }
    }
}

/// Batch statistics, the next `limit` upcoming batches and the `recent`
/// most recently created ones.
pub fn stats(
    service: &StaffService,
    today: NaiveDate,
    limit: usize,
    recent: usize,
    out: Output,
) -> Result<()> {
    let stats = service.batch_stats(today);
    let upcoming = service.upcoming_batches(today, limit);
    let latest = service.recent_batches(recent);

    match out {
        Output::Json => print_json(&serde_json::json!({
            "stats": stats,
            "upcoming": upcoming,
            "recent": latest,
        })),
        Output::Table => {
            println!(
                "{}",
                render_pairs(&[
                    ("total", stats.total.to_string()),
                    ("active", stats.active.to_string()),
                    ("scheduled", stats.scheduled.to_string()),
                    ("completed", stats.completed.to_string()),
                    ("cancelled", stats.cancelled.to_string()),
                    ("upcoming", stats.upcoming.to_string()),
                    ("students", format!("{} / {}", stats.total_students, stats.total_capacity)),
                    ("fill rate", format!("{}%", stats.fill_rate)),
                    ("avg batch size", stats.average_batch_size.to_string()),
                    ("completion rate", format!("{}%", stats.completion_rate)),
                    ("active rate", format!("{}%", stats.active_rate)),
                ])
            );
            if !stats.domain_distribution.is_empty() {
                println!();
                println!("domains:");
                for (domain, n) in &stats.domain_distribution {
                    println!("  {:30} {}", domain, n);
                }
            }
            if !upcoming.is_empty() {
                println!();
                println!("upcoming after {}:", today);
                println!("{}", render_table(&HEADERS, &batch_rows(&upcoming)));
            }
            if !latest.is_empty() {
                println!();
                println!("recently created:");
                println!("{}", render_table(&HEADERS, &batch_rows(&latest)));
            }
            Ok(())
        }
    }
}
