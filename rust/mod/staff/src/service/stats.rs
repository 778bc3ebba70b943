//! Dashboard statistics.
//!
//! Everything here is derived on demand from the stores; nothing is
//! cached or persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use staffdesk_store::query::{self, aggregate_by, count_where, percent, to_values};

use crate::model::{BatchRecord, BatchStatus, Role, UserStatus};
use crate::service::StaffService;

/// Summary cards of one role's management page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffStats {
    pub role: Role,
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub inactive: usize,
    pub total_salary: f64,
    pub average_salary: f64,
    pub total_experience: f64,
    /// Sum of counsellors' `maxClients`; 0 for other roles.
    pub total_client_capacity: f64,
    /// Members per domain (trainers) or specialization (analysts, counsellors).
    pub distribution: BTreeMap<String, usize>,
    /// Counsellors per counseling mode; empty for other roles.
    pub mode_distribution: BTreeMap<String, usize>,
}

/// Admin landing page numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_users: usize,
    /// Users whose status is not `inactive`.
    pub active_users: usize,
    /// Every role, with 0 for roles that have no users.
    pub by_role: BTreeMap<String, usize>,
}

/// Batch dashboard numbers. Percentages are rounded and 0 when their
/// denominator is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub active: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Scheduled batches starting after the reference day.
    pub upcoming: usize,
    pub total_students: u64,
    pub total_capacity: u64,
    pub fill_rate: u32,
    pub average_batch_size: u64,
    pub completion_rate: u32,
    pub active_rate: u32,
    pub domain_distribution: BTreeMap<String, usize>,
}

impl StaffService {
    pub fn staff_stats(&self, role: Role) -> StaffStats {
        let members = to_values(&self.list_users(Some(role)));
        let total = members.len();
        let total_salary = query::sum(&members, "salary");

        StaffStats {
            role,
            total,
            active: count_where(&members, "status", UserStatus::Active.as_str()),
            on_leave: count_where(&members, "status", UserStatus::OnLeave.as_str()),
            inactive: count_where(&members, "status", UserStatus::Inactive.as_str()),
            total_salary,
            average_salary: query::average(&members, "salary"),
            total_experience: query::sum(&members, "experience"),
            total_client_capacity: match role {
                Role::Counsellor => query::sum(&members, "maxClients"),
                _ => 0.0,
            },
            distribution: role
                .category_field()
                .map(|field| aggregate_by(&members, field))
                .unwrap_or_default(),
            mode_distribution: match role {
                Role::Counsellor => aggregate_by(&members, "counselingMode"),
                _ => BTreeMap::new(),
            },
        }
    }

    pub fn overview(&self) -> Overview {
        let users = to_values(&self.users.load_all());
        let inactive = count_where(&users, "status", UserStatus::Inactive.as_str());
        let mut by_role: BTreeMap<String, usize> =
            Role::ALL.iter().map(|r| (r.as_str().to_string(), 0)).collect();
        by_role.extend(aggregate_by(&users, "role"));
        Overview {
            total_users: users.len(),
            active_users: users.len() - inactive,
            by_role,
        }
    }

    /// Batch statistics relative to `today`.
    pub fn batch_stats(&self, today: NaiveDate) -> BatchStats {
        let batches = self.batches.load_all();
        let values = to_values(&batches);
        let total = batches.len();

        let count = |status: BatchStatus| count_where(&values, "status", status.as_str());
        let active = count(BatchStatus::Active);
        let completed = count(BatchStatus::Completed);

        let total_students: u64 = batches
            .iter()
            .map(|b| u64::from(b.enrolled_students.unwrap_or(0)))
            .sum();
        let total_capacity: u64 = batches.iter().map(|b| u64::from(b.capacity.unwrap_or(0))).sum();

        let upcoming = batches
            .iter()
            .filter(|b| b.status == BatchStatus::Scheduled && starts_after(b, today))
            .count();

        BatchStats {
            total,
            active,
            scheduled: count(BatchStatus::Scheduled),
            completed,
            cancelled: count(BatchStatus::Cancelled),
            upcoming,
            total_students,
            total_capacity,
            fill_rate: percent(total_students as f64, total_capacity as f64),
            average_batch_size: if total == 0 {
                0
            } else {
                (total_students as f64 / total as f64).round() as u64
            },
            completion_rate: percent(completed as f64, total as f64),
            active_rate: percent(active as f64, total as f64),
            domain_distribution: aggregate_by(&values, "domain"),
        }
    }

    /// Batches starting after `today`, soonest first.
    pub fn upcoming_batches(&self, today: NaiveDate, limit: usize) -> Vec<BatchRecord> {
        let mut upcoming: Vec<BatchRecord> = self
            .batches
            .load_all()
            .into_iter()
            .filter(|b| starts_after(b, today))
            .collect();
        upcoming.sort_by_key(|b| b.start());
        upcoming.truncate(limit);
        upcoming
    }

    /// Most recently created batches first.
    pub fn recent_batches(&self, limit: usize) -> Vec<BatchRecord> {
        let mut recent = self.batches.load_all();
        // RFC 3339 timestamps in UTC sort lexicographically.
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        recent
    }
}

fn starts_after(batch: &BatchRecord, today: NaiveDate) -> bool {
    batch.start().is_some_and(|start| start > today)
}
