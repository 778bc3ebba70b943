//! `staffctl users ...`

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;
use staffdesk_staff::service::UserQuery;
use staffdesk_staff::{Role, StaffService, UserRecord};

use crate::output::{print_json, render_pairs, render_table, Output};

/// Build a record of `role` from a JSON body. The body may repeat the
/// role but not contradict it.
pub fn user_from_body(role: Role, mut body: Value) -> Result<UserRecord> {
    let obj = body
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("User body must be a JSON object."))?;
    let given = obj.get("role").and_then(Value::as_str).map(str::to_string);
    if let Some(given) = given {
        if given.parse::<Role>().ok() != Some(role) {
            anyhow::bail!("Body role {} does not match --role {}.", given, role);
        }
    }
    obj.insert("role".to_string(), Value::String(role.as_str().to_string()));
    serde_json::from_value(body).map_err(|e| anyhow::anyhow!("Invalid user: {}", e))
}

fn user_rows(users: &[UserRecord]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| {
            vec![
                u.email().to_string(),
                u.role().to_string(),
                u.full_name().to_string(),
                u.status().to_string(),
                u.category().unwrap_or("-").to_string(),
            ]
        })
        .collect()
}

fn print_users(users: &[UserRecord], out: Output) -> Result<()> {
    match out {
        Output::Json => print_json(users),
        Output::Table => {
            if users.is_empty() {
                println!("No users found.");
            } else {
                let headers = ["EMAIL", "ROLE", "NAME", "STATUS", "CATEGORY"];
                println!("{}", render_table(&headers, &user_rows(users)));
            }
            Ok(())
        }
    }
}

fn print_distribution(title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for (value, n) in counts {
        println!("  {:30} {}", value, n);
    }
}

pub fn list(
    service: &StaffService,
    role: Option<Role>,
    search: Option<String>,
    status: Option<String>,
    category: Option<String>,
    out: Output,
) -> Result<()> {
    let users = match role {
        Some(role) => {
            let defaults = UserQuery::default();
            let query = UserQuery {
                text: search.unwrap_or(defaults.text),
                status: status.unwrap_or(defaults.status),
                category: category.unwrap_or(defaults.category),
            };
            service.search_users(role, &query)
        }
        None => service.list_users(None),
    };
    print_users(&users, out)
}

pub fn add(service: &StaffService, role: Role, body: Value, out: Output) -> Result<()> {
    let user = service.add_user(user_from_body(role, body)?)?;
    match out {
        Output::Json => print_json(&user),
        Output::Table => {
            println!("{} {} created (id {}).", role, user.email(), user.profile().id);
            Ok(())
        }
    }
}

pub fn edit(service: &StaffService, role: Role, email: &str, patch: &Value, out: Output) -> Result<()> {
    let user = service.edit_user(role, email, patch)?;
    match out {
        Output::Json => print_json(&user),
        Output::Table => {
            println!("{} {} updated.", role, user.email());
            Ok(())
        }
    }
}

pub fn remove(service: &StaffService, role: Role, email: &str) -> Result<()> {
    service.remove_user(role, email)?;
    println!("{} {} deleted.", role, email);
    Ok(())
}

/// Values for the role's category filter dropdown.
pub fn options(service: &StaffService, role: Role, out: Output) -> Result<()> {
    let options = service.category_options(role);
    match out {
        Output::Json => print_json(&options),
        Output::Table => {
            for option in &options {
                println!("{}", option);
            }
            Ok(())
        }
    }
}

pub fn stats(service: &StaffService, role: Option<Role>, out: Output) -> Result<()> {
    let Some(role) = role else {
        let overview = service.overview();
        return match out {
            Output::Json => print_json(&overview),
            Output::Table => {
                println!(
                    "{}",
                    render_pairs(&[
                        ("total users", overview.total_users.to_string()),
                        ("active users", overview.active_users.to_string()),
                    ])
                );
                print_distribution("by role", &overview.by_role);
                Ok(())
            }
        };
    };

    let stats = service.staff_stats(role);
    match out {
        Output::Json => print_json(&stats),
        Output::Table => {
            let mut pairs = vec![
                ("role", stats.role.to_string()),
                ("total", stats.total.to_string()),
                ("active", stats.active.to_string()),
                ("on leave", stats.on_leave.to_string()),
                ("inactive", stats.inactive.to_string()),
                ("total salary", format!("{:.0}", stats.total_salary)),
                ("average salary", format!("{:.0}", stats.average_salary)),
                ("total experience", format!("{}", stats.total_experience)),
            ];
            if role == Role::Counsellor {
                pairs.push(("client capacity", format!("{}", stats.total_client_capacity)));
            }
            println!("{}", render_pairs(&pairs));
            if let Some(field) = role.category_field() {
                print_distribution(field, &stats.distribution);
            }
            print_distribution("counselingMode", &stats.mode_distribution);
            Ok(())
        }
    }
}
