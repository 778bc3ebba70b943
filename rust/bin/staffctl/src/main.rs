//! `staffctl`: operator CLI for the staffdesk store.
//!
//! Usage:
//!   staffctl [--config <file>] [--data-dir <dir>] [-o table|json] <command>
//!
//! Commands: register, login, users, batches, import, export.
//!
//! Works directly on the redb file; there is no server in between.

mod commands;
mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use staffdesk_core::StoreConfig;
use staffdesk_staff::service::Registration;
use staffdesk_staff::{BatchStatus, Role, StaffService};
use tracing::debug;

use output::Output;

/// Staffdesk operator CLI.
#[derive(Parser, Debug)]
#[command(name = "staffctl", about = "Manage staffdesk users and batches", version)]
struct Cli {
    /// Path to a TOML store config (default: ./staffdesk.toml if present).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// redb database file (overrides the config file and --data-dir).
    #[arg(long = "db", global = true)]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register an admin account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Check credentials for a role and show the dashboard it opens.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: Role,
        /// Dashboard to open (default: the role's own).
        #[arg(long)]
        dashboard: Option<Role>,
    },

    /// Staff members, partitioned by role.
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Training batches.
    Batches {
        #[command(subcommand)]
        action: BatchesAction,
    },

    /// Replace a whole collection with the JSON array in a file.
    Import {
        collection: Collection,
        file: PathBuf,
    },

    /// Print a whole collection as a JSON array.
    Export { collection: Collection },
}

#[derive(Subcommand, Debug)]
enum UsersAction {
    /// List users, optionally one role only.
    List {
        #[arg(long)]
        role: Option<Role>,
        /// Free-text search (requires --role).
        #[arg(long, requires = "role")]
        search: Option<String>,
        /// active, inactive, on-leave or ALL.
        #[arg(long, requires = "role")]
        status: Option<String>,
        /// Domain or specialization, or ALL.
        #[arg(long, requires = "role")]
        category: Option<String>,
    },

    /// Add a user of the given role.
    Add {
        #[arg(long)]
        role: Role,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },

    /// Patch a user (JSON merge patch).
    Edit {
        #[arg(long)]
        role: Role,
        email: String,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a user.
    Rm {
        #[arg(long)]
        role: Role,
        email: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Category filter values for a role.
    Options {
        #[arg(long)]
        role: Role,
    },

    /// Role statistics, or the admin overview when no role is given.
    Stats {
        #[arg(long)]
        role: Option<Role>,
    },
}

#[derive(Subcommand, Debug)]
enum BatchesAction {
    /// List batches.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        /// scheduled, active, completed, cancelled or ALL.
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a batch.
    Create {
        #[arg(long = "json")]
        json_body: Option<String>,
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },

    /// Change a batch's status.
    Status { id: String, status: BatchStatus },

    /// Delete a batch.
    Rm {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Batch statistics plus upcoming and recently created batches.
    Stats {
        /// Reference day (default: today, local time).
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },

    /// Form choices and filter domains.
    Options,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Users,
    Batches,
}

impl Cli {
    /// Store config: the TOML file first, then command-line overrides.
    fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("staffdesk.toml"));
        let mut config = StoreConfig::load(&path)?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(db) = &self.db {
            config.db_path = Some(db.clone());
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.store_config()?;
    debug!("using database {}", config.resolve_db_path().display());
    let service = StaffService::open(&config)?;
    let out = cli.output;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let input = Registration {
                username,
                email,
                password,
            };
            commands::access::register(&service, input, out)?;
        }

        Commands::Login {
            email,
            password,
            role,
            dashboard,
        } => {
            commands::access::login(&service, &email, &password, role, dashboard, out)?;
        }

        Commands::Users { action } => match action {
            UsersAction::List {
                role,
                search,
                status,
                category,
            } => commands::users::list(&service, role, search, status, category, out)?,
            UsersAction::Add {
                role,
                json_body,
                file,
            } => {
                let body = commands::read_body(json_body, file)?;
                commands::users::add(&service, role, body, out)?;
            }
            UsersAction::Edit {
                role,
                email,
                json_body,
            } => {
                let patch = commands::parse_json(&json_body)?;
                commands::users::edit(&service, role, &email, &patch, out)?;
            }
            UsersAction::Rm { role, email, yes } => {
                if yes || commands::confirm()? {
                    commands::users::remove(&service, role, &email)?;
                }
            }
            UsersAction::Options { role } => commands::users::options(&service, role, out)?,
            UsersAction::Stats { role } => commands::users::stats(&service, role, out)?,
        },

        Commands::Batches { action } => match action {
            BatchesAction::List {
                search,
                domain,
                status,
            } => commands::batches::list(&service, search, domain, status, out)?,
            BatchesAction::Create { json_body, file } => {
                let body = commands::read_body(json_body, file)?;
                commands::batches::create(&service, body, out)?;
            }
            BatchesAction::Status { id, status } => {
                commands::batches::set_status(&service, &id, status, out)?;
            }
            BatchesAction::Rm { id, yes } => {
                if yes || commands::confirm()? {
                    commands::batches::remove(&service, &id)?;
                }
            }
            BatchesAction::Stats {
                today,
                limit,
                recent,
            } => {
                let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
                commands::batches::stats(&service, today, limit, recent, out)?;
            }
            BatchesAction::Options => commands::batches::options(&service, out)?,
        },

        Commands::Import { collection, file } => {
            let content = std::fs::read_to_string(&file)?;
            let n = commands::transfer::import(&service, collection, &content)?;
            println!("Imported {} records from {}.", n, file.display());
        }

        Commands::Export { collection } => {
            println!("{}", commands::transfer::export(&service, collection)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_role_and_output() {
        let cli = Cli::try_parse_from([
            "staffctl", "-o", "json", "users", "list", "--role", "trainer", "--search", "asha",
        ])
        .unwrap();
        assert_eq!(cli.output, Output::Json);
        match cli.command {
            Commands::Users {
                action: UsersAction::List { role, search, .. },
            } => {
                assert_eq!(role, Some(Role::Trainer));
                assert_eq!(search.as_deref(), Some("asha"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn search_requires_role() {
        assert!(Cli::try_parse_from(["staffctl", "users", "list", "--search", "x"]).is_err());
    }

    #[test]
    fn rejects_unknown_batch_status() {
        assert!(Cli::try_parse_from(["staffctl", "batches", "status", "1", "paused"]).is_err());
        assert!(Cli::try_parse_from(["staffctl", "batches", "status", "1", "active"]).is_ok());
    }

    #[test]
    fn parses_login_and_options() {
        let cli = Cli::try_parse_from([
            "staffctl", "login", "--email", "a@x.com", "--password", "pw", "--role", "analyst",
            "--dashboard", "ADMIN",
        ])
        .unwrap();
        match cli.command {
            Commands::Login { role, dashboard, .. } => {
                assert_eq!(role, Role::Analyst);
                assert_eq!(dashboard, Some(Role::Admin));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["staffctl", "register", "--email", "a@x.com"]).is_err());
        assert!(Cli::try_parse_from(["staffctl", "users", "options", "--role", "trainer"]).is_ok());
        assert!(Cli::try_parse_from(["staffctl", "batches", "options"]).is_ok());

        let cli = Cli::try_parse_from(["staffctl", "batches", "stats", "--recent", "2"]).unwrap();
        match cli.command {
            Commands::Batches {
                action: BatchesAction::Stats { limit, recent, .. },
            } => {
                assert_eq!(limit, 5);
                assert_eq!(recent, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staffdesk.toml");
        std::fs::write(&path, "data_dir = \"/srv/a\"\nusers_slot = \"people\"\n").unwrap();

        let config_arg = path.to_str().unwrap();
        let cli = Cli::try_parse_from([
            "staffctl", "--config", config_arg, "--data-dir", "/srv/b", "export", "users",
        ])
        .unwrap();
        let config = cli.store_config().unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/b")));
        assert_eq!(config.users_slot, "people");
        assert_eq!(config.resolve_db_path(), PathBuf::from("/srv/b/staffdesk.redb"));
    }
}
