//! # Payroll CLI
//!
//! Console front end for the payroll service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payroll CLI                                      │
//! │                                                                         │
//! │  payroll [--backend B] <command> ───► PayrollService ───► store for B  │
//! │                                                                         │
//! │  Backends come from payroll.toml / PAYROLL_* environment variables.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! # Enter a record on the console and store it in SQLite
//! payroll --backend database add
//!
//! # Raise a salary and confirm the roster matches the database
//! payroll --backend database update Terisa 3000000
//! payroll --backend database sync Terisa
//!
//! # Copy the REST server's roster into the JSON Lines file
//! payroll --backend rest export
//! ```

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use payroll_core::{BackendKind, EmployeePayroll};
use payroll_service::{read_employee, PayrollConfig, PayrollService, PayrollServiceBuilder};

/// Employee payroll records across memory, file, database and REST backends
#[derive(Parser, Debug)]
#[command(name = "payroll")]
#[command(version)]
struct Cli {
    /// Backend to operate on (memory, file, database, rest); defaults to the configured one
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Path to payroll.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read an employee from the console and add it
    Add,
    /// List every record
    List,
    /// List records that have not been removed
    Active,
    /// List records that started between two dates (inclusive)
    Range {
        /// First start date, YYYY-MM-DD
        start: NaiveDate,
        /// Last start date, YYYY-MM-DD
        end: NaiveDate,
    },
    /// Average salary per gender
    Average,
    /// Set an employee's salary
    Update {
        name: String,
        salary: f64,
    },
    /// Remove employees by name
    Remove {
        name: String,
    },
    /// Number of records
    Count,
    /// Check an employee's record against the database
    Sync {
        name: String,
    },
    /// Write the backend's roster to the JSON Lines file
    Export,
    /// Check that every configured backend answers
    Health,
}

impl Commands {
    /// Backends the command talks to when run against `selected`.
    fn backends(&self, selected: BackendKind) -> Vec<BackendKind> {
        match self {
            Commands::Health => BackendKind::ALL.to_vec(),
            Commands::Sync { .. } => vec![selected, BackendKind::Database],
            Commands::Export => vec![selected, BackendKind::File],
            _ => vec![selected],
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PayrollConfig::load(cli.config).context("loading payroll configuration")?;
    let backend = cli.backend.unwrap_or_else(|| config.backend());
    info!(%backend, "Payroll CLI starting");

    let backends = cli.command.backends(backend);
    let mut service = PayrollServiceBuilder::from_config(&config, &backends)
        .await
        .context("connecting payroll backends")?
        .build();

    run(&mut service, backend, cli.command).await
}

async fn run(
    service: &mut PayrollService,
    backend: BackendKind,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Add => {
            let record = {
                let stdin = std::io::stdin();
                read_employee(stdin.lock(), std::io::stdout())?
            };
            let added = service.add(record, backend).await?;
            println!("Added {}", added);
        }

        Commands::List => {
            print_records(service.read_all(backend).await?);
        }

        Commands::Active => {
            print_records(service.read_active(backend).await?);
        }

        Commands::Range { start, end } => {
            service.read_all(backend).await?;
            print_records(service.read_by_date_range(backend, start, end).await?);
        }

        Commands::Average => {
            let averages = service.average_salary_by_gender(backend).await;
            if averages.is_empty() {
                println!("No data");
            }
            for (gender, average) in &averages {
                println!("{}: {:.2}", gender, average);
            }
        }

        Commands::Update { name, salary } => {
            service.read_all(backend).await?;
            if service.update_salary(&name, salary, backend).await? {
                println!("Updated {} to {:.2}", name, salary);
            } else {
                println!("No employee named {}", name);
            }
        }

        Commands::Remove { name } => {
            service.read_all(backend).await?;
            let removed = service.remove(&name, backend).await?;
            println!("Removed {} record(s) named {}", removed, name);
        }

        Commands::Count => {
            service.read_all(backend).await?;
            println!("{}", service.count_entries(backend).await?);
        }

        Commands::Sync { name } => {
            service.read_all(backend).await?;
            let in_sync = service.check_in_sync_with_backend(&name).await?;
            println!(
                "{} is {}",
                name,
                if in_sync { "in sync" } else { "out of sync" }
            );
        }

        Commands::Export => {
            service.read_all(backend).await?;
            service.write(BackendKind::File).await?;
            println!(
                "Exported {} record(s) to the payroll file",
                service.roster().len()
            );
        }

        Commands::Health => {
            for (kind, healthy) in service.health().await {
                println!("{:<9} {}", kind, if healthy { "ok" } else { "unreachable" });
            }
        }
    }

    Ok(())
}

fn print_records(records: &[EmployeePayroll]) {
    if records.is_empty() {
        println!("No employees");
    }
    for record in records {
        println!("{}", record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_commands_need_no_store() {
        let backends = Commands::List.backends(BackendKind::InMemory);
        assert_eq!(backends, vec![BackendKind::InMemory]);
    }

    #[test]
    fn test_cross_backend_commands() {
        assert_eq!(
            Commands::Sync { name: "Terisa".into() }.backends(BackendKind::Rest),
            vec![BackendKind::Rest, BackendKind::Database]
        );
        assert_eq!(
            Commands::Export.backends(BackendKind::Database),
            vec![BackendKind::Database, BackendKind::File]
        );
        assert_eq!(Commands::Health.backends(BackendKind::InMemory).len(), 4);
    }

    #[test]
    fn test_cli_parses_backend() {
        let cli = Cli::parse_from(["payroll", "--backend", "memory", "count"]);
        assert_eq!(cli.backend, Some(BackendKind::InMemory));
        assert!(matches!(cli.command, Commands::Count));
    }
}
