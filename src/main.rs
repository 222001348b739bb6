//! Sheetboard CLI
//!
//! Command-line interface for Sheetboard:
//! - Print balances, monthly aggregates and expenses
//! - List selectable periods
//! - Summarize a month or quarter
//! - Generate a config file
//!
//! Rows come from local CSV exports (`--transactions`, `--revenue`) or, without
//! them, from the spreadsheet in the config.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sheetboard::config::{generate_default_config, Config};
use sheetboard::ledger::{self, DashboardFilter, Granularity};
use sheetboard::sheets::{FileSource, RowSource, SheetsClient};
use sheetboard::{RevenueRow, TransactionRow};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sheetboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Financial dashboard over a transaction and revenue spreadsheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Transaction sheet CSV export (skips the remote spreadsheet)
    #[arg(long, global = true)]
    pub transactions: Option<PathBuf>,

    /// Revenue sheet CSV export
    #[arg(long, global = true)]
    pub revenue: Option<PathBuf>,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Rows(RowCommand),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Commands that read both sheets
#[derive(Subcommand)]
pub enum RowCommand {
    /// Running balance per date
    Balances {
        /// Last balance of each month instead
        #[arg(long)]
        monthly: bool,
    },

    /// Inflow, outflow and revenue per month
    Monthly,

    /// Selectable months and quarters
    Periods,

    /// Expense per calendar month
    Expenses,

    /// Totals for a period, or for everything
    Summary {
        /// month or quarter
        #[arg(short, long, default_value = "month")]
        granularity: String,
        /// Period key, e.g. 2024-03 or 2024-Q1
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Every view as one JSON document
    Dashboard {
        #[arg(short, long, default_value = "month")]
        granularity: String,
        #[arg(short, long)]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table and JSON output stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json = match cli.format.as_str() {
        "json" => true,
        "table" => false,
        other => bail!("Unknown format: {}. Use table or json", other),
    };

    let command = match &cli.command {
        Commands::Config { output } => return write_config(output.as_deref()),
        Commands::Rows(command) => command,
    };

    let (transactions, revenue) = load_rows(&cli).await?;
    tracing::info!(
        transactions = transactions.len(),
        revenue = revenue.len(),
        "Loaded sheets"
    );

    match command {
        RowCommand::Balances { monthly: false } => {
            let points = ledger::daily_balances(&transactions);
            if json {
                print_json(&points)?;
            } else {
                print_pairs(
                    "Date",
                    "Balance",
                    points.iter().map(|p| (p.date.as_str(), p.balance)),
                );
            }
        }

        RowCommand::Balances { monthly: true } => {
            let points = ledger::monthly_balances(&transactions);
            if json {
                print_json(&points)?;
            } else {
                print_pairs(
                    "Month",
                    "Balance",
                    points.iter().map(|p| (p.month.as_str(), p.balance)),
                );
            }
        }

        RowCommand::Monthly => {
            let months = ledger::monthly_aggregates(&transactions, Some(&revenue[..]));
            if json {
                print_json(&months)?;
            } else if months.is_empty() {
                println!("No dated transactions");
            } else {
                println!(
                    "{:<10} {:>15} {:>15} {:>15} {:>15}",
                    "Month", "Inflow", "Outflow", "Net", "Revenue"
                );
                println!("{}", "-".repeat(74));
                for m in &months {
                    println!(
                        "{:<10} {:>15} {:>15} {:>15} {:>15}",
                        m.period_key,
                        format_amount(m.inflow),
                        format_amount(m.outflow),
                        format_amount(m.net_balance),
                        m.revenue.map(format_amount).unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        RowCommand::Periods => {
            let options = ledger::period_options(&transactions);
            if json {
                print_json(&options)?;
            } else {
                println!("Months:   {}", options.months.join(", "));
                println!("Quarters: {}", options.quarters.join(", "));
            }
        }

        RowCommand::Expenses => {
            let months = ledger::monthly_expenses(&transactions);
            if json {
                print_json(&months)?;
            } else {
                print_pairs(
                    "Month",
                    "Expense",
                    months.iter().map(|m| (m.month.as_str(), m.expense)),
                );
                let total = ledger::total_expense(&months);
                println!("{}", "-".repeat(28));
                println!("{:<12} {:>15}", "Total", format_amount(total));
            }
        }

        RowCommand::Summary {
            granularity,
            period,
        } => {
            let filter = build_filter(granularity, period.clone())?;
            let summary = ledger::period_summary(&transactions, &filter);
            if json {
                print_json(&summary)?;
            } else {
                let label = filter.active_period().unwrap_or("all");
                println!("Period:       {} ({})", label, filter.granularity);
                println!("Transactions: {}", summary.transaction_count);
                println!("Inflow:       {:>15}", format_amount(summary.total_inflow));
                println!("Outflow:      {:>15}", format_amount(summary.total_outflow));
                println!("Net:          {:>15}", format_amount(summary.net_balance));
            }
        }

        RowCommand::Dashboard {
            granularity,
            period,
        } => {
            let filter = build_filter(granularity, period.clone())?;
            let snapshot = ledger::DashboardSnapshot::build(&transactions, &revenue, &filter);
            print_json(&snapshot)?;
        }
    }

    Ok(())
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Fetch both sheets from files or the configured spreadsheet
async fn load_rows(cli: &Cli) -> anyhow::Result<(Vec<TransactionRow>, Vec<RevenueRow>)> {
    let source: Box<dyn RowSource> = match &cli.transactions {
        Some(path) => Box::new(FileSource::new(path, cli.revenue.clone())),
        None => {
            if cli.revenue.is_some() {
                bail!("--revenue requires --transactions");
            }
            let config = load_config(cli.config.as_deref())?;
            Box::new(SheetsClient::new(config.sheets).context("Invalid sheets configuration")?)
        }
    };

    tracing::debug!(source = source.name(), "Fetching sheets");
    let (transactions, revenue) =
        tokio::try_join!(source.fetch_transactions(), source.fetch_revenue())
            .with_context(|| format!("Failed to load sheets from {}", source.name()))?;

    Ok((transactions, revenue))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_with_env(path)?),
        None => Ok(Config::load_default()),
    }
}

fn build_filter(granularity: &str, period: Option<String>) -> anyhow::Result<DashboardFilter> {
    let granularity: Granularity = granularity.parse().map_err(anyhow::Error::msg)?;
    Ok(DashboardFilter {
        granularity,
        selected_period: period.filter(|p| !p.is_empty()),
        ..Default::default()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_pairs<'a>(label: &str, value: &str, rows: impl Iterator<Item = (&'a str, i64)>) {
    println!("{:<12} {:>15}", label, value);
    println!("{}", "-".repeat(28));

    let mut any = false;
    for (key, amount) in rows {
        println!("{:<12} {:>15}", key, format_amount(amount));
        any = true;
    }
    if !any {
        println!("No data");
    }
}

/// Format with thousands separators, e.g. -1,234,567
fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if amount < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(-1234567), "-1,234,567");
    }

    #[test]
    fn test_build_filter() {
        let filter = build_filter("quarter", Some("2024-Q1".to_string())).unwrap();
        assert_eq!(filter.granularity, Granularity::Quarter);
        assert_eq!(filter.active_period(), Some("2024-Q1"));

        assert!(build_filter("daily", None).is_err());
    }

    #[test]
    fn test_cli_parses_global_args() {
        let cli = Cli::try_parse_from([
            "sheetboard",
            "summary",
            "--period",
            "2024-03",
            "--transactions",
            "tx.csv",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.transactions, Some(PathBuf::from("tx.csv")));
        assert_eq!(cli.format, "json");
        assert!(matches!(
            cli.command,
            Commands::Rows(RowCommand::Summary { period: Some(_), .. })
        ));
    }

    #[test]
    fn test_cli_parses_config_command() {
        let cli = Cli::try_parse_from(["sheetboard", "config", "--output", "out.toml"]).unwrap();

        match cli.command {
            Commands::Config { output } => assert_eq!(output, Some(PathBuf::from("out.toml"))),
            Commands::Rows(_) => panic!("expected config command"),
        }
    }

    #[test]
    fn test_cli_parses_row_command() {
        let cli = Cli::try_parse_from(["sheetboard", "balances", "--monthly"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Rows(RowCommand::Balances { monthly: true })
        ));
    }

    #[test]
    fn test_write_config_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        write_config(Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[sheets]"));
    }
}
