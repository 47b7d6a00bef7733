use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{PeriodReport, TransactionService};
use crate::domain::{
    complete_category_axis, compute_category_totals, compute_daily_balances, compute_totals,
    date_axis, expense_series, format_currency, format_date, format_signed_currency,
    income_series, parse_amount, Amount, Category, NewTransaction, Period, PeriodTotals,
    Transaction, TransactionPatch, TransactionType,
};

/// Kakeibo - Household Income & Expense Tracker
#[derive(Parser)]
#[command(name = "kakeibo")]
#[command(about = "A local-first household income and expense tracker")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "KAKEIBO_DATABASE", default_value = "kakeibo.db")]
    pub database: String,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an income or expense
    Add {
        /// Amount in whole currency units (e.g., "1000" or "1,000")
        amount: String,

        /// Category (e.g., salary, food, transport)
        #[arg(short, long)]
        category: String,

        /// Transaction type: income or expense (defaults to the category's type)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text description
        #[arg(long, default_value = "")]
        content: String,
    },

    /// List transactions for a month or a year
    List {
        /// Month to list (YYYY-MM, defaults to the current month)
        #[arg(long, conflicts_with = "year")]
        month: Option<String>,

        /// Year to list (YYYY)
        #[arg(long)]
        year: Option<String>,
    },

    /// Show a single transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Change fields of a recorded transaction
    Edit {
        /// Transaction ID
        id: String,

        #[arg(long)]
        amount: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete one or more transactions
    Delete {
        /// Transaction IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// List the available categories
    Categories,

    /// Export transactions to CSV or JSON
    Export {
        /// Format: csv or json
        #[arg(default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import transactions from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip rows identical to an existing transaction
        #[arg(long)]
        skip_duplicates: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Monthly totals, daily balances and category breakdown
    Month {
        /// Month (YYYY-MM, defaults to the current month)
        month: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Yearly totals with a per-month breakdown
    Year {
        /// Year (YYYY, defaults to the current year)
        year: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Income and expense per day
    Daily {
        /// Month (YYYY-MM, defaults to the current month)
        month: Option<String>,
    },

    /// Totals per category for one transaction type
    Categories {
        /// Month (YYYY-MM, defaults to the current month)
        month: Option<String>,

        /// Transaction type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Include categories without transactions
        #[arg(long)]
        all: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                TransactionService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                kind,
                date,
                content,
            } => {
                let mut service = TransactionService::connect(&self.database).await?;
                let amount = parse_amount(&amount)
                    .with_context(|| format!("Invalid amount '{}'", amount))?;
                let category = parse_category(&category)?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => today(),
                };

                let mut new = NewTransaction::new(date, amount, category).with_content(content);
                if let Some(kind) = kind {
                    new.kind = parse_type(&kind)?;
                }

                let transaction = service.add_transaction(new).await?;
                println!(
                    "Recorded {}: {} {} on {} ({})",
                    transaction.kind,
                    format_currency(transaction.amount),
                    transaction.category,
                    format_date(transaction.date),
                    transaction.id
                );
            }

            Commands::List { month, year } => {
                let service = TransactionService::connect(&self.database).await?;
                let period = match year {
                    Some(year) => parse_year_arg(Some(year))?,
                    None => parse_month_arg(month)?,
                };
                print_transactions(&period.select(service.transactions()));
            }

            Commands::Show { id } => {
                let service = TransactionService::connect(&self.database).await?;
                let t = service.get_transaction(&id)?;

                println!("Transaction: {}", t.id);
                println!("  Date:     {}", format_date(t.date));
                println!("  Type:     {}", t.kind);
                println!("  Category: {}", t.category);
                println!("  Amount:   {}", format_currency(t.amount));
                if !t.content.is_empty() {
                    println!("  Content:  {}", t.content);
                }
            }

            Commands::Edit {
                id,
                amount,
                kind,
                category,
                date,
                content,
            } => {
                let mut service = TransactionService::connect(&self.database).await?;
                let patch = build_patch(amount, kind, category, date, content)?;

                let updated = service.update_transaction(&id, patch).await?;
                println!(
                    "Updated {}: {} {} {} on {}",
                    updated.id,
                    updated.kind,
                    format_currency(updated.amount),
                    updated.category,
                    format_date(updated.date)
                );
            }

            Commands::Delete { ids } => {
                let mut service = TransactionService::connect(&self.database).await?;
                let deleted = service.delete_transactions(&ids).await?;
                println!("Deleted {} transaction(s)", deleted);
            }

            Commands::Report(report_cmd) => {
                let service = TransactionService::connect(&self.database).await?;
                run_report_command(&service, report_cmd)?;
            }

            Commands::Categories => {
                for kind in TransactionType::ALL {
                    let names: Vec<&str> = kind.categories().iter().map(|c| c.as_str()).collect();
                    println!("{:<8} {}", kind.as_str(), names.join(", "));
                }
            }

            Commands::Export { format, output } => {
                let service = TransactionService::connect(&self.database).await?;
                run_export_command(&service, &format, output.as_deref())?;
            }

            Commands::Import {
                input,
                dry_run,
                skip_duplicates,
            } => {
                let mut service = TransactionService::connect(&self.database).await?;
                run_import_command(&mut service, input.as_deref(), dry_run, skip_duplicates)
                    .await?;
            }
        }

        Ok(())
    }
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<12} {:<8} {:<14} {:>12}  {:<24} ID",
        "DATE", "TYPE", "CATEGORY", "AMOUNT", "CONTENT"
    );
    println!("{}", "-".repeat(110));
    for t in transactions {
        println!(
            "{:<12} {:<8} {:<14} {:>12}  {:<24} {}",
            format_date(t.date),
            t.kind.as_str(),
            t.category.as_str(),
            format_currency(t.amount),
            truncate(&t.content, 24),
            t.id
        );
    }

    let totals = compute_totals(transactions);
    println!("{}", "-".repeat(110));
    println!(
        "Income {}  Expense {}  Balance {}",
        format_currency(totals.income),
        format_currency(totals.expense),
        format_signed_currency(totals.balance)
    );
}

fn run_report_command(service: &TransactionService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Month { month, format } => {
            let report = service.period_report(parse_month_arg(month)?);
            print_report(&report, &format)?;
        }

        ReportCommands::Year { year, format } => {
            let report = service.period_report(parse_year_arg(year)?);
            print_report(&report, &format)?;
        }

        ReportCommands::Daily { month } => {
            let period = parse_month_arg(month)?;
            let selected = period.select(service.transactions());
            let daily = compute_daily_balances(&selected);

            println!("Daily Balances: {}", period);
            if daily.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            println!();
            println!("{:<12} {:>12} {:>12}", "DATE", "INCOME", "EXPENSE");
            println!("{}", "-".repeat(38));

            let rows = date_axis(&daily)
                .into_iter()
                .zip(income_series(&daily))
                .zip(expense_series(&daily));
            for ((date, income), expense) in rows {
                println!(
                    "{:<12} {:>12} {:>12}",
                    date,
                    format_currency(income),
                    format_currency(expense)
                );
            }
        }

        ReportCommands::Categories { month, kind, all } => {
            let period = parse_month_arg(month)?;
            let kind = parse_type(&kind)?;
            let selected = period.select(service.transactions());
            let totals = compute_category_totals(&selected, kind);

            let rows: Vec<(Category, i64)> = if all {
                complete_category_axis(&totals, kind)
            } else {
                totals.into_iter().collect()
            };

            println!("{} by category: {}", capitalize(kind.as_str()), period);
            println!();
            if rows.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            for (category, total) in rows {
                println!("  {:<16} {:>12}", category.as_str(), format_currency(total));
            }
        }
    }

    Ok(())
}

fn print_report(report: &PeriodReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        "csv" => write_report_csv(report, std::io::stdout())?,
        "table" => {
            println!("Report: {}", report.period);
            println!();
            println!("Income:   {:>15}", format_currency(report.totals.income));
            println!("Expense:  {:>15}", format_currency(report.totals.expense));
            println!("{}", "-".repeat(26));
            println!(
                "Balance:  {:>15}",
                format_signed_currency(report.totals.balance)
            );

            if report.is_empty() {
                println!();
                println!("No transactions found.");
                return Ok(());
            }

            if !report.monthly.is_empty() {
                println!();
                println!("{:<10} {:>12} {:>12} {:>12}", "MONTH", "INCOME", "EXPENSE", "BALANCE");
                for row in &report.monthly {
                    println!(
                        "{:<10} {:>12} {:>12} {:>12}",
                        row.month,
                        format_currency(row.totals.income),
                        format_currency(row.totals.expense),
                        format_signed_currency(row.totals.balance)
                    );
                }
            }

            for kind in TransactionType::ALL {
                let shares = report.categories(kind);
                if shares.is_empty() {
                    continue;
                }
                println!();
                println!("{} categories:", capitalize(kind.as_str()));
                for (i, share) in shares.iter().enumerate() {
                    println!(
                        "  {}. {:<16} {:>12} ({:.1}%)",
                        i + 1,
                        share.category.as_str(),
                        format_currency(share.total),
                        share.percentage
                    );
                }
            }
        }
        other => anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", other),
    }

    Ok(())
}

/// Long-format CSV: one `section,key,type,amount` row per figure shown in the
/// table view.
fn write_report_csv<W: std::io::Write>(report: &PeriodReport, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["section", "key", "type", "amount"])?;

    let mut rows: Vec<(&str, String, &str, Amount)> = Vec::new();
    push_totals(&mut rows, "total", &report.period, &report.totals);
    for row in &report.monthly {
        push_totals(&mut rows, "month", &row.month, &row.totals);
    }
    for row in &report.daily {
        let date = format_date(row.date);
        rows.push(("day", date.clone(), "income", row.income));
        rows.push(("day", date, "expense", row.expense));
    }
    for kind in TransactionType::ALL {
        for share in report.categories(kind) {
            let category = share.category.as_str().to_string();
            rows.push(("category", category, kind.as_str(), share.total));
        }
    }

    for (section, key, kind, amount) in rows {
        let amount = amount.to_string();
        csv.write_record([section, key.as_str(), kind, amount.as_str()])?;
    }

    csv.flush()?;
    Ok(())
}

fn push_totals<'a>(
    rows: &mut Vec<(&'a str, String, &'a str, Amount)>,
    section: &'a str,
    key: &str,
    totals: &PeriodTotals,
) {
    rows.push((section, key.to_string(), "income", totals.income));
    rows.push((section, key.to_string(), "expense", totals.expense));
    rows.push((section, key.to_string(), "balance", totals.balance));
}

fn run_export_command(
    service: &TransactionService,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_csv(writer)?,
        "json" => exporter.export_json(writer)?.transactions.len(),
        _ => anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format),
    };

    if output.is_some() {
        eprintln!("Exported {} transactions", count);
    }
    Ok(())
}

async fn run_import_command(
    service: &mut TransactionService,
    input: Option<&str>,
    dry_run: bool,
    skip_duplicates: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions {
        dry_run,
        skip_duplicates,
    };
    let result = Importer::new(service).import_csv(reader, options).await?;

    if dry_run {
        println!("Dry run complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}{}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default(),
                error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn parse_month_arg(month: Option<String>) -> Result<Period> {
    match month {
        Some(s) => {
            let period: Period = s.parse()?;
            anyhow::ensure!(period.is_month(), "Expected a month (YYYY-MM), got '{}'", s);
            Ok(period)
        }
        None => Ok(Period::month_of(today())),
    }
}

fn parse_year_arg(year: Option<String>) -> Result<Period> {
    match year {
        Some(s) => {
            let period: Period = s.parse()?;
            anyhow::ensure!(!period.is_month(), "Expected a year (YYYY), got '{}'", s);
            Ok(period)
        }
        None => Ok(Period::year_of(today())),
    }
}

fn parse_category(s: &str) -> Result<Category> {
    s.parse().map_err(|e| anyhow::anyhow!("{}. Run 'kakeibo categories' for the list", e))
}

/// Assemble an edit from raw flags. A new category alone also moves the
/// record to that category's type, matching how `add` derives the type.
fn build_patch(
    amount: Option<String>,
    kind: Option<String>,
    category: Option<String>,
    date: Option<String>,
    content: Option<String>,
) -> Result<TransactionPatch> {
    let category = category.as_deref().map(parse_category).transpose()?;
    let kind = match kind.as_deref().map(parse_type).transpose()? {
        Some(kind) => Some(kind),
        None => category.map(|c| c.kind()),
    };

    Ok(TransactionPatch {
        date: date.as_deref().map(parse_date).transpose()?,
        amount: amount
            .as_deref()
            .map(parse_amount)
            .transpose()
            .context("Invalid amount")?,
        kind,
        category,
        content,
    })
}

fn parse_type(s: &str) -> Result<TransactionType> {
    Ok(s.parse()?)
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_len.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
