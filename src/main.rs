//! Property Returns CLI
//!
//! Runs the flip XIRR analysis or the ten-year rental pro forma and prints
//! the results as a console table.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use property_returns::assumptions::loader::{load_additional_cash_flows, load_investment, load_rental};
use property_returns::currency::{format_abbrev, format_amount};
use property_returns::export::{write_projection_csv_file, write_schedule_csv_file};
use property_returns::input::parse_decimal_input;
use property_returns::projection::{summarize_projection, ProjectionCalculator};
use property_returns::{analyze_investment, CurrencyCode, ExchangeRates, InvestmentAssumptions, RentalAssumptions};

#[derive(Parser)]
#[command(
    name = "property-returns",
    version,
    about = "XIRR and rental pro forma for villa and apartment investments"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Annualised return of a buy/flip deal
    Xirr {
        /// Investment assumptions as JSON (defaults to the sample villa bought today)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Extra cash flows as CSV (date,description,type,amount)
        #[arg(long)]
        flows: Option<PathBuf>,

        /// Write the cash-flow schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Ten-year rental projection
    Rental {
        /// Rental assumptions as JSON (defaults to the single-key villa)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Use the 18-key reference apartment instead of the villa
        #[arg(long, conflicts_with = "input")]
        apartment: bool,

        /// Write the yearly rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DisplayArgs {
    /// Display currency (IDR, USD, EUR, AUD, GBP, INR, CNY, AED, RUB)
    #[arg(long, default_value = "IDR", global = true)]
    currency: CurrencyCode,

    /// Override the IDR price of one unit of the display currency ("16,250" or "16250.5")
    #[arg(long, global = true, value_parser = parse_rate)]
    rate: Option<f64>,
}

fn parse_rate(text: &str) -> Result<f64, String> {
    match parse_decimal_input(text) {
        Some(rate) if rate > 0.0 => Ok(rate),
        _ => Err(format!("not a positive exchange rate: {text:?}")),
    }
}

impl DisplayArgs {
    fn rates(&self) -> ExchangeRates {
        match self.rate {
            Some(idr) => ExchangeRates::fallback().with_rate(self.currency, idr),
            None => ExchangeRates::fallback(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let rates = cli.display.rates();
    let currency = cli.display.currency;

    println!("Property Returns v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");

    match cli.command {
        Commands::Xirr { input, flows, csv } => run_xirr(input, flows, csv, currency, &rates),
        Commands::Rental { input, apartment, csv } => run_rental(input, apartment, csv, currency, &rates),
    }
}

fn run_xirr(
    input: Option<PathBuf>,
    flows: Option<PathBuf>,
    csv: Option<PathBuf>,
    currency: CurrencyCode,
    rates: &ExchangeRates,
) -> Result<()> {
    let mut assumptions = match &input {
        Some(path) => load_investment(path)?,
        None => InvestmentAssumptions::sample_villa(Local::now().date_naive()),
    };
    if let Some(path) = &flows {
        assumptions.additional_cash_flows.extend(load_additional_cash_flows(path)?);
    }

    let report = analyze_investment(&assumptions).context("XIRR analysis failed")?;
    let money = |v: f64| format_amount(v, currency, rates);

    if !report.project_name.is_empty() {
        println!("Project: {}", report.project_name);
    }
    if !report.location.is_empty() {
        println!("  Location: {}", report.location);
    }
    println!("  Purchase Price: {}", money(assumptions.total_price));
    println!("  Down Payment: {} ({:.1}%)", money(report.payment_plan.down_payment), assumptions.down_payment_percent);
    if report.payment_plan.installment_months > 0 {
        println!(
            "  Installments: {} x {}",
            report.payment_plan.installment_months,
            money(report.payment_plan.monthly_installment)
        );
    }
    if let Some(per_sqm) = report.price_per_sqm {
        println!("  Price per sqm: {}", money(per_sqm));
    }
    println!();

    println!("Cash-Flow Schedule ({} events):", report.schedule.len());
    println!("{:>10}  {:<28} {:>22} {:>22}", "Date", "Description", "Amount", "Cumulative");
    println!("{}", "-".repeat(86));
    let mut cumulative = 0.0;
    for event in &report.schedule {
        cumulative += event.amount;
        println!(
            "{:>10}  {:<28} {:>22} {:>22}",
            event.date,
            event.kind.to_string(),
            money(event.amount),
            money(cumulative)
        );
    }
    println!();

    let result = &report.result;
    println!("Returns:");
    println!("  XIRR: {:.2}% ({})", result.rate * 100.0, report.rating);
    println!("  Total Invested: {}", money(result.total_invested));
    println!("  Net Profit: {}", money(result.net_profit));
    println!("  Total ROI: {:.2}%", report.total_roi_pct);
    println!("  Hold Period: {} months", result.hold_period_months);
    println!("  Sale Proceeds: {} net of {}", money(report.exit.net_proceeds), money(report.exit.closing_costs));
    println!("  Market Risk: {}", report.market_risk);

    if let Some(path) = csv {
        write_schedule_csv_file(&report.schedule, &path)
            .with_context(|| format!("Unable to write schedule to {}", path.display()))?;
        println!("\nSchedule written to: {}", path.display());
    }

    Ok(())
}

fn run_rental(
    input: Option<PathBuf>,
    apartment: bool,
    csv: Option<PathBuf>,
    currency: CurrencyCode,
    rates: &ExchangeRates,
) -> Result<()> {
    let assumptions = match &input {
        Some(path) => load_rental(path)?,
        None if apartment => RentalAssumptions::reference_apartment(),
        None => RentalAssumptions::default_villa(),
    };

    let calculator = ProjectionCalculator::new(&assumptions).context("Rental projection failed")?;
    let rows = calculator.project();
    let summary = summarize_projection(&rows, assumptions.initial_investment);
    let short = |v: f64| format_abbrev(v, currency, rates);

    println!("Rental Projection ({} keys, investment {}):", assumptions.keys, short(assumptions.initial_investment));
    println!(
        "  Purchased {}, operations start {}",
        calculator.schedule().purchase(),
        calculator.schedule().start()
    );
    println!(
        "{:>4} {:>6} {:>6} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8}",
        "Year", "CalYr", "Factor", "Occ%", "ADR", "Revenue", "GOP", "Fees", "Profit", "ROI%"
    );
    println!("{}", "-".repeat(100));

    for row in &rows {
        println!(
            "{:>4} {:>6} {:>6.3} {:>7.2} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8.2}",
            row.year,
            row.calendar_year,
            row.operational_factor,
            row.occupancy,
            short(row.adr),
            short(row.total_revenue),
            short(row.gop),
            short(row.total_management_fees),
            short(row.take_home_profit),
            row.roi_after_management,
        );
    }
    println!();

    println!("Summary:");
    println!("  Total Revenue: {}", short(summary.total_revenue));
    println!("  Total Profit: {}", short(summary.total_profit));
    println!("  Avg Occupancy: {:.2}%", summary.avg_occupancy);
    println!("  Avg ADR: {}", short(summary.avg_adr));
    println!("  Avg Net Yield: {:.2}% ({})", summary.avg_roi_after_management, summary.grade);
    println!("  Avg GOP Margin: {:.2}%", summary.avg_gop_margin);
    println!("  Payback: {}", summary.payback);
    println!("  Profit Growth: {:.1}% ({})", summary.profit_growth_pct, summary.growth_profile);
    println!("  Risk: {}", summary.risk);

    if let Some(path) = csv {
        write_projection_csv_file(&rows, &path)
            .with_context(|| format!("Unable to write projection to {}", path.display()))?;
        println!("\nProjection written to: {}", path.display());
    }

    Ok(())
}
