//! Property Projection CLI
//!
//! Command-line interface for projecting a single scenario

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use property_projection::assumptions::{check_ownership, load_scenario};
use property_projection::projection::{ProjectionConfig, ProjectionEngine, YearProjection};
use property_projection::tax::{load_tax_schedule, MedicareLevy, TaxSchedule};

/// Depreciation model and its matching horizon
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    /// 40 years, diminishing seed-based depreciation
    DiminishingSeed,
    /// 30 years, building/plant split depreciation
    BuildingPlantSplit,
}

#[derive(Debug, Parser)]
#[command(name = "property_projection", version, about = "Project a property investment scenario")]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Depreciation model (also sets the default horizon)
    #[arg(long, value_enum)]
    model: Model,

    /// Override the model's projection horizon in years
    #[arg(long)]
    years: Option<u32>,

    /// First year to print
    #[arg(long, default_value_t = 0)]
    from: u32,

    /// Last year to print
    #[arg(long, default_value_t = 10)]
    to: u32,

    /// CSV tax bracket table (threshold,rate); defaults to the built-in resident table
    #[arg(long)]
    tax_table: Option<PathBuf>,

    /// Income above which the medicare levy applies to the whole income
    #[arg(long)]
    medicare_threshold: Option<f64>,

    /// Write the full series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let assumptions = load_scenario(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;

    check_ownership(&args.scenario.display().to_string(), &assumptions.ownership);

    let tax = match &args.tax_table {
        Some(path) => load_tax_schedule(path).with_context(|| format!("loading tax table {}", path.display()))?,
        None => TaxSchedule::australian_resident(),
    };
    let tax = match args.medicare_threshold {
        Some(threshold) => {
            let medicare = MedicareLevy {
                threshold,
                ..tax.medicare()
            };
            tax.with_medicare(medicare)
        }
        None => tax,
    };

    let mut config = match args.model {
        Model::DiminishingSeed => ProjectionConfig::diminishing_seed(),
        Model::BuildingPlantSplit => ProjectionConfig::building_plant_split(),
    };
    if let Some(years) = args.years {
        config = config.with_horizon(years);
    }

    let engine = ProjectionEngine::with_tax(config, tax);
    let result = engine.project(&assumptions);

    println!("Scenario: {}", args.scenario.display());
    println!("  Property value: ${:.2}", assumptions.property_value);
    println!("  Main loan:      ${:.2}", assumptions.main_loan.opening_balance);
    if let Some(equity) = &assumptions.equity_loan {
        println!("  Equity loan:    ${:.2}", equity.opening_balance);
    }
    println!();

    println!(
        "{:>4} {:>12} {:>14} {:>14} {:>12} {:>12} {:>12} {:>14} {:>14}",
        "Year", "Rent", "Value", "Debt", "Interest", "Taxable", "TaxBenefit", "CashFlow", "Equity"
    );
    println!("{}", "-".repeat(118));
    for row in result.slice(args.from, args.to) {
        println!(
            "{:>4} {:>12.2} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2}",
            row.year,
            row.rental_income,
            row.property_value,
            row.total_debt(),
            row.total_interest,
            row.taxable_income,
            row.tax_benefit,
            row.after_tax_cash_flow,
            row.property_equity,
        );
    }

    if let Some(path) = &args.csv {
        write_csv(path, &result.years).with_context(|| format!("writing {}", path.display()))?;
        println!("\nFull results written to: {}", path.display());
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Horizon:                {} years", summary.horizon_years);
    println!("  Weekly cash flow (yr1): ${:.2}", summary.weekly_cash_flow_year_1);
    println!("  Gross rental yield:     {:.2}%", summary.gross_rental_yield);
    println!("  Cumulative tax savings: ${:.2}", summary.cumulative_tax_savings);
    println!("  Cumulative cash flow:   ${:.2}", summary.final_cumulative_cash_flow);
    println!("  Final equity:           ${:.2}", summary.final_equity);
    println!("  Total return:           ${:.2}", summary.total_return);
    match summary.total_roi {
        Some(roi) => println!("  Total ROI:              {:.2}%", roi),
        None => println!("  Total ROI:              n/a (no upfront outlay)"),
    }
    match summary.irr {
        Some(irr) => println!("  IRR:                    {:.2}%", irr * 100.0),
        None => println!("  IRR:                    n/a"),
    }

    Ok(())
}

fn write_csv(path: &Path, rows: &[YearProjection]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
