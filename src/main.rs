use clap::{Parser, Subcommand};
use demand_replenishment::io::inventory::{load_forecasts, load_inventory};
use demand_replenishment::io::reporting;
use demand_replenishment::strategy::replenishment::join_inputs;
use demand_replenishment::{
    EvaluationOrchestrator, PlannerConfig, ReplenishmentOptimizer, Result, RunContext, SkuLocation,
};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "demand-replenishment")]
#[command(about = "Weekly demand forecasting and replenishment planning", long_about = None)]
struct Cli {
    /// Directory holding the processed weekly tables
    #[arg(long, global = true, default_value = "data/processed")]
    data_dir: PathBuf,

    /// Directory holding the demand stats artifact
    #[arg(long, global = true, default_value = "models/artifacts")]
    artifacts_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest the baselines on the time-based test window
    Evaluate {
        /// Seasonal period of the MASE scaling term
        #[arg(long, default_value = "1")]
        mase_period: usize,
    },

    /// Forecast demand for SKU-locations
    Forecast {
        /// SKU-location as STORE:PRODUCT (repeatable)
        #[arg(short, long = "pair", required = true, value_parser = parse_pair)]
        pairs: Vec<SkuLocation>,

        /// Number of weeks to forecast
        #[arg(long, default_value = "8")]
        horizon: usize,
    },

    /// Compute budget-capped replenishment orders
    Replenish {
        /// Target service level in (0, 1]
        #[arg(long, default_value = "0.95")]
        target_service: f64,

        /// Total spend capacity
        #[arg(long, default_value = "50000.0")]
        capacity: f64,

        /// Flat unit price
        #[arg(long, default_value = "50.0")]
        unit_price: f64,

        /// Output file (defaults to <data-dir>/replenishment_plan.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_pair(raw: &str) -> std::result::Result<SkuLocation, String> {
    match raw.split_once(':') {
        Some((store, product)) if !store.is_empty() && !product.is_empty() => {
            Ok(SkuLocation::new(store, product))
        }
        _ => Err(format!("expected STORE:PRODUCT, got '{}'", raw)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PlannerConfig {
        data_dir: cli.data_dir,
        artifacts_dir: cli.artifacts_dir,
        ..PlannerConfig::default()
    };

    let outcome = match cli.command {
        Commands::Evaluate { mase_period } => evaluate(PlannerConfig {
            mase_period,
            ..config
        }),
        Commands::Forecast { pairs, horizon } => forecast(&config, &pairs, horizon),
        Commands::Replenish {
            target_service,
            capacity,
            unit_price,
            output,
        } => replenish(
            PlannerConfig {
                target_service,
                capacity,
                unit_price,
                ..config
            },
            output,
        ),
    };

    if let Err(e) = outcome {
        error!(error = %e, "run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn evaluate(config: PlannerConfig) -> Result<()> {
    // 1. LOAD THE RUN CONTEXT
    let ctx = RunContext::for_evaluation(&config)?;

    // 2. BACKTEST
    let report = EvaluationOrchestrator::new(&ctx, config.mase_period).run()?;

    // 3. EXPORT RESULTS
    reporting::write_predictions(&config.predictions_path(), &report.rows)?;
    reporting::write_evaluation_report(&config.report_path(), &report.summary)?;

    // 4. PRINT SUMMARY
    let summary = &report.summary;
    println!("=== Forecast Evaluation (time-based test split) ===");
    println!(
        "Test rows: {}, unique SKU-locations: {}",
        summary.test_rows, summary.sku_locations
    );
    println!("\nGlobal WAPE (lower is better):");
    for (method, value) in &summary.global_wape {
        println!("  {:15}: {:.4}", method, value);
    }
    println!("\nTop {} worst SKU-locations by naive WAPE:", summary.worst_pairs.len());
    for score in &summary.worst_pairs {
        println!("  {}: naive_WAPE={:.4}", score.pair, score.naive_wape);
    }
    Ok(())
}

fn forecast(config: &PlannerConfig, pairs: &[SkuLocation], horizon: usize) -> Result<()> {
    let ctx = RunContext::for_inference(config)?;
    let result = ctx.forecast(pairs, horizon)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn replenish(config: PlannerConfig, output: Option<PathBuf>) -> Result<()> {
    // 1. INVENTORY POSITIONS
    let inventory = load_inventory(&config.inventory_path())?;

    // 2. NEXT-PERIOD FORECASTS
    // Use the ETL's forecast table when there is one; otherwise forecast one
    // week ahead for every inventory row.
    let forecasts = match load_forecasts(&config.forecast_baseline_path())? {
        Some(rows) => rows,
        None => {
            let ctx = RunContext::for_inference(&config)?;
            let pairs: Vec<SkuLocation> = inventory.iter().map(|i| i.sku_location()).collect();
            ctx.forecast(&pairs, 1)?.next_period()
        }
    };

    // 3. OPTIMIZE
    let rows = join_inputs(&inventory, &forecasts);
    let plan = ReplenishmentOptimizer::from_config(&config).plan(
        &rows,
        config.target_service,
        config.capacity,
    )?;

    // 4. EXPORT RESULTS
    let path = output.unwrap_or_else(|| config.plan_path());
    reporting::write_plan(&path, &plan)?;

    // 5. PRINT COST ANALYSIS
    println!("=== Replenishment Plan ===");
    println!(
        "Target service: {:.2}, capacity: ${:.2}",
        config.target_service, config.capacity
    );
    println!("SKU-locations: {}", plan.lines.len());
    println!("Total units: {}", plan.total_units());
    println!("Total cost: ${:.2}", plan.total_cost());
    if !plan.feasible {
        println!("Budget cannot cover the need floor; plan is the unconstrained need.");
    }
    println!("Plan written to {}", path.display());
    Ok(())
}
