use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use freight_cost_calculator::{
    domain::{compute_cost, CostResult, FreightError, LoadType, ShipmentRequest, TransportMode},
    infra::catalog_store::{load_or_default, CatalogError},
    util::version::{version_label, APP_NAME, APP_VERSION, GIT_TAG},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Sea,
    Air,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoadArg {
    Fcl,
    Lcl,
}

/// Freight and landed-cost calculator for sea and air shipments.
#[derive(Debug, Parser)]
#[command(name = "freight-calc", version = GIT_TAG.unwrap_or(APP_VERSION), about)]
struct Cli {
    #[arg(long, value_enum, default_value_t = ModeArg::Sea)]
    mode: ModeArg,
    #[arg(long, value_enum, default_value_t = LoadArg::Fcl)]
    load: LoadArg,
    /// Gross weight in kg.
    #[arg(long)]
    weight: f64,
    /// Volume in CBM.
    #[arg(long)]
    volume: f64,
    /// Container type for single-container FCL pricing, e.g. "40' HC".
    #[arg(long)]
    container: Option<String>,
    /// Only consider refrigerated containers.
    #[arg(long)]
    reefer: bool,
    /// Declared goods value in foreign currency.
    #[arg(long, default_value_t = 0.0)]
    value: f64,
    /// Number of units the landed cost is spread over.
    #[arg(long, default_value_t = 1)]
    quantity: u64,
    /// Search for the cheapest container mix (sea FCL only).
    #[arg(long)]
    optimize: bool,
    /// Rate catalog JSON; defaults to the config directory or built-in rates.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> ShipmentRequest {
        ShipmentRequest {
            gross_weight_kg: self.weight,
            volume_cbm: self.volume,
            mode: match self.mode {
                ModeArg::Sea => TransportMode::Sea,
                ModeArg::Air => TransportMode::Air,
            },
            load_type: match self.load {
                LoadArg::Fcl => LoadType::Fcl,
                LoadArg::Lcl => LoadType::Lcl,
            },
            chosen_container_type: self.container.clone(),
            reefer_required: self.reefer,
            foreign_value: self.value,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Freight(#[from] FreightError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let catalog = load_or_default(cli.catalog.as_deref())?;
    let request = cli.request();
    let result = compute_cost(&request, &catalog, cli.optimize)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&request, &result);
    }
    Ok(())
}

fn print_report(request: &ShipmentRequest, result: &CostResult) {
    println!("{} {}", APP_NAME, version_label());
    println!(
        "{} {} | {:.0} kg | {:.2} CBM",
        request.mode.label(),
        request.load_type.label(),
        request.gross_weight_kg,
        request.volume_cbm
    );
    if request.mode == TransportMode::Air {
        println!("Chargeable weight  {:>12.2}", result.chargeable_weight);
    }

    if let Some(mix) = &result.combination {
        let status = if mix.feasible { "" } else { " (best effort, does not cover load)" };
        println!("Containers{status}");
        for (type_id, count) in &mix.counts {
            println!("  {count:>4} x {type_id}");
        }
        println!(
            "  capacity {:.2} CBM / {:.0} kg",
            mix.total_volume, mix.total_weight
        );
    }

    println!("Freight            {:>12.2}", result.freight_cost);
    println!("Goods value        {:>12.2}", result.local_value);
    for line in &result.charge_lines {
        println!("  {:<17}{:>12.2}", line.name, line.amount);
    }
    println!("Bank charges       {:>12.2}", result.bank_charges);
    println!("Other charges      {:>12.2}", result.other_charges);
    println!("Total              {:>12.2}", result.total_cost);
    println!("Per unit           {:>12.2}", result.unit_cost);
}
