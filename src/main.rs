use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tour_planner::config::PlannerConfig;
use tour_planner::haversine::HaversineProvider;
use tour_planner::location::LocationCatalog;
use tour_planner::osrm::OsrmClient;
use tour_planner::traits::LegProvider;
use tour_planner::TourPlanner;

#[derive(Parser)]
#[command(about = "Closed tour over catalog locations with road geometry")]
struct Cli {
    /// Start location name
    #[arg(required_unless_present = "list")]
    start: Option<String>,

    /// Destination location names
    destinations: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use straight-line legs instead of querying OSRM
    #[arg(long)]
    offline: bool,

    /// Print the render plan as GeoJSON on stdout
    #[arg(long)]
    geojson: bool,

    /// List the catalog and exit
    #[arg(long)]
    list: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_path(path)?,
        None => PlannerConfig::default(),
    };
    let catalog = config.catalog()?;

    if cli.list {
        for name in catalog.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let start = cli.start.as_deref().unwrap_or_default();
    if cli.offline {
        let provider = HaversineProvider {
            precision: config.osrm.geometry_precision,
            ..HaversineProvider::default()
        };
        run(provider, &config, &catalog, start, &cli)
    } else {
        let client = OsrmClient::new(config.osrm.clone())?;
        run(client, &config, &catalog, start, &cli)
    }
}

fn run<P: LegProvider>(
    provider: P,
    config: &PlannerConfig,
    catalog: &LocationCatalog,
    start: &str,
    cli: &Cli,
) -> Result<(), Box<dyn Error>> {
    let planner = TourPlanner::new(provider, config);
    let calculation = planner.plan(catalog, start, cli.destinations.as_slice())?;

    println!("{}", calculation.plan.itinerary);
    if !calculation.assignment.is_single_tour() {
        eprintln!(
            "warning: the order splits into {} separate loops",
            calculation.assignment.cycles().len()
        );
    }
    if cli.geojson {
        println!("{}", serde_json::to_string_pretty(&calculation.plan.to_geojson())?);
    }

    Ok(())
}
