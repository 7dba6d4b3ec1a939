use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use car_catalog::{run, PipelineConfig};

#[derive(Parser)]
#[command(name = "car-catalog", version)]
#[command(about = "Join a cars XML with a brand release-date CSV, then filter, sort and render")]
struct Cli {
    /// Path to the cars XML file (type / model / prices per <car>)
    #[arg(long, env = "CAR_CATALOG_XML")]
    xml: PathBuf,

    /// Path to the brand release-date CSV file (brand,MM/DD/YYYY)
    #[arg(long, env = "CAR_CATALOG_CSV")]
    csv: PathBuf,

    /// Filter: 'brand-price' <brand>,<minPrice>,<maxPrice>
    /// or 'brand-release' <brand>,<yyyy-MM-dd|yyyy,dd,MM>
    #[arg(long, num_args = 2, value_names = ["TYPE", "VALUE"])]
    filter: Option<Vec<String>>,

    /// Sort: 'year', 'price', 'suv-eur', 'sedan-jpy', 'truck-usd'
    #[arg(long)]
    sort: Option<String>,

    /// Output: 'table', 'json', 'xml'; anything else prints one line per car
    #[arg(long, default_value = "table")]
    output: String,

    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.xml, self.csv).with_output(&self.output);

        if let Some([kind, value]) = self.filter.as_deref() {
            config = config.with_filter(kind, value);
        }
        if let Some(sort) = &self.sort {
            config = config.with_sort(sort);
        }

        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let config = cli.into_config();
    debug!("Running with {:?}", config);

    let output = run(&config).with_context(|| {
        format!(
            "Failed to process {} and {}",
            config.xml_path.display(),
            config.csv_path.display()
        )
    })?;

    print!("{}", output);
    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered output
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}
