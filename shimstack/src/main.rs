//! ShimStack - inspect how services resolve for a test run
//!
//! Prints the backend every logical service resolves to in the configured
//! execution mode, or the baseline fixtures emulated stores start with.

use clap::{Parser, Subcommand};
use shimstack::{BackendSelector, ExecutionMode, Settings};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "shimstack")]
#[command(about = "Show backend routing and fixtures for emulated AWS tests", long_about = None)]
struct Args {
    /// Execution mode (mock, hybrid, aws); overrides TEST_ENVIRONMENT
    #[arg(long)]
    mode: Option<String>,

    /// Local emulator endpoint; overrides LOCALSTACK_ENDPOINT
    #[arg(long)]
    endpoint: Option<String>,

    /// Region for real services; overrides AWS_REGION
    #[arg(long)]
    region: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "SHIMSTACK_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route of every service
    Routes,
    /// Print the baseline secrets and parameters
    Fixtures {
        /// Show SecureString values instead of the mask
        #[arg(long)]
        decrypt: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("shimstack={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = Settings::load()?;
    if let Some(mode) = args.mode.as_deref() {
        settings = settings.with_mode(ExecutionMode::parse_or_default(Some(mode)));
    }
    if let Some(endpoint) = args.endpoint.as_deref() {
        settings = settings.with_local_endpoint(endpoint)?;
    }
    if let Some(region) = args.region {
        settings = settings.with_region(region);
    }

    info!(mode = %settings.mode, "Loaded settings");
    let selector = BackendSelector::new(settings);

    match args.command {
        Command::Routes => print_routes(&selector),
        Command::Fixtures { decrypt } => print_fixtures(&selector, decrypt)?,
    }

    Ok(())
}

fn print_routes(selector: &BackendSelector) {
    println!("mode: {}", selector.mode());
    for (service, route) in selector.routes() {
        match route {
            Some(route) => println!("{:<16}{}", service.as_str(), route),
            None => println!("{:<16}unsupported", service.as_str()),
        }
    }
}

fn print_fixtures(selector: &BackendSelector, decrypt: bool) -> anyhow::Result<()> {
    if !selector.mode().uses_emulation() {
        warn!(mode = %selector.mode(), "No emulated stores in this mode");
        return Ok(());
    }

    let secrets = selector.emulated_secrets()?;
    println!("secrets:");
    for name in secrets.list_secret_names() {
        let value = secrets.get_secret_value(&name)?;
        println!("  {} = {}", name, value.secret_string.unwrap_or_default());
    }

    let parameters = selector.emulated_parameters()?;
    println!("parameters:");
    for parameter in parameters.get_parameters_by_path("/", true, decrypt) {
        println!(
            "  {} ({}) = {}",
            parameter.name,
            parameter.parameter_type.as_str(),
            parameter.value
        );
    }

    Ok(())
}
