use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fhir::ServiceRequest;
use orderbridge_core::config::{clock_policy_from_env_value, concept_systems_from_env_value};
use orderbridge_core::constants::{CLOCK_POLICY_ENV, CONCEPT_SYSTEMS_ENV};
use orderbridge_core::order::load_orders_file;
use orderbridge_core::{
    Collaborators, CoreConfig, InMemoryTaskIndex, ServiceRequestTranslator, StatusResolver,
};

#[derive(Parser)]
#[command(name = "orderbridge")]
#[command(about = "Translate EHR order records into FHIR ServiceRequests")]
struct Cli {
    /// Clock policy for batches: per-order or per-batch (overrides ORDERBRIDGE_CLOCK)
    #[arg(long, global = true)]
    clock: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate order records into a bundle of ServiceRequests
    Translate {
        /// YAML file holding a list of order records
        orders: PathBuf,
        /// YAML file holding a list of FHIR Task records
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// Evaluate statuses as of this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the derived status of each order
    Status {
        /// YAML file holding a list of order records
        orders: PathBuf,
        /// Evaluate statuses as of this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Main entry point for the orderbridge command line.
///
/// # Environment Variables
/// - `ORDERBRIDGE_CONCEPT_SYSTEMS`: extra `SOURCE=URL` concept mapping sources
/// - `ORDERBRIDGE_CLOCK`: `per-order` (default) or `per-batch`
/// - `RUST_LOG`: tracing filter (default directive `orderbridge=info`)
///
/// Results go to stdout, logs to stderr.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("orderbridge=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(
        std::env::var(CONCEPT_SYSTEMS_ENV).ok(),
        std::env::var(CLOCK_POLICY_ENV).ok(),
        cli.clock.clone(),
    )?;

    let stdout = std::io::stdout();
    run(cli.command, Arc::new(cfg), &mut stdout.lock())
}

/// Build the core configuration once at startup; the flag value wins over the environment.
fn resolve_config(
    concept_systems_env: Option<String>,
    clock_env: Option<String>,
    clock_flag: Option<String>,
) -> anyhow::Result<CoreConfig> {
    let concept_systems = concept_systems_from_env_value(concept_systems_env)?;
    let clock_policy = clock_policy_from_env_value(clock_flag.or(clock_env))?;
    Ok(CoreConfig::new(concept_systems, clock_policy)?)
}

fn run(command: Commands, cfg: Arc<CoreConfig>, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::Translate {
            orders,
            tasks,
            now,
            format,
        } => translate(&orders, tasks.as_deref(), now, format, cfg, out),
        Commands::Status { orders, now } => {
            let orders = load_orders_file(&orders)?;
            let now = now.unwrap_or_else(Utc::now);
            for order in &orders {
                writeln!(out, "{}\t{}", order.id, StatusResolver::resolve(order, now))?;
            }
            Ok(())
        }
    }
}

fn translate(
    orders: &Path,
    tasks: Option<&Path>,
    now: Option<DateTime<Utc>>,
    format: OutputFormat,
    cfg: Arc<CoreConfig>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let orders = load_orders_file(orders)?;
    let index = match tasks {
        Some(path) => InMemoryTaskIndex::from_yaml_file(path)?,
        None => InMemoryTaskIndex::default(),
    };
    tracing::info!(orders = orders.len(), tasks = index.len(), "translating orders");

    let collaborators = Collaborators::with_defaults(cfg.clone(), Arc::new(index));
    let translator = ServiceRequestTranslator::new(cfg, collaborators);
    let requests = match now {
        Some(now) => translator.translate_batch_at(&orders, now)?,
        None => translator.translate_batch(&orders)?,
    };

    let rendered = match format {
        OutputFormat::Json => ServiceRequest::render_bundle_json(&requests)?,
        OutputFormat::Yaml => ServiceRequest::render_bundle_yaml(&requests)?,
    };
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
