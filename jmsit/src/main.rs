//! `jmsit`: run the JMS message-type interop suite against a broker.
//!
//! Stdout carries the per-case status lines and the final report; tracing
//! output goes to stderr (`RUST_LOG` overrides the default `info` filter).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use jmsit_config::{LoadContext, load};
use jmsit_core::{
    BuilderOptions, CommandBrokerProbe, DEFAULT_BROKER, SuiteConfig,
    TestSuiteDriver, TypeDomainTable, report,
};
use jmsit_model::MessageKind;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(
    name = "jmsit",
    version,
    about = "JMS message-type interoperability tests across AMQP client shims"
)]
struct Cli {
    /// Broker address the shims connect to
    #[arg(long, value_name = "ADDR:PORT", default_value = DEFAULT_BROKER)]
    broker: String,

    /// Message kind to leave out, e.g. JMS_MAPMESSAGE_TYPE (repeatable)
    #[arg(long = "exclude-type", value_name = "NAME")]
    exclude_types: Vec<MessageKind>,

    /// Shim to leave out of every pairing (repeatable)
    #[arg(long = "exclude-shim", value_name = "NAME")]
    exclude_shims: Vec<String>,

    /// Run only the case with this identifier (repeatable)
    #[arg(long = "case", value_name = "ID")]
    cases: Vec<String>,

    /// Print the selected case identifiers and exit without running them
    #[arg(long)]
    list: bool,

    /// Shim registry file (TOML or JSON)
    #[arg(long, value_name = "PATH")]
    shims: Option<PathBuf>,

    /// Per-process deadline, overriding the registry (e.g. 30s, 1m)
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Also generate application-property cases
    #[arg(long)]
    enable_properties: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    let loaded = load(&LoadContext::from_env(cli.shims.clone()))
        .context("failed to load shim registry")?;
    info!(source = ?loaded.source, shims = loaded.registry.shims.len(), "loaded shim registry");

    let registry = loaded.registry;
    let config = SuiteConfig {
        broker: cli.broker,
        timeout: cli.timeout.unwrap_or(registry.timeout),
        exclude_kinds: cli.exclude_types,
        exclude_shims: cli.exclude_shims,
        only_cases: cli.cases,
        builder: BuilderOptions {
            property_variants: cli.enable_properties,
        },
    };

    let table = TypeDomainTable::jms().with_skip_rules(registry.skips.clone());
    let mut driver = TestSuiteDriver::new(table, registry.handles());
    if let Some(command) = registry.broker_probe.clone() {
        driver =
            driver.with_probe(CommandBrokerProbe::new(command, registry.timeout));
    }

    if cli.list {
        for id in driver.case_ids(&config)? {
            println!("{id}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = driver
        .run(&config, |result| println!("{}", report::status_line(result)))
        .await?;
    print!("{}", report::render(&report));

    Ok(ExitCode::from(report.exit_code()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
