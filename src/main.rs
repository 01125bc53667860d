use azchaos::arm::auth::DEFAULT_AUTHORITY;
use azchaos::arm::client::DEFAULT_MANAGEMENT_ENDPOINT;
use azchaos::delay;
use azchaos::pipeline::{self, OperationSpec, RunConfig, Target};
use clap::{ArgGroup, Parser, ValueEnum};
use tracing::Level;

/// Chaos testing for Azure virtual machines
#[derive(Parser, Debug)]
#[command(name = "azchaos", version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["resource", "random_resource"])))]
struct Args {
    /// Directory (tenant) identifier
    #[arg(short = 't', long = "tenant")]
    tenant: String,

    /// Subscription identifier
    #[arg(short = 's', long = "subscription")]
    subscription: String,

    /// Service-principal client id
    #[arg(short = 'c', long = "client")]
    client: String,

    /// Service-principal secret
    #[arg(short = 'p', long = "password")]
    password: String,

    /// Target resource group
    #[arg(short = 'g', long = "resourcegrp")]
    resource_group: String,

    /// Explicit VM name to operate on
    #[arg(short = 'r', long = "resource")]
    resource: Option<String>,

    /// Select a VM at random from the resource group
    #[arg(short = 'a', long = "randomresource")]
    random_resource: bool,

    /// Operation to perform
    #[arg(short = 'o', long = "operation", value_enum)]
    operation: Operation,

    /// Regex filter for random selection
    #[arg(
        short = 'm',
        long = "resourcematch",
        requires = "random_resource",
        conflicts_with = "resource"
    )]
    resource_match: Option<String>,

    /// Seconds between stop and start for powercycle: a number or MIN-MAX range
    #[arg(short = 'd', long = "delay")]
    delay: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Azure AD authority host (sovereign clouds, testing)
    #[arg(long, hide = true, default_value = DEFAULT_AUTHORITY)]
    authority_url: String,

    /// Management endpoint base (sovereign clouds, testing)
    #[arg(long, hide = true, default_value = DEFAULT_MANAGEMENT_ENDPOINT)]
    management_url: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Operation {
    Start,
    Stop,
    Restart,
    Powercycle,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map CLI arguments to a pipeline config. Delay parsing happens here so
/// a malformed spec fails before any network call.
fn build_config(args: &Args) -> Result<RunConfig, azchaos::error::ChaosError> {
    let target = match &args.resource {
        Some(name) => Target::Explicit(name.clone()),
        None => Target::Random {
            pattern: args.resource_match.clone(),
        },
    };

    let operation = match args.operation {
        Operation::Start => OperationSpec::Start,
        Operation::Stop => OperationSpec::Stop,
        Operation::Restart => OperationSpec::Restart,
        Operation::Powercycle => OperationSpec::PowerCycle {
            delay_secs: delay::parse_delay(args.delay.as_deref(), &mut rand::rng())?,
        },
    };

    if args.delay.is_some() && !matches!(operation, OperationSpec::PowerCycle { .. }) {
        tracing::warn!("--delay is only meaningful with powercycle; ignoring it");
    }

    Ok(RunConfig {
        tenant_id: args.tenant.clone(),
        subscription_id: args.subscription.clone(),
        client_id: args.client.clone(),
        client_secret: args.password.clone(),
        resource_group: args.resource_group.clone(),
        target,
        operation,
        authority: args.authority_url.clone(),
        management_endpoint: args.management_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec![
            "azchaos", "-t", "tenant", "-s", "sub", "-c", "client", "-p", "secret", "-g", "rg",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn explicit_and_random_targets_are_mutually_exclusive() {
        assert!(parse(&["-o", "start", "-r", "vm1", "-a"]).is_err());
    }

    #[test]
    fn one_of_explicit_or_random_is_required() {
        assert!(parse(&["-o", "start"]).is_err());
    }

    #[test]
    fn match_pattern_requires_random_selection() {
        assert!(parse(&["-o", "start", "-r", "vm1", "-m", "^web-"]).is_err());
        assert!(parse(&["-o", "start", "-a", "-m", "^web-"]).is_ok());
    }

    #[test]
    fn unrecognized_operation_is_rejected() {
        assert!(parse(&["-o", "explode", "-r", "vm1"]).is_err());
    }

    #[test]
    fn powercycle_maps_delay_spec() {
        let args = parse(&["-o", "powercycle", "-r", "vm1", "-d", "5"]).unwrap();
        let config = build_config(&args).unwrap();
        assert!(matches!(
            config.operation,
            OperationSpec::PowerCycle { delay_secs: 5 }
        ));
    }

    #[test]
    fn malformed_delay_fails_before_the_pipeline() {
        let args = parse(&["-o", "powercycle", "-r", "vm1", "-d", "10-5"]).unwrap();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn powercycle_without_delay_uses_default() {
        let args = parse(&["-o", "powercycle", "-a"]).unwrap();
        let config = build_config(&args).unwrap();
        assert!(matches!(
            config.operation,
            OperationSpec::PowerCycle {
                delay_secs: delay::DEFAULT_DELAY_SECS
            }
        ));
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_level);

    let result = match build_config(&args) {
        Ok(config) => pipeline::run(&config).await,
        Err(e) => Err(e),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
