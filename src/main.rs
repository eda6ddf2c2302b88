//! bluegreen-hook: ECS blue/green deployment test hook.
//!
//! This is the binary entry point. It initializes tracing, loads configuration from
//! an optional TOML file and the environment, builds the probe client once, and then
//! either serves invocations from the Lambda runtime or runs a single check.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bluegreen_hook::config::DEFAULT_LOG_FILTER;
use bluegreen_hook::{function_handler, AppConfig, HookResponse, LogFormat, Prober};

/// bluegreen-hook: gate an ECS blue/green rollout on the green target's health
#[derive(Parser, Debug)]
#[command(name = "bluegreen-hook", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "bluegreen_hook=debug")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format, overriding the configuration file
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve hook invocations from the Lambda runtime (default)
    Lambda,
    /// Probe once, print the hook response and exit with its status
    Check {
        /// Load balancer hostname, overriding ALB_DNS_NAME
        #[arg(short, long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, lambda_runtime::Error> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    match args.command.unwrap_or(Command::Lambda) {
        Command::Lambda => {
            let prober = Prober::new(&config.probe)?;
            tracing::info!(
                endpoint = prober.config().endpoint().unwrap_or("<unset>"),
                connect_timeout_secs = prober.config().connect_timeout_seconds,
                read_timeout_secs = prober.config().read_timeout_seconds,
                "Starting Lambda hook runtime"
            );

            let prober = &prober;
            lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
                function_handler(prober, event).await
            }))
            .await?;

            Ok(ExitCode::SUCCESS)
        }
        Command::Check { endpoint } => {
            if let Some(endpoint) = endpoint {
                config.probe.endpoint = Some(endpoint);
            }
            let prober = Prober::new(&config.probe)?;
            let status = prober.probe().await;

            println!("{}", serde_json::to_string(&HookResponse::from(status))?);
            Ok(ExitCode::from(status.exit_code()))
        }
    }
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));
    // Logs go to stderr so `check` output on stdout stays machine-readable
    let ansi = std::io::stderr().is_terminal();

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init(),
    }
}
