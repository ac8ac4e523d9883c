mod cli;
mod commands;
mod page;

use std::process::ExitCode;
use std::time::Duration;

use cursorcast_common::Result;
use cursorcast_config::{CursorcastConfig, PresenceSettings};
use cursorcast_presence::StreamSelector;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const DEFAULT_DIRECTIVE: &str = "cursorcast=info";

fn init_logging(args: &Args, config: Option<&CursorcastConfig>) {
    let directive = match (&args.log_level, config) {
        (Some(level), _) if level.contains('=') => level.clone(),
        (Some(level), _) => format!("cursorcast={level}"),
        (None, Some(config)) => format!("cursorcast={}", config.logging.level.as_filter()),
        (None, None) => DEFAULT_DIRECTIVE.to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| DEFAULT_DIRECTIVE.parse().unwrap()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Logging depends on the config, so load first and report afterwards.
    let loaded = cursorcast_config::load_config(args.config.as_deref());
    init_logging(&args, loaded.as_ref().ok());
    tracing::info!("Cursorcast v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("Config load failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            CursorcastConfig::default()
        }
    };

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &CursorcastConfig) -> Result<()> {
    match command {
        Command::Demo { moves, throttle_ms } => {
            let settings = PresenceSettings::from_config(config)?;
            let throttle = throttle_ms
                .map(|ms| Duration::from_millis(u64::from(ms)))
                .unwrap_or(settings.session.throttle);
            let report = commands::run_demo(commands::DemoOptions {
                moves,
                throttle,
                liveness: settings.liveness,
            })
            .await?;
            println!(
                "{}",
                serde_json::json!({
                    "sent": report.sent,
                    "observed": report.observed.len(),
                    "final_position": report.observed.last(),
                    "flushed": report.flushed,
                })
            );
            Ok(())
        }
        Command::Connect {
            stream,
            signed_token,
        } => {
            let mut settings = PresenceSettings::from_config(config)?;
            if let Some(name) = stream {
                settings.stream = StreamSelector::Named(name);
            } else if let Some(token) = signed_token {
                settings.stream = StreamSelector::Signed(token);
            }
            commands::run_connect(settings).await
        }
        Command::Encode { x, y } => {
            println!("{}", commands::encode_point(x, y)?);
            Ok(())
        }
        Command::Decode { address } => {
            println!("{}", commands::decode_address(&address)?);
            Ok(())
        }
    }
}
