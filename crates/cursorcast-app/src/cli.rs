use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cursorcast: live pointer presence over a shared page.
#[derive(Parser, Debug)]
#[command(name = "cursorcast", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `debug` or `cursorcast=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two in-process participants share the sample page.
    Demo {
        /// Number of scripted pointer moves.
        #[arg(long, default_value_t = 40)]
        moves: u32,

        /// Outgoing move spacing; defaults to the configured value.
        #[arg(long)]
        throttle_ms: Option<u32>,
    },

    /// Join a realtime stream and report pointer positions read from stdin
    /// as `x y` lines.
    Connect {
        /// Stream name to join.
        #[arg(long, conflicts_with = "signed_token")]
        stream: Option<String>,

        /// Signed stream token to join.
        #[arg(long)]
        signed_token: Option<String>,
    },

    /// Print the address of the element under a viewport point.
    Encode { x: f64, y: f64 },

    /// Print the element an address resolves to.
    Decode { address: String },
}

pub fn parse() -> Args {
    Args::parse()
}
