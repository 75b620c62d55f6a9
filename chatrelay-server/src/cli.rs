use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chatrelay",
    about = "chatrelay - chat-completion forwarding proxy with model remapping",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "CHATRELAY_CONFIG", help = "Path to JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "CHATRELAY_HOST", help = "Override listen address")]
    pub host: Option<String>,

    #[arg(short, long, global = true, env = "CHATRELAY_PORT", help = "Override listen port")]
    pub port: Option<u16>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Start the proxy server (default if no command specified)")]
    Serve,

    #[command(subcommand, about = "Inspect or create configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write the built-in defaults to a file")]
    Init {
        #[arg(help = "Destination path")]
        path: PathBuf,

        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
}
