pub mod trace;

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use mactrace_common::config::{Config, DEFAULT_MAX_HOPS, DEFAULT_SSH_PORT};
use mactrace_common::credentials::DEFAULT_CREDENTIALS_PATH;

#[derive(Parser)]
#[command(name = "mactrace")]
#[command(about = "Find the switch port a MAC address is plugged into.")]
#[command(version)]
pub struct CommandLine {
    /// Hostname or IP address of the switch to start from (prompted when omitted)
    #[arg(short, long)]
    pub device: Option<String>,

    /// MAC address to search for, in any common notation (prompted when omitted)
    #[arg(short, long)]
    pub mac: Option<String>,

    /// JSON file with `username`, `password` and `enablepw`
    #[arg(short, long, env = "MACTRACE_CREDENTIALS", default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials: PathBuf,

    /// SSH port of the switches
    #[arg(short, long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Seconds to wait for a device to answer a command
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Seconds to keep the window open after the result is shown
    #[arg(long, default_value_t = 30)]
    pub hold: u64,

    /// Maximum number of switches to visit
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_HOPS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_hops: usize,

    /// Print less (-q hides headers, -qq only prints the result)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Log every command and its output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            port: self.port,
            command_timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_secs(self.timeout),
            hold: Duration::from_secs(self.hold),
            max_hops: self.max_hops,
            quiet: self.quiet,
        }
    }
}
