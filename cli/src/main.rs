mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, trace};
use mactrace_common::config::Config;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::initialize(commands.no_color);

    let cfg: Config = commands.to_config();
    print::banner(cfg.quiet);

    let located: bool = match trace::trace(&commands, &cfg).await {
        Ok(located) => located,
        Err(e) => {
            error!("{e:#}");
            false
        }
    };

    print::hold(cfg.hold, cfg.quiet).await;

    if located {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
