use anyhow::Result;
use clap::Parser;

use lai::cli::{self, Cli};
use lai::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli::initial_log_level(&cli));

    let stdout = std::io::stdout();
    cli::run(&cli, &mut stdout.lock())
}
