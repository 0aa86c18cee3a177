use clap::Parser;
use streamflow_processor::cli::{run, Cli};
use streamflow_processor::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
