//! shellhelp CLI — query a shell's help document from the command line.
//!
//! Loads the help document the same way the interactive shell does and
//! prints the rendered entry for a `help [subject [subtopic]]` query.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
