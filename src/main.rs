// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

mod apply;
mod base36;
mod cli;
mod config;
mod convert;
mod markdown;
mod math;
mod rule;
mod sanitize;
mod server;
mod store;

use clap::Parser;

use crate::cli::{convert::ConvertCommand, serve::ServeCommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the conversion API at http://<host>:<port>.
    #[command(visible_alias = "s")]
    Serve(ServeCommand),

    /// Convert one Markdown document to sanitized HTML.
    #[command(visible_alias = "c")]
    Convert(ConvertCommand),
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Serve(command) => crate::cli::serve::serve(command)?,
        Command::Convert(command) => crate::cli::convert::convert(command)?,
    };
    Ok(())
}
