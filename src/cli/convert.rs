// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{eyre, WrapErr};
use serde_json::Value;

use crate::{
    config::{self, rules::Rules},
    convert::Converter,
    rule::{parse_rules, Rule},
};

#[derive(clap::Args)]
pub struct ConvertCommand {
    /// Markdown file to convert. Reads stdin when omitted.
    input: Option<Utf8PathBuf>,

    /// Path to the configuration file (e.g., "texdown.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,

    /// JSON file holding an array of `{ find, replace }` rules.
    #[arg(short, long)]
    rules: Option<Utf8PathBuf>,

    /// Write the HTML here instead of stdout.
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,
}

pub fn convert(command: &ConvertCommand) -> eyre::Result<()> {
    let config = config::load_config(Utf8Path::new(&command.config))?;
    let converter = Converter::new(&config)?;

    let text = match &command.input {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| eyre!("failed to read input file `{}`", path))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .wrap_err("failed to read stdin")?;
            text
        }
    };

    let rules = match &command.rules {
        Some(path) => read_rules(path, &config.rules)?,
        None => vec![],
    };

    let html = converter.convert(&text, &rules);
    match &command.output {
        Some(path) => {
            std::fs::write(path, html)
                .wrap_err_with(|| eyre!("failed to write output file `{}`", path))?;
            color_print::cprintln!("<g>[convert]</> Wrote {}", path);
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn read_rules(path: &Utf8Path, limits: &Rules) -> eyre::Result<Vec<Rule>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| eyre!("failed to read rules file `{}`", path))?;
    let value: Value = serde_json::from_str(&json)
        .wrap_err_with(|| eyre!("failed to parse rules file `{}`", path))?;
    parse_rules(&value, limits).ok_or_else(|| eyre!("rules file `{}` is not a JSON array", path))
}
