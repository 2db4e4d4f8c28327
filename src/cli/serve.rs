// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic), Spore (@s-cerevisiae)

use std::sync::Arc;

use camino::Utf8Path;

use crate::{
    config::{self, rules::Rules},
    convert::Converter,
    server::{self, App},
    store::{JsonFileStore, MemoryStore, RuleStore},
};

#[derive(clap::Args)]
pub struct ServeCommand {
    /// Path to the configuration file (e.g., "texdown.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,

    /// Port to listen on. Overrides `PORT` and the configured port.
    #[arg(short, long)]
    port: Option<u16>,
}

pub fn serve(command: &ServeCommand) -> eyre::Result<()> {
    let config = config::load_config(Utf8Path::new(&command.config))?;

    let port = resolve_port(command.port, std::env::var("PORT").ok(), config.server.port);
    let address = config.server.address(port);

    let store = open_store(&config.rules)?;
    let converter = Converter::new(&config)?;
    let app = App::new(converter, store, &config.server);

    server::serve(app, &address, config.server.workers)
}

/// `--port` wins over a valid `PORT` variable, which wins over the config file.
fn resolve_port(flag: Option<u16>, env: Option<String>, configured: u16) -> u16 {
    flag.or_else(|| env.and_then(|port| port.trim().parse().ok()))
        .unwrap_or(configured)
}

fn open_store(rules: &Rules) -> eyre::Result<Arc<dyn RuleStore>> {
    match &rules.store_path {
        Some(path) => {
            let store = JsonFileStore::open(path.clone())?;
            color_print::cprintln!("<g>[rules]</> Using rules file `{}`", store.path());
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
