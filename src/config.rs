// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic), Spore (@s-cerevisiae)

pub mod markdown;
pub mod math;
pub mod rules;
pub mod server;

use camino::Utf8Path;
use eyre::WrapErr;
use markdown::Markdown;
use math::Math;
use rules::Rules;
use serde::{Deserialize, Serialize};
use server::Server;

pub const DEFAULT_CONFIG_PATH: &str = "./texdown.toml";

#[derive(Deserialize, Debug, Default, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub rules: Rules,

    #[serde(default)]
    pub math: Math,

    #[serde(default)]
    pub markdown: Markdown,
}

/// Load the configuration file at `toml_file`.
///
/// A missing file at [`DEFAULT_CONFIG_PATH`] yields the default configuration,
/// any other missing path is an error.
pub fn load_config(toml_file: &Utf8Path) -> eyre::Result<Config> {
    if !toml_file.exists() {
        if toml_file.as_str() == DEFAULT_CONFIG_PATH {
            return Ok(Config::default());
        }
        return Err(eyre::eyre!("cannot find configuration file: {}", toml_file));
    }

    let toml = std::fs::read_to_string(toml_file)
        .wrap_err_with(|| eyre::eyre!("failed to read configuration file `{}`", toml_file))?;
    parse_config(&toml)
}

pub fn parse_config(config: &str) -> eyre::Result<Config> {
    let config: Config =
        toml::from_str(config).map_err(|e| eyre::eyre!("failed to parse config file: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod test {

    #[test]
    fn test_empty_toml() {
        let config = crate::config::parse_config("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_body_bytes, 5 * 1024 * 1024);
        assert_eq!(config.rules.max_rules, 500);
        assert_eq!(config.rules.max_text_len, 10 * 1024 * 1024);
        assert!(config.rules.store_path.is_none());
        assert!(!config.math.throw_on_error);
        assert!(config.markdown.smart_punctuation);
        assert!(config.markdown.linkify);
    }

    #[test]
    fn test_simple_toml() {
        let config = crate::config::parse_config(
            r#"
            [server]
            port = 8080
            workers = 2

            [rules]
            max-rules = 10
            store-path = "rules.json"

            [markdown]
            linkify = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.workers, 2);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.rules.max_rules, 10);
        assert_eq!(config.rules.max_find_len, 1000);
        assert_eq!(
            config.rules.store_path.as_ref().map(|p| p.as_str()),
            Some("rules.json")
        );
        assert!(!config.markdown.linkify);
        assert!(config.markdown.tables);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(crate::config::parse_config("[server]\nport = \"high\"").is_err());
    }

    #[test]
    fn test_missing_default_config() {
        use camino::Utf8Path;

        // Running inside the crate root, where no texdown.toml is checked in.
        let config = crate::config::load_config(Utf8Path::new(crate::config::DEFAULT_CONFIG_PATH));
        assert!(config.is_ok());

        let missing = crate::config::load_config(Utf8Path::new("./missing/texdown.toml"));
        assert!(missing.is_err());
    }
}
