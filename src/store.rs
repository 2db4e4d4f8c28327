// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::{
    fs,
    sync::{PoisonError, RwLock},
};

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{eyre, WrapErr};

use crate::rule::Rule;

/// Holds the single saved rule set. Saves replace the whole set.
pub trait RuleStore: Send + Sync {
    fn load(&self) -> Vec<Rule>;

    /// Replace the stored set and return the stored copy.
    fn save(&self, rules: Vec<Rule>) -> eyre::Result<Vec<Rule>>;
}

#[derive(Default)]
pub struct MemoryStore {
    rules: RwLock<Vec<Rule>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStore for MemoryStore {
    fn load(&self) -> Vec<Rule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, rules: Vec<Rule>) -> eyre::Result<Vec<Rule>> {
        let mut stored = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *stored = rules;
        Ok(stored.clone())
    }
}

/// A [`MemoryStore`] mirrored to a JSON file, so saved rules survive restarts.
pub struct JsonFileStore {
    path: Utf8PathBuf,
    rules: RwLock<Vec<Rule>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty rule set.
    pub fn open<P: Into<Utf8PathBuf>>(path: P) -> eyre::Result<Self> {
        let path = path.into();
        let rules = match path.exists() {
            false => vec![],
            true => {
                let json = fs::read_to_string(&path)
                    .wrap_err_with(|| eyre!("failed to read rules file `{}`", path))?;
                serde_json::from_str(&json)
                    .wrap_err_with(|| eyre!("failed to parse rules file `{}`", path))?
            }
        };

        Ok(Self {
            path,
            rules: RwLock::new(rules),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn write_file(&self, rules: &[Rule]) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)
                    .wrap_err_with(|| eyre!("failed to create rules directory `{}`", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(rules)?;
        let buffer = Utf8PathBuf::from(format!("{}.tmp", self.path));
        fs::write(&buffer, json)
            .wrap_err_with(|| eyre!("failed to write rules file `{}`", buffer))?;
        fs::rename(&buffer, &self.path)
            .wrap_err_with(|| eyre!("failed to replace rules file `{}`", self.path))?;
        Ok(())
    }
}

impl RuleStore for JsonFileStore {
    fn load(&self) -> Vec<Rule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, rules: Vec<Rule>) -> eyre::Result<Vec<Rule>> {
        // File and memory copy change under the same lock.
        let mut stored = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        self.write_file(&rules)?;
        *stored = rules;
        Ok(stored.clone())
    }
}
