// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TEXT_LEN: usize = 10 * 1024 * 1024;

/// Bounds applied to every rule set, whether it is saved to the store or
/// submitted along with a conversion request.
#[derive(Clone, Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Rules {
    pub max_rules: usize,
    pub max_find_len: usize,
    pub max_replace_len: usize,

    /// Upper bound, in bytes, on the text a rule may grow during application.
    pub max_text_len: usize,

    /// Persist saved rules as JSON at this path. Rules live in memory only when unset.
    pub store_path: Option<Utf8PathBuf>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_rules: 500,
            max_find_len: 1000,
            max_replace_len: 5000,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            store_path: None,
        }
    }
}
