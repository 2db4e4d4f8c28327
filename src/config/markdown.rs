// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Markdown {
    pub smart_punctuation: bool,
    pub linkify: bool,
    pub tables: bool,
    pub strikethrough: bool,
}

impl Default for Markdown {
    fn default() -> Self {
        Self {
            smart_punctuation: true,
            linkify: true,
            tables: true,
            strikethrough: true,
        }
    }
}
