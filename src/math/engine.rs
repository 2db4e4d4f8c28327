// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use eyre::eyre;
use katex::{Opts, OutputType};

use crate::config::math::Math;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathMode {
    Inline,
    Display,
}

impl MathMode {
    pub fn strify(&self) -> &str {
        match self {
            MathMode::Inline => "inline",
            MathMode::Display => "display",
        }
    }
}

/// Turns TeX source into HTML markup.
pub trait MathEngine: Send + Sync {
    fn render(&self, tex: &str, mode: MathMode) -> eyre::Result<String>;
}

/// KaTeX backed engine. Options for both modes are built once up front.
pub struct Katex {
    inline: Opts,
    display: Opts,
}

impl Katex {
    pub fn new(config: &Math) -> eyre::Result<Self> {
        Ok(Self {
            inline: build_opts(config, false)?,
            display: build_opts(config, true)?,
        })
    }
}

fn build_opts(config: &Math, display_mode: bool) -> eyre::Result<Opts> {
    Opts::builder()
        .display_mode(display_mode)
        .output_type(OutputType::Html)
        .throw_on_error(config.throw_on_error)
        .fleqn(config.fleqn)
        .leqno(config.leqno)
        .build()
        .map_err(|e| eyre!("failed to build KaTeX options: {}", e))
}

impl MathEngine for Katex {
    fn render(&self, tex: &str, mode: MathMode) -> eyre::Result<String> {
        let opts = match mode {
            MathMode::Inline => &self.inline,
            MathMode::Display => &self.display,
        };
        katex::render_with_opts(tex, opts)
            .map_err(|e| eyre!("KaTeX failed to render `{}`: {}", tex, e))
    }
}
