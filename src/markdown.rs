// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic), Spore (@s-cerevisiae)

pub mod linkify;

use pulldown_cmark::{html, Options, Parser, TextMergeStream};

use crate::config::markdown::Markdown;
use linkify::Linkify;

/// Parser options for `config`. Math is left out on purpose: it has already
/// been rendered by the time Markdown is parsed.
pub fn options(config: &Markdown) -> Options {
    let mut options = Options::empty();
    options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options
}

/// Render Markdown to HTML. Raw HTML in the source is passed through.
pub fn render_markdown(source: &str, config: &Markdown) -> String {
    let parser = Parser::new_ext(source, options(config));
    let events = TextMergeStream::new(parser);

    let mut html_output = String::with_capacity(source.len() * 3 / 2);
    match config.linkify {
        true => html::push_html(&mut html_output, Linkify::new(events)),
        false => html::push_html(&mut html_output, events),
    }
    html_output
}
