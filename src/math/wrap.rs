// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::borrow::Cow;

use pulldown_cmark_escape::escape_html;

use super::{engine::MathMode, MathSpan};

/// Wrap rendered math in the node-view shape the rich-text editor expects:
/// a labeled container holding the hidden TeX source next to the rendered markup.
///
/// The result is a single line whose text nodes carry no Markdown syntax, so it
/// survives the Markdown stage as inline HTML.
pub fn wrap_math(span: &MathSpan<'_>, rendered: &str) -> String {
    let class_name = match span.mode {
        MathMode::Inline => "node-inlineMath",
        MathMode::Display => "node-displayMath",
    };

    let mut source = String::with_capacity(span.tex.len());
    // Writing into a `String` cannot fail.
    let _ = escape_html(&mut source, span.tex);
    let source = source.replace('\n', "&#10;");
    let rendered = rendered.replace('\n', " ");

    let html = format!(
        concat!(
            r#"<span class="react-renderer {}" contenteditable="false">"#,
            r#"<span data-node-view-wrapper="" style="white-space: normal;">"#,
            r#"<span aria-hidden="true" data-node-view-content="" style="white-space: pre-wrap; display:none;">{}</span>"#,
            r#"<span class="mjx-process">{}</span>"#,
            "</span></span>"
        ),
        class_name, source, rendered
    );

    shield_markdown(&html).into_owned()
}

/// Characters that would be re-read as Markdown, or rewritten by smart
/// punctuation, if left in a text node.
fn markdown_entity(ch: char) -> Option<&'static str> {
    match ch {
        '\'' => Some("&#39;"),
        '-' => Some("&#45;"),
        '.' => Some("&#46;"),
        '\\' => Some("&#92;"),
        '`' => Some("&#96;"),
        '*' => Some("&#42;"),
        '_' => Some("&#95;"),
        '[' => Some("&#91;"),
        ']' => Some("&#93;"),
        '~' => Some("&#126;"),
        '|' => Some("&#124;"),
        _ => None,
    }
}

/// Encode Markdown-active characters found in HTML text nodes as numeric entities.
///
/// Only text outside of tags is touched, attribute values are left as they are.
/// Returns a borrowed view when nothing needs escaping.
pub fn shield_markdown(html: &str) -> Cow<'_, str> {
    let mut in_tag = false;
    let mut cursor = 0;
    let mut output: Option<String> = None;

    for (index, ch) in html.char_indices() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                if let Some(entity) = markdown_entity(ch) {
                    let out = output.get_or_insert_with(|| String::with_capacity(html.len() + 16));
                    out.push_str(&html[cursor..index]);
                    out.push_str(entity);
                    cursor = index + ch.len_utf8();
                }
            }
            _ => (),
        }
    }

    match output {
        Some(mut out) => {
            out.push_str(&html[cursor..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(html),
    }
}
