// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

//! Extraction of `$$…$$` and `$…$` spans.
//!
//! The scanner runs in two passes. Block spans are cut out first, then inline
//! spans are searched only in the text between them, so `$$` delimiters are
//! never mistaken for two inline boundaries and rendered markup is never
//! rescanned. A `$` preceded by an odd number of backslashes is not a delimiter.

pub mod engine;
pub mod wrap;

use engine::{MathEngine, MathMode};

/// A delimited math span borrowed from the input.
#[derive(Debug, PartialEq, Eq)]
pub struct MathSpan<'s> {
    /// The span including its delimiters.
    pub source: &'s str,
    /// The TeX between the delimiters.
    pub tex: &'s str,
    pub mode: MathMode,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'s> {
    Text(&'s str),
    Math(MathSpan<'s>),
}

/// Whether the byte at `index` is preceded by an odd run of backslashes.
fn is_escaped(bytes: &[u8], index: usize) -> bool {
    bytes[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}

fn find_unescaped(bytes: &[u8], from: usize, pattern: &[u8]) -> Option<usize> {
    let end = bytes.len().saturating_sub(pattern.len() - 1);
    (from..end).find(|&i| bytes[i..].starts_with(pattern) && !is_escaped(bytes, i))
}

fn push_text<'s>(segments: &mut Vec<Segment<'s>>, text: &'s str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

/// Cut `text` into plain text and `$$…$$` display spans.
///
/// Spans are leftmost and shortest, their content is non-empty and may cross lines.
pub fn split_block(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = vec![];
    let mut start = 0;

    while let Some(open) = find_unescaped(bytes, start, b"$$") {
        // An opener without a closer means no later opener has one either.
        let Some(close) = find_unescaped(bytes, open + 3, b"$$") else {
            break;
        };

        push_text(&mut segments, &text[start..open]);
        segments.push(Segment::Math(MathSpan {
            source: &text[open..close + 2],
            tex: &text[open + 2..close],
            mode: MathMode::Display,
        }));
        start = close + 2;
    }

    push_text(&mut segments, &text[start..]);
    segments
}

fn opens_inline(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    if is_escaped(bytes, index) || (index > 0 && bytes[index - 1] == b'$') {
        return false;
    }
    text[index + 1..]
        .chars()
        .next()
        .is_some_and(|next| next != '$' && !next.is_whitespace())
}

fn closes_inline(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    if is_escaped(bytes, index) || bytes.get(index + 1) == Some(&b'$') {
        return false;
    }
    text[..index]
        .chars()
        .next_back()
        .is_some_and(|prev| prev != '$' && !prev.is_whitespace())
}

/// Cut `text` into plain text and `$…$` inline spans.
///
/// Content must neither start nor end with `$` or whitespace. The characters
/// around a span are only inspected, so `$a$ $b$` yields two spans.
pub fn split_inline(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = vec![];
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'$' && opens_inline(text, index) {
            // Closers do not depend on the opener, so a miss here is final.
            let Some(close) = (index + 2..bytes.len())
                .find(|&i| bytes[i] == b'$' && closes_inline(text, i))
            else {
                break;
            };

            push_text(&mut segments, &text[start..index]);
            segments.push(Segment::Math(MathSpan {
                source: &text[index..=close],
                tex: &text[index + 1..close],
                mode: MathMode::Inline,
            }));
            start = close + 1;
            index = close + 1;
            continue;
        }
        index += 1;
    }

    push_text(&mut segments, &text[start..]);
    segments
}

/// Both passes: display spans first, then inline spans in the remaining text.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    split_block(text)
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Text(s) => split_inline(s),
            math => vec![math],
        })
        .collect()
}

/// Replace every math span in `text` with its rendered, wrapped markup.
///
/// A span the engine fails on is kept verbatim, delimiters included.
pub fn render_math(text: &str, engine: &dyn MathEngine) -> String {
    scan(text)
        .into_iter()
        .fold(String::with_capacity(text.len()), |mut out, segment| {
            match segment {
                Segment::Text(s) => out.push_str(s),
                Segment::Math(span) => match engine.render(span.tex, span.mode) {
                    Ok(rendered) => out.push_str(&wrap::wrap_math(&span, &rendered)),
                    Err(err) => {
                        color_print::ceprintln!(
                            "<y>[math] Warning: keeping {} span `{}` unrendered: {}</>",
                            span.mode.strify(),
                            span.source,
                            err
                        );
                        out.push_str(span.source);
                    }
                },
            }
            out
        })
}
