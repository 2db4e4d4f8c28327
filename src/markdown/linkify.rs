// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::{collections::VecDeque, sync::LazyLock};

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex_lite::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?://|www\.)[^\s<>"'`]+"#).expect("URL pattern must compile")
});

const MATH_WRAPPER: &str = r#"<span class="react-renderer"#;

/// Turns bare URLs in text into autolinks.
///
/// Text inside links, images and code blocks is passed through untouched, as is
/// text between raw `<a>` tags and text inside rendered math wrappers.
pub struct Linkify<'e, E> {
    events: E,
    pending: VecDeque<Event<'e>>,
    opaque_depth: usize,
    in_raw_anchor: bool,
    /// Open `<span>` count inside a `react-renderer` math wrapper.
    math_depth: usize,
}

impl<'e, E> Linkify<'e, E> {
    pub fn new(events: E) -> Self {
        Self {
            events,
            pending: VecDeque::new(),
            opaque_depth: 0,
            in_raw_anchor: false,
            math_depth: 0,
        }
    }

    fn track(&mut self, event: &Event<'e>) {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                self.opaque_depth += 1
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                self.opaque_depth = self.opaque_depth.saturating_sub(1)
            }
            // Inline HTML never outlives its paragraph.
            Event::End(TagEnd::Paragraph) => {
                self.in_raw_anchor = false;
                self.math_depth = 0;
            }
            Event::InlineHtml(html) => {
                let tag = html.trim_start().to_ascii_lowercase();
                if self.math_depth > 0 {
                    if tag.starts_with("<span") {
                        self.math_depth += 1;
                    } else if tag.starts_with("</span") {
                        self.math_depth -= 1;
                    }
                } else if tag.starts_with(MATH_WRAPPER) {
                    self.math_depth = 1;
                } else if tag.starts_with("<a ") || tag.starts_with("<a>") {
                    self.in_raw_anchor = true;
                } else if tag.starts_with("</a") {
                    self.in_raw_anchor = false;
                }
            }
            _ => (),
        }
    }

    fn is_linkable(&self) -> bool {
        self.opaque_depth == 0 && !self.in_raw_anchor && self.math_depth == 0
    }
}

impl<'e, E: Iterator<Item = Event<'e>>> Iterator for Linkify<'e, E> {
    type Item = Event<'e>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.events.next()?;
        self.track(&event);

        match event {
            Event::Text(text) if self.is_linkable() => {
                let mut events = split_urls(&text);
                match events.is_empty() {
                    true => Some(Event::Text(text)),
                    false => {
                        let first = events.remove(0);
                        self.pending.extend(events);
                        Some(first)
                    }
                }
            }
            _ => Some(event),
        }
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses from a URL match.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;
    loop {
        let Some(last) = url.chars().next_back() else {
            return url;
        };
        let unbalanced_paren =
            last == ')' && url.matches(')').count() > url.matches('(').count();
        if ".,:;!?".contains(last) || unbalanced_paren {
            url = &url[..url.len() - 1];
        } else {
            return url;
        }
    }
}

fn href_for(url: &str) -> Option<String> {
    let href = match url.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => format!("http://{}", url),
        _ => url.to_string(),
    };
    url::Url::parse(&href).ok().map(|_| href)
}

/// Split `text` into text and autolink events. Empty when no URL was found.
fn split_urls<'e>(text: &str) -> Vec<Event<'e>> {
    let mut events = vec![];
    let mut cursor = 0;

    for found in URL_PATTERN.find_iter(text) {
        let url = trim_url(found.as_str());
        let Some(href) = href_for(url) else {
            continue;
        };
        let start = found.start();
        if start > cursor {
            events.push(Event::Text(text[cursor..start].to_string().into()));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: href.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::End(TagEnd::Link));
        cursor = start + url.len();
    }

    if events.is_empty() {
        return events;
    }
    if cursor < text.len() {
        events.push(Event::Text(text[cursor..].to_string().into()));
    }
    events
}
