// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use ammonia::Builder;

/// Attributes KaTeX output and the editor math wrapper rely on.
const GENERIC_ATTRIBUTES: [&str; 4] = ["class", "style", "aria-hidden", "contenteditable"];

/// KaTeX draws radicals and stretchy arrows as inline SVG.
const SVG_TAGS: [&str; 3] = ["svg", "path", "line"];

/// Whitelist based HTML cleaner. Scripts, event handler attributes,
/// `javascript:` URLs and unknown tags are removed.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_generic_attributes(GENERIC_ATTRIBUTES)
            .add_generic_attribute_prefixes(["data-"])
            .add_tags(SVG_TAGS)
            .add_tag_attributes(
                "svg",
                ["xmlns", "width", "height", "viewBox", "preserveAspectRatio", "style"],
            )
            .add_tag_attributes("path", ["d"])
            .add_tag_attributes("line", ["x1", "y1", "x2", "y2", "stroke-width"]);
        Self { builder }
    }

    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
