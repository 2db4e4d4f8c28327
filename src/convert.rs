// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use serde_json::Value;

use crate::{
    apply::apply_rules,
    config::{markdown::Markdown, rules::Rules, Config},
    markdown::render_markdown,
    math::{
        engine::{Katex, MathEngine},
        render_math,
    },
    rule::{parse_rules, Rule},
    sanitize::Sanitizer,
};

/// The conversion pipeline: rules, math, Markdown, sanitization, in that order.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent conversions.
pub struct Converter {
    rules: Rules,
    markdown: Markdown,
    engine: Box<dyn MathEngine>,
    sanitizer: Sanitizer,
}

impl Converter {
    pub fn new(config: &Config) -> eyre::Result<Self> {
        let engine = Katex::new(&config.math)?;
        Ok(Self::with_engine(config, Box::new(engine)))
    }

    pub fn with_engine(config: &Config, engine: Box<dyn MathEngine>) -> Self {
        Self {
            rules: config.rules.clone(),
            markdown: config.markdown.clone(),
            engine,
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn rule_limits(&self) -> &Rules {
        &self.rules
    }

    pub fn convert(&self, text: &str, rules: &[Rule]) -> String {
        let text = apply_rules(text, rules, &self.rules);
        let text = render_math(&text, self.engine.as_ref());
        let html = render_markdown(&text, &self.markdown);
        self.sanitizer.clean(&html)
    }

    /// Convert a loosely typed `{ text, userRules }` request body.
    ///
    /// `userRules` that is not an array counts as no rules.
    pub fn convert_request(&self, request: &Value) -> String {
        let text = coerce_text(request.get("text"));
        let rules = request
            .get("userRules")
            .and_then(|rules| parse_rules(rules, &self.rules))
            .unwrap_or_default();
        self.convert(&text, &rules)
    }
}

/// Coerce any JSON value into the text to convert.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::{math::engine::MathMode, rule::RuleId};

    struct Tagged;

    impl MathEngine for Tagged {
        fn render(&self, tex: &str, mode: MathMode) -> eyre::Result<String> {
            if tex.contains("frac{") {
                return Err(eyre::eyre!("unbalanced group"));
            }
            Ok(format!(r#"<span class="katex {}">{}</span>"#, mode.strify(), tex))
        }
    }

    fn tagged() -> Converter {
        Converter::with_engine(&Config::default(), Box::new(Tagged))
    }

    #[test]
    fn test_heading() {
        let html = tagged().convert("# Hello", &[]);
        assert_eq!(html, "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_script_removed() {
        let html = tagged().convert("# Hello <script>alert(1)</script>", &[]);
        assert!(html.contains("<h1>Hello"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
    }

    #[test]
    fn test_rules_before_math() {
        let rules = [Rule::new(RuleId::Number(1u64.into()), "SQ", "$x^2$")];
        let html = tagged().convert("area SQ", &rules);
        assert!(html.contains("node-inlineMath"));
        assert!(html.contains(r#"<span class="katex inline">x^2</span>"#));
    }

    #[test]
    fn test_fail_soft_span() {
        let html = tagged().convert("**bold** $\\frac{$ and $y$", &[]);
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("$\\frac{$"));
        assert!(html.contains(r#"<span class="katex inline">y</span>"#));
    }

    #[test]
    fn test_block_and_inline_differ() {
        let converter = tagged();
        let block = converter.convert("$$x^2$$", &[]);
        let inline = converter.convert("$x^2$", &[]);
        assert!(block.contains("node-displayMath"));
        assert!(inline.contains("node-inlineMath"));
        assert_ne!(block, inline);
    }

    #[test]
    fn test_math_not_reparsed_as_markdown() {
        let html = tagged().convert("$a_1 * b_2 * c$", &[]);
        assert!(!html.contains("<em>"));
        assert!(html.contains("a_1 * b_2 * c"));
    }

    #[test]
    fn test_urls_in_math_stay_plain() {
        let html = tagged().convert("$\\text{www.example.com}$ see www.rust-lang.org", &[]);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"<a href="http://www.rust-lang.org""#));
        assert!(html.contains(r#"<span class="katex inline">\text{www.example.com}</span>"#));
    }

    #[test]
    fn test_request_rules_cannot_explode_text() {
        let converter = tagged();
        let blowup = "a".repeat(5000);
        let rule = json!({ "find": "a", "replace": blowup });
        let html = converter.convert_request(&json!({
            "text": "a",
            "userRules": [rule.clone(), rule.clone(), rule]
        }));

        assert_eq!(html, format!("<p>{}</p>\n", blowup));
    }

    #[test]
    fn test_convert_request_coercion() {
        let converter = tagged();
        assert_eq!(converter.convert_request(&json!({})), "");
        assert_eq!(converter.convert_request(&json!({ "text": 42 })), "<p>42</p>\n");
        assert_eq!(
            converter.convert_request(&json!({ "text": "a", "userRules": "oops" })),
            "<p>a</p>\n"
        );
        assert_eq!(
            converter.convert_request(&json!({
                "text": "a",
                "userRules": [{ "find": "a", "replace": "b" }, { "find": "b", "replace": "c" }]
            })),
            "<p>c</p>\n"
        );
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(None), "");
        assert_eq!(coerce_text(Some(&json!(null))), "");
        assert_eq!(coerce_text(Some(&json!(true))), "true");
        assert_eq!(coerce_text(Some(&json!("x"))), "x");
        assert_eq!(coerce_text(Some(&json!([1, 2]))), "[1,2]");
    }

    #[test]
    fn test_katex_end_to_end() {
        let converter = Converter::new(&Config::default()).unwrap();
        let html = converter.convert("Euler: $e^{i\\pi} + 1 = 0$\n\n$$\\int_0^1 x\\,dx$$", &[]);
        assert!(html.contains("node-inlineMath"));
        assert!(html.contains("node-displayMath"));
        assert!(html.contains("katex-display"));
        assert!(!html.contains("<script"));
    }
}
