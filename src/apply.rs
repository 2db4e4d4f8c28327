// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use crate::{
    config::rules::Rules,
    rule::{truncate_chars, Rule},
};

/// Apply `rules` to `text` in order, each rule seeing the output of the previous one.
///
/// Matching is literal and replaces every occurrence. Empty `find` values are skipped,
/// and both the number of rules and the length of each field are capped by `limits`.
/// A rule that would grow the text past `limits.max_text_len` is skipped.
pub fn apply_rules(text: &str, rules: &[Rule], limits: &Rules) -> String {
    rules
        .iter()
        .take(limits.max_rules)
        .fold(text.to_string(), |text, rule| {
            let find = truncate_chars(&rule.find, limits.max_find_len);
            if find.is_empty() {
                return text;
            }
            let replace = truncate_chars(&rule.replace, limits.max_replace_len);

            let grown = replaced_len(&text, &find, &replace);
            if grown > text.len() && grown > limits.max_text_len {
                color_print::ceprintln!(
                    "<y>[rules] Warning: skipping rule `{}`, text would grow to {} bytes</>",
                    find,
                    grown
                );
                return text;
            }
            text.replace(&*find, &replace)
        })
}

/// Length of `text` after replacing every `find` with `replace`, without building it.
fn replaced_len(text: &str, find: &str, replace: &str) -> usize {
    let count = text.matches(find).count();
    (text.len() - count * find.len()).saturating_add(count.saturating_mul(replace.len()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rule::RuleId;

    fn rule(n: u64, find: &str, replace: &str) -> Rule {
        Rule::new(RuleId::Number(n.into()), find, replace)
    }

    #[test]
    fn test_cascading_order() {
        let limits = Rules::default();
        let forward = [rule(1, "a", "b"), rule(2, "b", "c")];
        let backward = [rule(1, "b", "c"), rule(2, "a", "b")];

        assert_eq!(apply_rules("a", &forward, &limits), "c");
        assert_eq!(apply_rules("a", &backward, &limits), "b");
    }

    #[test]
    fn test_all_occurrences() {
        let rules = [rule(1, "teh", "the")];
        assert_eq!(
            apply_rules("teh cat and teh dog", &rules, &Rules::default()),
            "the cat and the dog"
        );
    }

    #[test]
    fn test_literal_match() {
        let rules = [rule(1, "a.c", "X"), rule(2, "$x$", "$y$")];
        assert_eq!(
            apply_rules("abc a.c $x$", &rules, &Rules::default()),
            "abc X $y$"
        );
    }

    #[test]
    fn test_empty_find_is_noop() {
        let rules = [rule(1, "", "boom"), rule(2, "x", "")];
        assert_eq!(apply_rules("xyx", &rules, &Rules::default()), "y");
    }

    #[test]
    fn test_deterministic() {
        let rules = [rule(1, "ab", "ba"), rule(2, "b", "bb")];
        let limits = Rules::default();
        let text = "abab cab";
        assert_eq!(
            apply_rules(text, &rules, &limits),
            apply_rules(text, &rules, &limits)
        );
    }

    #[test]
    fn test_caps() {
        let limits = Rules {
            max_rules: 1,
            max_find_len: 2,
            max_replace_len: 1,
            ..Rules::default()
        };
        let rules = [rule(1, "abc", "XYZ"), rule(2, "c", "!")];
        assert_eq!(apply_rules("abc", &rules, &limits), "Xc");
    }

    #[test]
    fn test_growth_is_bounded() {
        let limits = Rules::default();
        let blowup = "a".repeat(limits.max_replace_len);
        let rules = [
            rule(1, "a", &blowup),
            rule(2, "a", &blowup),
            rule(3, "a", &blowup),
        ];

        let text = apply_rules("a", &rules, &limits);
        assert_eq!(text.len(), blowup.len());
        assert!(text.len() <= limits.max_text_len);
    }

    #[test]
    fn test_growth_cap_skips_only_growing_rules() {
        let limits = Rules {
            max_text_len: 8,
            ..Rules::default()
        };
        let rules = [rule(1, "a", "aaaa"), rule(2, "a", "aaaa"), rule(3, "aa", "b")];
        assert_eq!(apply_rules("ab", &rules, &limits), "bbb");

        let shrink = [rule(1, "xx", "y")];
        assert_eq!(apply_rules("xxxxxxxxxx", &shrink, &limits), "yyyyy");
    }

    #[test]
    fn test_replaced_len() {
        assert_eq!(replaced_len("abcabc", "bc", "XYZ"), 8);
        assert_eq!(replaced_len("aaa", "aa", ""), 1);
        assert_eq!(replaced_len("none", "z", "long"), 4);
    }
}
