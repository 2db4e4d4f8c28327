// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::{borrow::Cow, collections::HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{base36, config::rules::Rules};

/// Opaque rule identifier. Clients send either numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleId {
    Number(serde_json::Number),
    Text(String),
}

impl RuleId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    fn random() -> Self {
        Self::Text(base36::random_id())
    }
}

/// A literal find/replace substitution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

impl Rule {
    pub fn new<F: Into<String>, R: Into<String>>(id: RuleId, find: F, replace: R) -> Self {
        Self {
            id,
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// Truncate `s` to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(s[..end].to_string()),
        None => Cow::Borrowed(s),
    }
}

/// Read a string field, coercing anything that is not a JSON string to `""`.
fn string_field<'v>(value: &'v Value, key: &str) -> &'v str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Turn a loosely typed JSON array into a clean rule set.
///
/// Rules with an empty `find` are dropped, the remaining ones are truncated
/// to the limits in [`Rules`], and every rule ends up with an identifier that
/// is unique within the set.
pub fn normalize_rules(values: &[Value], limits: &Rules) -> Vec<Rule> {
    let mut seen: HashSet<RuleId> = HashSet::new();

    values
        .iter()
        .filter_map(|value| {
            let find = truncate_chars(string_field(value, "find"), limits.max_find_len);
            if find.is_empty() {
                return None;
            }
            let replace = truncate_chars(string_field(value, "replace"), limits.max_replace_len);
            let id = value.get("id").and_then(RuleId::from_value);
            Some((id, find.into_owned(), replace.into_owned()))
        })
        .take(limits.max_rules)
        .map(|(id, find, replace)| {
            let mut id = id.unwrap_or_else(RuleId::random);
            while seen.contains(&id) {
                id = RuleId::random();
            }
            seen.insert(id.clone());
            Rule::new(id, find, replace)
        })
        .collect()
}

/// Parse a rule set payload. Returns `None` when `value` is not an array.
pub fn parse_rules(value: &Value, limits: &Rules) -> Option<Vec<Rule>> {
    value
        .as_array()
        .map(|values| normalize_rules(values, limits))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_coerce_fields() {
        let rules = normalize_rules(
            &[
                json!({ "id": 1, "find": "a", "replace": "b" }),
                json!({ "id": "x", "find": "c" }),
                json!({ "id": 2, "find": "d", "replace": 42 }),
            ],
            &Rules::default(),
        );

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], Rule::new(RuleId::Number(1u64.into()), "a", "b"));
        assert_eq!(rules[1], Rule::new(RuleId::Text("x".into()), "c", ""));
        assert_eq!(rules[2].replace, "");
    }

    #[test]
    fn test_discard_empty_find() {
        let rules = normalize_rules(
            &[
                json!({ "id": 1, "find": "", "replace": "b" }),
                json!({ "id": 2, "find": 7, "replace": "b" }),
                json!("not an object"),
                json!(null),
                json!({ "id": 3, "find": "keep" }),
            ],
            &Rules::default(),
        );

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].find, "keep");
    }

    #[test]
    fn test_assign_unique_ids() {
        let rules = normalize_rules(
            &[
                json!({ "find": "a" }),
                json!({ "id": 5, "find": "b" }),
                json!({ "id": 5, "find": "c" }),
                json!({ "id": {}, "find": "d" }),
            ],
            &Rules::default(),
        );

        let ids: HashSet<&RuleId> = rules.iter().map(|rule| &rule.id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(rules[1].id, RuleId::Number(5u64.into()));
    }

    #[test]
    fn test_limits() {
        let limits = Rules {
            max_rules: 2,
            max_find_len: 3,
            max_replace_len: 2,
            ..Rules::default()
        };
        let rules = normalize_rules(
            &[
                json!({ "find": "αβγδ", "replace": "xyz" }),
                json!({ "find": "b" }),
                json!({ "find": "c" }),
            ],
            &limits,
        );

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].find, "αβγ");
        assert_eq!(rules[0].replace, "xy");
        assert_eq!(rules[1].find, "b");
    }

    #[test]
    fn test_parse_rules_rejects_non_array() {
        let limits = Rules::default();
        assert!(parse_rules(&json!("not-an-array"), &limits).is_none());
        assert!(parse_rules(&json!({ "find": "a" }), &limits).is_none());
        assert_eq!(parse_rules(&json!([]), &limits), Some(vec![]));
    }

    #[test]
    fn test_wire_shape() {
        let rule = Rule::new(RuleId::Text("k1".into()), "teh", "the");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({ "id": "k1", "find": "teh", "replace": "the" })
        );
    }
}
