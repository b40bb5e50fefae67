//! Rule-string field validation with localized messages.
//!
//! Rules compose with `|` and take parameters in brackets:
//! `"required|min[3]|email"`. Messages come from a JSON language resource
//! (embedded English by default) with `{field}` and `{param}` templating.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{DbError, DbResult};
use crate::value::Value;

static DEFAULT_LANG: &str = include_str!("asset/en.json");

/// Display label plus rule string for one field.
#[derive(Clone, Debug, Deserialize)]
pub struct FieldRules {
    pub label: String,
    pub rules: String,
}

impl FieldRules {
    pub fn new(label: impl Into<String>, rules: impl Into<String>) -> Self {
        FieldRules {
            label: label.into(),
            rules: rules.into(),
        }
    }
}

/// Validates a data mapping against per-field rule strings.
pub struct Validator {
    messages: HashMap<String, String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl Validator {
    /// Validator with the embedded English messages.
    pub fn new() -> Self {
        Validator {
            messages: default_messages().clone(),
            errors: BTreeMap::new(),
        }
    }

    /// Validator with messages loaded from an external JSON resource.
    pub fn with_lang_file<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DbError::Language(e.to_string()))?;
        let messages =
            serde_json::from_str(&raw).map_err(|e| DbError::Language(e.to_string()))?;
        Ok(Validator {
            messages,
            errors: BTreeMap::new(),
        })
    }

    /// Run every rule against the data. Returns `true` when no rule failed;
    /// the collected messages are available through [`Validator::errors`].
    pub fn validate(&mut self, rules: &[(&str, FieldRules)], data: &[(&str, Value)]) -> bool {
        self.errors.clear();
        for (field, field_rules) in rules {
            let value = field_text(data, field);
            for rule in field_rules.rules.split('|').filter(|r| !r.is_empty()) {
                let (name, param) = split_rule(rule);
                if !check(name, param, &value, data) {
                    let message = self.translate(name, &field_rules.label, param);
                    self.errors
                        .entry(field.to_string())
                        .or_default()
                        .push(message);
                }
            }
        }
        self.errors.is_empty()
    }

    /// Per-field messages collected by the last [`Validator::validate`] run.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Consume the validator, yielding the collected messages.
    pub fn into_errors(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    fn translate(&self, rule: &str, label: &str, param: &str) -> String {
        let template = self
            .messages
            .get(rule)
            .or_else(|| self.messages.get("invalid"))
            .map(String::as_str)
            .unwrap_or("{field} is not valid");
        template.replace("{field}", label).replace("{param}", param)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn default_messages() -> &'static HashMap<String, String> {
    static MESSAGES: OnceLock<HashMap<String, String>> = OnceLock::new();
    MESSAGES.get_or_init(|| {
        serde_json::from_str(DEFAULT_LANG).expect("invalid built-in language resource")
    })
}

/// Split `min[3]` into `("min", "3")`; a bare rule keeps an empty param.
fn split_rule(rule: &str) -> (&str, &str) {
    static RULE_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = RULE_RE.get_or_init(|| {
        regex::Regex::new(r"^(.*?)\[(.*)\]$").expect("invalid built-in rule regex")
    });
    match re.captures(rule) {
        Some(caps) => (
            caps.get(1).map_or(rule, |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        None => (rule, ""),
    }
}

fn check(rule: &str, param: &str, value: &str, data: &[(&str, Value)]) -> bool {
    match rule {
        "required" => !value.is_empty(),
        "min" => char_len(value) >= usize_param(param),
        "max" => char_len(value) <= usize_param(param),
        "exact" => char_len(value) == usize_param(param),
        "less" => numeric(value).is_some_and(|n| n < f64_param(param)),
        "lesseq" => numeric(value).is_some_and(|n| n <= f64_param(param)),
        "greater" => numeric(value).is_some_and(|n| n > f64_param(param)),
        "greatereq" => numeric(value).is_some_and(|n| n >= f64_param(param)),
        "match" => value == field_text(data, param),
        "email" => is_email(value),
        "int" => value.parse::<i64>().is_ok(),
        // Unknown rules fail the field rather than panicking.
        _ => false,
    }
}

/// Best-effort email validation, intentionally not fully RFC-compliant.
fn is_email(s: &str) -> bool {
    static EMAIL_RE: OnceLock<regex::Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid built-in email regex")
        })
        .is_match(s)
}

fn field_text(data: &[(&str, Value)], field: &str) -> String {
    data.iter()
        .find(|(key, _)| *key == field)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn usize_param(param: &str) -> usize {
    param.parse().unwrap_or(0)
}

fn f64_param(param: &str) -> f64 {
    param.parse().unwrap_or(0.0)
}

fn numeric(value: &str) -> Option<f64> {
    value.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(specs: &[(&'static str, &str, &str)]) -> Vec<(&'static str, FieldRules)> {
        specs
            .iter()
            .map(|(field, label, rules)| (*field, FieldRules::new(*label, *rules)))
            .collect()
    }

    #[test]
    fn test_passing_data() {
        let rules = rules(&[
            ("name", "Name", "required|min[3]|max[10]"),
            ("email", "E-mail", "required|email"),
            ("age", "Age", "int|greatereq[18]"),
        ]);
        let data: Vec<(&str, Value)> = vec![
            ("name", "Ann-Marie".into()),
            ("email", "ann@example.com".into()),
            ("age", 30.into()),
        ];
        let mut v = Validator::new();
        assert!(v.validate(&rules, &data));
        assert!(v.errors().is_empty());
    }

    #[test]
    fn test_required_and_min_collect_messages() {
        let rules = rules(&[("name", "Name", "required|min[3]")]);
        let data: Vec<(&str, Value)> = vec![("name", "".into())];
        let mut v = Validator::new();
        assert!(!v.validate(&rules, &data));
        let messages = &v.errors()["name"];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Name is required");
        assert_eq!(messages[1], "Name must be at least 3 characters");
    }

    #[test]
    fn test_missing_field_counts_as_empty() {
        let rules = rules(&[("name", "Name", "required")]);
        let mut v = Validator::new();
        assert!(!v.validate(&rules, &[]));
        assert!(v.errors().contains_key("name"));
    }

    #[test]
    fn test_email_rule() {
        let rules = rules(&[("email", "E-mail", "email")]);
        let mut v = Validator::new();
        assert!(v.validate(&rules, &[("email", "a@b.co".into())]));
        assert!(!v.validate(&rules, &[("email", "not-an-email".into())]));
    }

    #[test]
    fn test_numeric_rules_require_numbers() {
        let rules = rules(&[("age", "Age", "greater[18]")]);
        let mut v = Validator::new();
        assert!(v.validate(&rules, &[("age", 19.into())]));
        assert!(!v.validate(&rules, &[("age", 18.into())]));
        assert!(!v.validate(&rules, &[("age", "abc".into())]));
    }

    #[test]
    fn test_match_rule() {
        let rules = rules(&[("confirm", "Confirmation", "match[password]")]);
        let data: Vec<(&str, Value)> =
            vec![("password", "s3cret".into()), ("confirm", "s3cret".into())];
        let mut v = Validator::new();
        assert!(v.validate(&rules, &data));

        let data: Vec<(&str, Value)> =
            vec![("password", "s3cret".into()), ("confirm", "other".into())];
        assert!(!v.validate(&rules, &data));
        assert_eq!(v.errors()["confirm"][0], "Confirmation does not match password");
    }

    #[test]
    fn test_exact_counts_chars_not_bytes() {
        let rules = rules(&[("code", "Code", "exact[2]")]);
        let mut v = Validator::new();
        assert!(v.validate(&rules, &[("code", "éé".into())]));
    }

    #[test]
    fn test_unknown_rule_fails_with_fallback_message() {
        let rules = rules(&[("name", "Name", "bogus")]);
        let mut v = Validator::new();
        assert!(!v.validate(&rules, &[("name", "x".into())]));
        assert_eq!(v.errors()["name"][0], "Name is not valid");
    }

    #[test]
    fn test_validate_resets_previous_errors() {
        let rules = rules(&[("name", "Name", "required")]);
        let mut v = Validator::new();
        assert!(!v.validate(&rules, &[]));
        assert!(v.validate(&rules, &[("name", "Ann".into())]));
        assert!(v.errors().is_empty());
    }
}
