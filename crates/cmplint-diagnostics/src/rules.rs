//! Rule catalog - all cmplint rules.
//!
//! This module is the single source of truth for rule metadata used by
//! `cmplint explain` and the analyzer's diagnostic builders.

use serde::Serialize;

/// Information about a single analysis rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub code: String,
    pub name: String,
    pub description: String,
    pub severity: String,
    pub category: String,
    /// Example Go code that triggers this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_bad: Option<String>,
    /// Example Go code that does not trigger this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_good: Option<String>,
    /// Go idiom for avoiding this issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_idiom: Option<String>,
}

/// Look up a single rule by code (e.g., "CMP001"), case-insensitively.
pub fn get_rule(code: &str) -> Option<RuleInfo> {
    get_all_rules()
        .into_iter()
        .find(|r| r.code.eq_ignore_ascii_case(code))
}

/// Return all rules.
pub fn get_all_rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            code: "CMP001".into(),
            name: "Comparison with address of new variable".into(),
            description: "A value is compared against the address of a composite literal or a \
                          new() allocation. Each such expression creates a distinct variable, \
                          so the comparison can never be true."
                .into(),
            severity: "error".into(),
            category: "comparison".into(),
            example_bad: Some(
                "err := json.Unmarshal(msg, &es)\nif errors.Is(err, &json.UnmarshalTypeError{}) { // always false\n    // ...\n}"
                    .into(),
            ),
            example_good: Some(
                "var typeErr *json.UnmarshalTypeError\nif errors.As(err, &typeErr) {\n    // ...\n}"
                    .into(),
            ),
            go_idiom: Some("Use errors.As to match error types, and compare against shared sentinel values".into()),
        },
        RuleInfo {
            code: "CMP002".into(),
            name: "Comparison with address of new zero-sized variable".into(),
            description: "A value is compared against the address of a newly allocated zero-sized \
                          variable (empty struct, zero-length array). Pointers to distinct \
                          zero-sized variables may or may not be equal, so the result is false \
                          or undefined."
                .into(),
            severity: "warning".into(),
            category: "comparison".into(),
            example_bad: Some("type sentinel struct{}\nif err == &sentinel{} { // false or undefined\n}".into()),
            example_good: Some("var errSentinel = errors.New(\"sentinel\")\nif errors.Is(err, errSentinel) {\n}".into()),
            go_idiom: Some("Never rely on the identity of zero-sized allocations".into()),
        },
        RuleInfo {
            code: "CMP900".into(),
            name: "Comparison function call does not match its catalog shape".into(),
            description: "A call resolved to a catalogued comparison function but has fewer \
                          arguments than the catalog entry expects. This indicates a wrong \
                          catalog entry; the call is skipped."
                .into(),
            severity: "info".into(),
            category: "internal".into(),
            example_bad: None,
            example_good: None,
            go_idiom: None,
        },
    ]
}
