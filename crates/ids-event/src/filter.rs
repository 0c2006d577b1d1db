//! Filter Results
//!
//! A filter result is the outcome of one detection rule that matched a value.
//! Events only read two things from it: an impact weight and a list of tags.
//! That capability is the [`FilterResult`] trait, so any rule engine's output
//! can be aggregated without depending on a concrete filter type.
//!
//! [`Filter`] is the stock implementation. It deserializes from filter
//! definition files where numbers may be quoted and tags may be wrapped:
//!
//! ```json
//! {"id": "1", "rule": "(?:\"[^\"]*[^-]?>)", "description": "finds html breaking injections",
//!  "tags": {"tag": ["xss", "csrf"]}, "impact": "4"}
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::rc::Rc;
use std::sync::Arc;

use crate::scalar::json_kind;

/// Read access to the outcome of a single matched filter.
pub trait FilterResult {
    /// Severity weight contributed by this filter.
    fn impact(&self) -> i64;

    /// Descriptive labels contributed by this filter, in the filter's order.
    fn tags(&self) -> &[String];
}

impl<T: FilterResult + ?Sized> FilterResult for &T {
    fn impact(&self) -> i64 {
        (**self).impact()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

impl<T: FilterResult + ?Sized> FilterResult for Box<T> {
    fn impact(&self) -> i64 {
        (**self).impact()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

impl<T: FilterResult + ?Sized> FilterResult for Rc<T> {
    fn impact(&self) -> i64 {
        (**self).impact()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

impl<T: FilterResult + ?Sized> FilterResult for Arc<T> {
    fn impact(&self) -> i64 {
        (**self).impact()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

/// A detection rule together with its severity and tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Filter {
    /// Rule identifier
    #[serde(default, deserialize_with = "int_or_string")]
    pub id: i64,
    /// Rule pattern, kept verbatim
    #[serde(default)]
    pub rule: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Descriptive labels (e.g. "xss", "sqli")
    #[serde(deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    /// Severity weight
    #[serde(deserialize_with = "int_or_string")]
    pub impact: i64,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(
        id: i64,
        rule: impl Into<String>,
        description: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
        impact: i64,
    ) -> Self {
        Self {
            id,
            rule: rule.into(),
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            impact,
        }
    }

    /// Parses a list of filter definitions.
    ///
    /// Accepts either a bare JSON array or the nested
    /// `{"filters": {"filter": [...]}}` layout.
    pub fn list_from_json(content: &str) -> Result<Vec<Filter>, serde_json::Error> {
        #[derive(Deserialize)]
        struct Nested {
            filter: Vec<Filter>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Bare(Vec<Filter>),
            Wrapped { filters: Nested },
        }

        Ok(match serde_json::from_str(content)? {
            Document::Bare(filters) => filters,
            Document::Wrapped { filters } => filters.filter,
        })
    }

    /// Returns true if this filter carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl FilterResult for Filter {
    fn impact(&self) -> i64 {
        self.impact
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Reasons a JSON record cannot act as a filter result.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Record is not a JSON object
    #[error("expected a filter object, {0} given")]
    NotAnObject(&'static str),
    /// Record lacks a required field
    #[error("filter has no `{0}`")]
    Missing(&'static str),
    /// Record has the fields but they could not be read
    #[error("malformed filter: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl TryFrom<Value> for Filter {
    type Error = FilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let object = match &value {
            Value::Object(map) => map,
            other => return Err(FilterError::NotAnObject(json_kind(other))),
        };
        for field in ["impact", "tags"] {
            if !object.contains_key(field) {
                return Err(FilterError::Missing(field));
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Plain(OneOrMany),
        Wrapped { tag: OneOrMany },
    }

    let tags = match Tags::deserialize(deserializer)? {
        Tags::Plain(t) | Tags::Wrapped { tag: t } => t,
    };
    Ok(match tags {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_result_accessors() {
        let filter = Filter::new(1, "<script", "finds script tags", ["xss", "csrf"], 4);
        assert_eq!(FilterResult::impact(&filter), 4);
        assert_eq!(FilterResult::tags(&filter), ["xss", "csrf"]);
        assert!(filter.has_tag("csrf"));
        assert!(!filter.has_tag("sqli"));
    }

    #[test]
    fn test_smart_pointers_forward() {
        let filter = Filter::new(2, "", "", ["sqli"], 6);
        let shared = Arc::new(filter.clone());
        let boxed: Box<dyn FilterResult> = Box::new(filter.clone());

        assert_eq!(shared.impact(), 6);
        assert_eq!((&filter).tags(), ["sqli"]);
        assert_eq!(boxed.impact(), 6);
    }

    #[test]
    fn test_deserialize_quoted_numbers_and_wrapped_tags() {
        let filter: Filter = serde_json::from_value(json!({
            "id": "12",
            "rule": "(?:union\\s+select)",
            "description": "detects union selects",
            "tags": {"tag": ["sqli", "id"]},
            "impact": "7"
        }))
        .unwrap();

        assert_eq!(filter.id, 12);
        assert_eq!(filter.impact, 7);
        assert_eq!(filter.tags, ["sqli", "id"]);
    }

    #[test]
    fn test_deserialize_single_wrapped_tag() {
        let filter: Filter =
            serde_json::from_value(json!({"tags": {"tag": "rfe"}, "impact": 5})).unwrap();
        assert_eq!(filter.tags, ["rfe"]);
        assert_eq!(filter.id, 0);
        assert!(filter.rule.is_empty());
    }

    #[test]
    fn test_list_from_json_both_layouts() {
        let bare = r#"[{"tags": ["xss"], "impact": 3}]"#;
        let wrapped = r#"{"filters": {"filter": [{"tags": ["xss"], "impact": "3"}]}}"#;

        assert_eq!(Filter::list_from_json(bare).unwrap(), Filter::list_from_json(wrapped).unwrap());
    }

    #[test]
    fn test_try_from_value_missing_capability() {
        let err = Filter::try_from(json!({"tags": ["xss"]})).unwrap_err();
        assert!(matches!(err, FilterError::Missing("impact")));

        let err = Filter::try_from(json!({"impact": 2})).unwrap_err();
        assert!(matches!(err, FilterError::Missing("tags")));

        let err = Filter::try_from(json!("xss")).unwrap_err();
        assert!(matches!(err, FilterError::NotAnObject("string")));
    }

    #[test]
    fn test_try_from_value_malformed() {
        let err = Filter::try_from(json!({"tags": ["xss"], "impact": "high"})).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
    }

    #[test]
    fn test_negative_impact_is_legal() {
        let filter = Filter::try_from(json!({"tags": [], "impact": -2})).unwrap();
        assert_eq!(filter.impact(), -2);
    }
}
