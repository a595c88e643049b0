//! Typed predicate tree handed to the candidate store.
//!
//! A [`StorageFilter`] can be rendered as a MongoDB-style query document (the
//! shape the admin console and logs speak), as a SQL/JSON path predicate for
//! the Postgres JSONB store, or evaluated directly against a JSON document by
//! the in-memory store. All three follow the same path semantics: dotted paths
//! walk nested objects and fan out through arrays, a positive condition holds
//! when any reached value satisfies it, and a negated condition holds when
//! none does (a missing field included).

use std::cmp::Ordering;

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum StorageFilter {
    /// Every child must hold. `All(vec![])` matches everything.
    All(Vec<StorageFilter>),
    /// At least one child must hold. `Any(vec![])` matches nothing.
    Any(Vec<StorageFilter>),
    Field { path: String, condition: Condition },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Range { min: Option<Value>, max: Option<Value> },
    /// Case-insensitive substring match.
    Contains(String),
    NotContains(String),
    /// Field exists and is not null, `false` or an empty string.
    Present,
}

impl StorageFilter {
    pub fn match_all() -> Self {
        StorageFilter::All(Vec::new())
    }

    pub fn field(path: impl Into<String>, condition: Condition) -> Self {
        StorageFilter::Field {
            path: path.into(),
            condition,
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(path, Condition::Eq(value.into()))
    }

    pub fn one_of<I, S>(path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        Self::field(
            path,
            Condition::In(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn contains(path: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::field(path, Condition::Contains(needle.into()))
    }

    /// True when the filter imposes no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            StorageFilter::All(children) => children.iter().all(Self::is_unconstrained),
            _ => false,
        }
    }

    pub fn to_document(&self) -> Value {
        match self {
            StorageFilter::All(children) if children.is_empty() => Value::Object(Map::new()),
            StorageFilter::All(children) => {
                json!({ "$and": children.iter().map(Self::to_document).collect::<Vec<_>>() })
            }
            // `$nor: [{}]` is the canonical "matches nothing" document.
            StorageFilter::Any(children) if children.is_empty() => json!({ "$nor": [{}] }),
            StorageFilter::Any(children) => {
                json!({ "$or": children.iter().map(Self::to_document).collect::<Vec<_>>() })
            }
            StorageFilter::Field { path, condition } => {
                let mut doc = Map::new();
                doc.insert(path.clone(), condition.to_document());
                Value::Object(doc)
            }
        }
    }

    pub fn matches(&self, document: &Value) -> bool {
        match self {
            StorageFilter::All(children) => children.iter().all(|child| child.matches(document)),
            StorageFilter::Any(children) => children.iter().any(|child| child.matches(document)),
            StorageFilter::Field { path, condition } => {
                condition.holds(&resolve_path(document, path))
            }
        }
    }

    /// SQL/JSON path predicate (lax mode) for `jsonb @? jsonpath`, or `None`
    /// when the filter is unconstrained and no `WHERE` clause is needed.
    pub fn to_jsonpath(&self) -> Option<String> {
        if self.is_unconstrained() {
            return None;
        }
        Some(format!("$ ? ({})", self.jsonpath_predicate()))
    }

    fn jsonpath_predicate(&self) -> String {
        match self {
            StorageFilter::All(children) if children.is_empty() => "1 == 1".to_string(),
            StorageFilter::Any(children) if children.is_empty() => "1 == 0".to_string(),
            StorageFilter::All(children) => join_predicates(children, " && "),
            StorageFilter::Any(children) => join_predicates(children, " || "),
            StorageFilter::Field { path, condition } => condition.jsonpath_predicate(path),
        }
    }
}

fn join_predicates(children: &[StorageFilter], operator: &str) -> String {
    children
        .iter()
        .map(|child| format!("({})", child.jsonpath_predicate()))
        .collect::<Vec<_>>()
        .join(operator)
}

impl Condition {
    fn to_document(&self) -> Value {
        match self {
            Condition::Eq(value) => value.clone(),
            Condition::Ne(value) => json!({ "$ne": value }),
            Condition::In(values) => json!({ "$in": values }),
            Condition::Range { min, max } => {
                let mut doc = Map::new();
                if let Some(min) = min {
                    doc.insert("$gte".into(), min.clone());
                }
                if let Some(max) = max {
                    doc.insert("$lte".into(), max.clone());
                }
                Value::Object(doc)
            }
            Condition::Contains(needle) => {
                json!({ "$regex": regex::escape(needle), "$options": "i" })
            }
            Condition::NotContains(needle) => {
                json!({ "$not": { "$regex": regex::escape(needle), "$options": "i" } })
            }
            Condition::Present => json!({ "$exists": true, "$nin": [null, "", false] }),
        }
    }

    fn holds(&self, values: &[&Value]) -> bool {
        match self {
            Condition::Eq(expected) => values.iter().any(|value| loosely_equal(value, expected)),
            Condition::Ne(expected) => !values.iter().any(|value| loosely_equal(value, expected)),
            Condition::In(expected) => values
                .iter()
                .any(|value| expected.iter().any(|candidate| loosely_equal(value, candidate))),
            Condition::Range { min, max } => values.iter().any(|value| {
                let above = min.as_ref().map_or(true, |min| {
                    matches!(
                        compare_scalars(value, min),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                });
                let below = max.as_ref().map_or(true, |max| {
                    matches!(
                        compare_scalars(value, max),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                });
                above && below
            }),
            Condition::Contains(needle) => contains_ignore_case(values, needle),
            Condition::NotContains(needle) => !contains_ignore_case(values, needle),
            Condition::Present => values.iter().any(|value| {
                !matches!(value, Value::Null | Value::Bool(false))
                    && value.as_str().map_or(true, |s| !s.is_empty())
            }),
        }
    }

    fn jsonpath_predicate(&self, path: &str) -> String {
        let accessor = jsonpath_accessor(path);
        match self {
            Condition::Eq(value) => {
                format!("exists({accessor} ? (@ == {}))", jsonpath_literal(value))
            }
            Condition::Ne(value) => {
                format!("!(exists({accessor} ? (@ == {})))", jsonpath_literal(value))
            }
            Condition::In(values) if values.is_empty() => "1 == 0".to_string(),
            Condition::In(values) => {
                let alternatives = values
                    .iter()
                    .map(|value| format!("@ == {}", jsonpath_literal(value)))
                    .collect::<Vec<_>>()
                    .join(" || ");
                format!("exists({accessor} ? ({alternatives}))")
            }
            Condition::Range { min, max } => {
                let mut bounds = Vec::new();
                if let Some(min) = min {
                    bounds.push(format!("@ >= {}", jsonpath_literal(min)));
                }
                if let Some(max) = max {
                    bounds.push(format!("@ <= {}", jsonpath_literal(max)));
                }
                if bounds.is_empty() {
                    format!("exists({accessor})")
                } else {
                    format!("exists({accessor} ? ({}))", bounds.join(" && "))
                }
            }
            Condition::Contains(needle) => format!(
                "exists({accessor} ? (@ like_regex {} flag \"i\"))",
                jsonpath_string(&regex::escape(needle))
            ),
            Condition::NotContains(needle) => format!(
                "!(exists({accessor} ? (@ like_regex {} flag \"i\")))",
                jsonpath_string(&regex::escape(needle))
            ),
            // Mixed-type comparisons are "unknown" in SQL/JSON, so guard on type.
            Condition::Present => format!(
                "exists({accessor} ? (@ == true || (@.type() == \"string\" && @ != \"\") \
                 || @.type() == \"number\" || @.type() == \"object\" || @.type() == \"array\"))"
            ),
        }
    }
}

/// Collects every value reachable through a dotted path, flattening arrays
/// along the way and at the leaf.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![document];

    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => next.extend(map.get(segment)),
                Value::Array(items) => next.extend(
                    items
                        .iter()
                        .filter_map(|item| item.as_object().and_then(|map| map.get(segment))),
                ),
                _ => {}
            }
        }
        current = next;
    }

    current
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect()
}

/// Orders two scalars of the same kind; mixed kinds are incomparable.
pub fn compare_scalars(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare_scalars(left, right) == Some(Ordering::Equal),
        _ => left == right,
    }
}

fn contains_ignore_case(values: &[&Value], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    values
        .iter()
        .filter_map(|value| value.as_str())
        .any(|text| text.to_lowercase().contains(&needle))
}

/// Lax-mode path yielding every string stored under `path`, array elements
/// included, for `jsonb_path_query`.
pub fn jsonpath_string_values(path: &str) -> String {
    format!("{}[*] ? (@.type() == \"string\")", jsonpath_from("$", path))
}

fn jsonpath_accessor(path: &str) -> String {
    jsonpath_from("@", path)
}

fn jsonpath_from(root: &str, path: &str) -> String {
    path.split('.')
        .fold(String::from(root), |mut accessor, segment| {
            accessor.push('.');
            accessor.push_str(&jsonpath_string(segment));
            accessor
        })
}

fn jsonpath_string(raw: &str) -> String {
    // JSON string escaping is accepted verbatim by the jsonpath grammar.
    Value::String(raw.to_string()).to_string()
}

fn jsonpath_literal(value: &Value) -> String {
    match value {
        Value::String(raw) => jsonpath_string(raw),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => "null".to_string(),
    }
}
