use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use super::fields;
use super::storage_filter::{compare_scalars, resolve_path};

/// Sortable attributes; anything else requested falls back to `LastUpdated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    LastUpdated,
    CreatedAt,
    Experience,
    Salary,
    Name,
    ProfileCompletion,
    AdminRating,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "createdat" | "created" | "newest" => Self::CreatedAt,
            "experience" | "totalexperience" => Self::Experience,
            "salary" | "currentsalary" => Self::Salary,
            "name" | "fullname" => Self::Name,
            "profilecompletion" | "completion" => Self::ProfileCompletion,
            "adminrating" | "rating" => Self::AdminRating,
            _ => Self::LastUpdated,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::LastUpdated => fields::UPDATED_AT,
            Self::CreatedAt => fields::CREATED_AT,
            Self::Experience => fields::TOTAL_EXPERIENCE,
            Self::Salary => fields::CURRENT_SALARY,
            Self::Name => fields::FULL_NAME,
            Self::ProfileCompletion => fields::COMPLETION,
            Self::AdminRating => fields::ADMIN_RATING,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("asc" | "ascending" | "1") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: SortField::parse(sort_by),
            order: SortOrder::parse(sort_order),
        }
    }

    /// Relevance re-ranking only applies on top of the default ordering.
    pub fn is_default_field(&self) -> bool {
        self.field == SortField::LastUpdated
    }

    /// Document comparison used by the in-memory store. Missing values sort
    /// as the lowest value, numbers before strings.
    pub fn compare(&self, left: &Value, right: &Value) -> Ordering {
        let path = self.field.path();
        let ordering = compare_sort_keys(
            resolve_path(left, path).first().copied(),
            resolve_path(right, path).first().copied(),
        );
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

fn compare_sort_keys(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Bool(_)) => 3,
            Some(_) => 4,
        }
    }

    match (left, right) {
        (Some(a), Some(b)) => compare_scalars(a, b).unwrap_or_else(|| rank(left).cmp(&rank(right))),
        _ => rank(left).cmp(&rank(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_sort_keys_fall_back_to_last_updated_desc() {
        let spec = SortSpec::parse(Some("favouriteColour"), Some("sideways"));
        assert_eq!(spec, SortSpec::default());
        assert!(spec.is_default_field());
        assert_eq!(SortSpec::parse(Some("experience"), Some("ASC")).order, SortOrder::Asc);
    }

    #[test]
    fn compares_documents_on_the_sort_path() {
        let spec = SortSpec::parse(Some("experience"), Some("desc"));
        let senior = json!({ "professional": { "totalExperience": 9 } });
        let junior = json!({ "professional": { "totalExperience": 1.5 } });
        let unknown = json!({});

        assert_eq!(spec.compare(&senior, &junior), Ordering::Less);
        assert_eq!(spec.compare(&junior, &unknown), Ordering::Less);

        let asc = SortSpec::parse(Some("experience"), Some("asc"));
        assert_eq!(asc.compare(&unknown, &junior), Ordering::Less);
    }

    #[test]
    fn serializes_canonical_names() {
        assert_eq!(serde_json::to_value(SortField::LastUpdated).unwrap(), json!("lastUpdated"));
        assert_eq!(serde_json::to_value(SortOrder::Desc).unwrap(), json!("desc"));
    }
}
