use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How the per-key conditions of a search are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    And,
    Or,
}

impl SearchMode {
    /// Case-insensitive; anything other than `or` falls back to AND.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("or") => SearchMode::Or,
            _ => SearchMode::And,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::And => "and",
            SearchMode::Or => "or",
        }
    }
}

impl<'de> Deserialize<'de> for SearchMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::parse(raw.as_ref().and_then(Value::as_str)))
    }
}

/// Independent optional lower/upper bounds of a range key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Caller-supplied search constraints.
///
/// Every key is optional. Multi-value keys accept either a JSON array or a
/// single string, range bounds accept numbers or numeric strings, and values
/// that cannot be interpreted are dropped instead of rejected, so a sloppy
/// request degrades to a looser filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub exclude_keywords: Option<String>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub key_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_experience: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_experience: Option<i64>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub current_city: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub preferred_cities: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub pincodes: Vec<String>,
    #[serde(deserialize_with = "lenient_bool", skip_serializing_if = "is_false")]
    pub include_willing_to_relocate: bool,
    #[serde(deserialize_with = "lenient_bool", skip_serializing_if = "is_false")]
    pub exclude_anywhere_in_india: bool,

    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_expected_salary: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_expected_salary: Option<i64>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub notice_period: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub company_type: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub education_level: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub degrees: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub institutions: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub education_status: Vec<String>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_marks: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_marks: Option<i64>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub gender: Vec<String>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub disability_status: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub fluency: Vec<String>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub employment_type: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub job_type: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub work_mode: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub shift_type: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,

    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub show_candidates_with: Vec<String>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub last_active_candidates: Vec<String>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_profile_completion: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_profile_completion: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_admin_rating: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_admin_rating: Option<i64>,
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub admin_tags: Vec<String>,

    #[serde(deserialize_with = "lenient_bool", skip_serializing_if = "is_false")]
    pub include_inactive: bool,
}

impl FilterSpec {
    pub fn experience(&self) -> Bounds {
        Bounds::new(self.min_experience, self.max_experience)
    }

    pub fn salary(&self) -> Bounds {
        Bounds::new(self.min_salary, self.max_salary)
    }

    pub fn expected_salary(&self) -> Bounds {
        Bounds::new(self.min_expected_salary, self.max_expected_salary)
    }

    pub fn marks(&self) -> Bounds {
        Bounds::new(self.min_marks, self.max_marks)
    }

    pub fn age(&self) -> Bounds {
        Bounds::new(self.min_age, self.max_age)
    }

    pub fn profile_completion(&self) -> Bounds {
        Bounds::new(self.min_profile_completion, self.max_profile_completion)
    }

    pub fn admin_rating(&self) -> Bounds {
        Bounds::new(self.min_admin_rating, self.max_admin_rating)
    }

    /// Number of keys carrying a value, as reported in search stats.
    pub fn applied_filter_count(&self) -> usize {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_object().map(|map| map.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.applied_filter_count() == 0
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Best-effort integer parse of a leading `[+-]digits` run, mirroring the way
/// form values arrive from the admin console (`"5yrs"` -> 5, `"4.9"` -> 4).
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(raw) => parse_leading_int(raw),
        _ => None,
    }
}

pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_int))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_i64() == Some(1),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            raw == "1" || raw.eq_ignore_ascii_case("true")
        }
        _ => false,
    })
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(raw.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn item(value: &Value) -> Option<String> {
        match value {
            Value::String(raw) => Some(raw.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(values)) => values.iter().filter_map(item).collect(),
        Some(other) => item(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leading_int_parse_is_best_effort() {
        assert_eq!(parse_leading_int("5"), Some(5));
        assert_eq!(parse_leading_int(" 12yrs"), Some(12));
        assert_eq!(parse_leading_int("4.9"), Some(4));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn malformed_bounds_become_absent() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "minExperience": "two",
            "maxExperience": "5",
            "minSalary": null,
            "maxSalary": 120000.75,
            "minMarks": "",
        }))
        .unwrap();

        assert_eq!(spec.experience(), Bounds::new(None, Some(5)));
        assert_eq!(spec.salary(), Bounds::new(None, Some(120000)));
        assert!(!spec.marks().is_set());
    }

    #[test]
    fn multi_value_keys_accept_single_strings_and_drop_blanks() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "keySkills": ["Python", " ", "SQL"],
            "currentCity": "Pune",
            "gender": [],
            "pincodes": [411001],
        }))
        .unwrap();

        assert_eq!(spec.key_skills, vec!["Python", "SQL"]);
        assert_eq!(spec.current_city, vec!["Pune"]);
        assert!(spec.gender.is_empty());
        assert_eq!(spec.pincodes, vec!["411001"]);
    }

    #[test]
    fn blank_keywords_and_loose_booleans() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "keywords": "   ",
            "includeInactive": "true",
            "includeWillingToRelocate": 1,
            "excludeAnywhereInIndia": "no",
            "somethingUnknown": 42,
        }))
        .unwrap();

        assert_eq!(spec.keywords, None);
        assert!(spec.include_inactive);
        assert!(spec.include_willing_to_relocate);
        assert!(!spec.exclude_anywhere_in_india);
    }

    #[test]
    fn search_mode_defaults_to_and() {
        assert_eq!(SearchMode::parse(Some("OR")), SearchMode::Or);
        assert_eq!(SearchMode::parse(Some("and")), SearchMode::And);
        assert_eq!(SearchMode::parse(Some("xor")), SearchMode::And);
        assert_eq!(SearchMode::parse(None), SearchMode::And);
    }

    #[test]
    fn applied_filters_omit_absent_keys() {
        let spec = FilterSpec {
            keywords: Some("rust".into()),
            min_experience: Some(2),
            skills: vec!["Rust".into()],
            ..FilterSpec::default()
        };

        let applied = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            applied,
            json!({ "keywords": "rust", "skills": ["Rust"], "minExperience": 2 })
        );
        assert_eq!(spec.applied_filter_count(), 3);
        assert!(FilterSpec::default().is_empty());
    }
}
