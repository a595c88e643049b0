use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Read-only view of a stored candidate profile, limited to the attributes
/// the relevance scorer looks at. Missing or oddly typed attributes fall back
/// to empty values rather than failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateRecord {
    pub personal_info: PersonalInfo,
    pub professional: Professional,
    pub education: Education,
    pub profile_status: ProfileStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "loose_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub current_city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Professional {
    #[serde(deserialize_with = "loose_string")]
    pub current_job_title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub current_company: Option<String>,
    #[serde(deserialize_with = "loose_strings")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "loose_strings")]
    pub key_skills: Vec<String>,
    #[serde(deserialize_with = "loose_number")]
    pub total_experience: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "loose_string")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub institution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileStatus {
    #[serde(deserialize_with = "loose_number")]
    pub completion_percentage: Option<f64>,
}

impl CandidateRecord {
    pub fn from_document(document: &Value) -> Self {
        match Self::deserialize(document) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "candidate document did not match the expected shape");
                Self::default()
            }
        }
    }

    /// Searchable text used by keyword scoring, lowercased and space-joined.
    pub fn keyword_haystack(&self) -> String {
        let singles = [
            &self.personal_info.full_name,
            &self.professional.current_job_title,
            &self.professional.current_company,
        ];
        let trailing = [&self.education.degree, &self.education.institution];

        singles
            .into_iter()
            .flatten()
            .chain(self.professional.skills.iter())
            .chain(self.professional.key_skills.iter())
            .chain(trailing.into_iter().flatten())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn loose_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        Some(Value::String(text)) => vec![text],
        _ => Vec::new(),
    })
}

fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_groups_leniently() {
        let record = CandidateRecord::from_document(&json!({
            "personalInfo": { "fullName": "Ravi Kumar", "currentCity": "Chennai", "age": 31 },
            "professional": {
                "currentJobTitle": "Data Engineer",
                "skills": ["Spark", 42, "Scala"],
                "keySkills": "Airflow",
                "totalExperience": "7.5"
            },
            "education": { "degree": "B.Tech", "institution": null },
            "profileStatus": { "completionPercentage": 85 }
        }));

        assert_eq!(record.personal_info.current_city.as_deref(), Some("Chennai"));
        assert_eq!(record.professional.skills, vec!["Spark", "Scala"]);
        assert_eq!(record.professional.key_skills, vec!["Airflow"]);
        assert_eq!(record.professional.total_experience, Some(7.5));
        assert_eq!(record.education.institution, None);
        assert_eq!(record.profile_status.completion_percentage, Some(85.0));
    }

    #[test]
    fn non_object_document_yields_empty_record() {
        let record = CandidateRecord::from_document(&json!(["not", "a", "profile"]));
        assert_eq!(record, CandidateRecord::default());
    }

    #[test]
    fn haystack_joins_searchable_fields() {
        let record = CandidateRecord::from_document(&json!({
            "personalInfo": { "fullName": "Meera Nair" },
            "professional": { "currentCompany": "Acme", "skills": ["Go"], "keySkills": ["gRPC"] },
            "education": { "institution": "IIT Madras" }
        }));

        assert_eq!(record.keyword_haystack(), "meera nair acme go grpc iit madras");
    }
}
