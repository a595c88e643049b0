use serde::Serialize;
use tracing::debug;

use super::fields;
use crate::store::{CandidateStore, CandidateStoreError};

/// Prefixes shorter than this return nothing without querying storage. The
/// length is taken as given, whitespace included.
pub const MIN_PREFIX_CHARS: usize = 2;
/// Cap on the combined `All` result.
pub const ALL_SUGGESTIONS_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Skills,
    Locations,
    Companies,
    JobRoles,
    Institutions,
    Certifications,
    #[default]
    All,
}

impl SuggestionKind {
    /// Kinds the `All` lookup fans out to, in result order.
    pub const ALL_SOURCES: [SuggestionKind; 4] = [
        SuggestionKind::Skills,
        SuggestionKind::Locations,
        SuggestionKind::Companies,
        SuggestionKind::JobRoles,
    ];

    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::All;
        };
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "skills" | "skill" => Self::Skills,
            "locations" | "location" | "cities" | "city" => Self::Locations,
            "companies" | "company" => Self::Companies,
            "job-roles" | "jobroles" | "roles" | "job-titles" | "jobtitles" => Self::JobRoles,
            "institutions" | "institution" | "colleges" => Self::Institutions,
            "certifications" | "certification" => Self::Certifications,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skills => "skills",
            Self::Locations => "locations",
            Self::Companies => "companies",
            Self::JobRoles => "job-roles",
            Self::Institutions => "institutions",
            Self::Certifications => "certifications",
            Self::All => "all",
        }
    }

    /// Attribute path and result cap of a single-source kind.
    fn source(self) -> Option<(&'static str, usize)> {
        match self {
            Self::Skills => Some((fields::SKILLS, 10)),
            Self::Locations => Some((fields::CURRENT_CITY, 10)),
            Self::Companies => Some((fields::COMPANY, 10)),
            Self::JobRoles => Some((fields::JOB_TITLE, 10)),
            Self::Institutions => Some((fields::INSTITUTION, 10)),
            Self::Certifications => Some((fields::CERTIFICATIONS, 12)),
            Self::All => None,
        }
    }
}

/// Autocomplete values for `prefix`.
///
/// `All` queries skills, locations, companies and job roles concurrently,
/// concatenates them in that order and keeps the first
/// [`ALL_SUGGESTIONS_LIMIT`].
pub async fn get_suggestions(
    store: &dyn CandidateStore,
    prefix: &str,
    kind: SuggestionKind,
) -> Result<Vec<String>, CandidateStoreError> {
    if prefix.chars().count() < MIN_PREFIX_CHARS {
        return Ok(Vec::new());
    }

    let suggestions = match kind.source() {
        Some((path, limit)) => store.distinct_values(path, prefix, limit).await?,
        None => {
            let lookup = |kind: SuggestionKind| async move {
                let (path, limit) = kind
                    .source()
                    .ok_or_else(|| CandidateStoreError::Mapping("no source for kind".into()))?;
                store.distinct_values(path, prefix, limit).await
            };
            let [skills, locations, companies, roles] = SuggestionKind::ALL_SOURCES;
            let (skills, locations, companies, roles) = futures::try_join!(
                lookup(skills),
                lookup(locations),
                lookup(companies),
                lookup(roles)
            )?;

            skills
                .into_iter()
                .chain(locations)
                .chain(companies)
                .chain(roles)
                .take(ALL_SUGGESTIONS_LIMIT)
                .collect()
        }
    };

    debug!(kind = kind.as_str(), count = suggestions.len(), "candidate suggestions");
    Ok(suggestions)
}
