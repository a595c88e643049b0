use chrono::{DateTime, Months, NaiveDate, SecondsFormat, TimeDelta, Utc};
use serde_json::Value;
use tracing::debug;

use super::fields;
use super::filter_spec::{Bounds, FilterSpec, SearchMode, parse_leading_int};
use super::storage_filter::{Condition, StorageFilter};

/// Field-path flavour a compiler emits. The legacy endpoint drifted from the
/// advanced one on a few attribute paths and both are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Advanced,
    Legacy,
}

/// One logical condition produced from a single filter key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Clause {
    /// Top-level key the condition occupies in a flat query document.
    pub slot: String,
    pub filter: StorageFilter,
    /// Applied on top of the combined group regardless of the search mode.
    pub always: bool,
}

impl Clause {
    fn grouped(filter: StorageFilter) -> Self {
        let slot = match &filter {
            StorageFilter::Field { path, .. } => path.clone(),
            StorageFilter::Any(_) => "$or".to_string(),
            StorageFilter::All(_) => "$and".to_string(),
        };
        Self {
            slot,
            filter,
            always: false,
        }
    }
}

/// Status tags accepted by `showCandidatesWith`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatusTag {
    Resume,
    ProfilePicture,
    Verified,
    CompleteProfile,
}

impl CandidateStatusTag {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['_', ' '], "-");
        match normalized.as_str() {
            "resume" => Some(Self::Resume),
            "profile-picture" | "profilepicture" | "photo" => Some(Self::ProfilePicture),
            "verified" => Some(Self::Verified),
            "complete-profile" | "completeprofile" | "complete" => Some(Self::CompleteProfile),
            _ => None,
        }
    }

    fn filter(self) -> StorageFilter {
        match self {
            Self::Resume => StorageFilter::field(fields::RESUME, Condition::Present),
            Self::ProfilePicture => StorageFilter::field(fields::PROFILE_PICTURE, Condition::Present),
            Self::Verified => StorageFilter::eq(fields::IS_VERIFIED, true),
            Self::CompleteProfile => StorageFilter::field(
                fields::COMPLETION,
                Condition::Range {
                    min: Some(Value::from(fields::COMPLETE_PROFILE_THRESHOLD)),
                    max: None,
                },
            ),
        }
    }
}

/// Compiles a [`FilterSpec`] into a storage filter using the current time for
/// the relative (last-active, age) keys.
pub fn compile_filter(spec: &FilterSpec, mode: SearchMode) -> StorageFilter {
    compile_filter_at(spec, mode, Utc::now())
}

/// Deterministic variant of [`compile_filter`] with an explicit clock.
///
/// Per-key conditions combine with `mode`; `excludeKeywords` and the
/// active-profile restriction are AND'ed on top of that group. An empty `FilterSpec`
/// compiles to the active-profile restriction alone.
pub fn compile_filter_at(spec: &FilterSpec, mode: SearchMode, now: DateTime<Utc>) -> StorageFilter {
    let mut grouped = Vec::new();
    let mut required = Vec::new();

    for clause in emit_clauses(spec, Dialect::Advanced, now) {
        if clause.always {
            required.push(clause.filter);
        } else {
            grouped.push(clause.filter);
        }
    }

    let condition_count = grouped.len();
    let mut combined = match mode {
        _ if grouped.is_empty() => Vec::new(),
        SearchMode::And => grouped,
        SearchMode::Or => vec![StorageFilter::Any(grouped)],
    };
    combined.extend(required);

    if !spec.include_inactive {
        combined.push(active_only());
    }

    debug!(
        mode = mode.as_str(),
        condition_count,
        include_inactive = spec.include_inactive,
        "compiled candidate filter"
    );

    match combined.len() {
        1 => combined.remove(0),
        _ => StorageFilter::All(combined),
    }
}

pub(crate) fn active_only() -> StorageFilter {
    StorageFilter::eq(fields::IS_ACTIVE, true)
}

/// Emits one clause per recognized, non-empty key, in declaration order.
pub(crate) fn emit_clauses(spec: &FilterSpec, dialect: Dialect, now: DateTime<Utc>) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut push = |filter: Option<StorageFilter>| {
        if let Some(filter) = filter {
            clauses.push(Clause::grouped(filter));
        }
    };

    push(spec.keywords.as_deref().map(keyword_filter));

    push(membership(fields::SKILLS, &spec.skills));
    push(membership(fields::KEY_SKILLS, &spec.key_skills));
    push(range(fields::TOTAL_EXPERIENCE, spec.experience()));

    push(membership(fields::CURRENT_CITY, &spec.current_city));
    push(membership(fields::PREFERRED_LOCATIONS, &spec.preferred_cities));
    push(membership(fields::PINCODE, &spec.pincodes));
    push(
        spec.include_willing_to_relocate
            .then(|| StorageFilter::eq(fields::WILLING_TO_RELOCATE, true)),
    );
    push(spec.exclude_anywhere_in_india.then(|| {
        StorageFilter::field(
            fields::PREFERRED_LOCATIONS,
            Condition::Ne(Value::from(fields::ANYWHERE_IN_INDIA)),
        )
    }));

    push(range(fields::CURRENT_SALARY, spec.salary()));
    push(range(fields::EXPECTED_SALARY, spec.expected_salary()));
    push(membership(fields::NOTICE_PERIOD, &spec.notice_period));
    push(membership(fields::COMPANY_TYPE, &spec.company_type));
    push(membership(fields::INDUSTRY, &spec.industries));
    push(membership(fields::DEPARTMENT, &spec.departments));

    push(membership(fields::EDUCATION_LEVEL, &spec.education_level));
    push(membership(fields::DEGREE, &spec.degrees));
    push(membership(fields::SPECIALIZATION, &spec.specializations));
    push(membership(fields::INSTITUTION, &spec.institutions));
    let education_status_path = match dialect {
        Dialect::Advanced => fields::EDUCATION_STATUS,
        Dialect::Legacy => fields::LEGACY_EDUCATION_STATUS,
    };
    push(membership(education_status_path, &spec.education_status));
    push(range(fields::MARKS, spec.marks()));

    push(membership(fields::GENDER, &spec.gender));
    push(age_window(spec.age(), now));
    push(membership(fields::DISABILITY_STATUS, &spec.disability_status));
    push(membership(fields::CATEGORY, &spec.category));
    push(membership(fields::LANGUAGE, &spec.languages));
    push(membership(fields::LANGUAGE_FLUENCY, &spec.fluency));

    push(membership(fields::EMPLOYMENT_TYPE, &spec.employment_type));
    push(membership(fields::JOB_TYPE, &spec.job_type));
    push(membership(fields::WORK_MODE, &spec.work_mode));
    push(membership(fields::SHIFT_TYPE, &spec.shift_type));
    push(membership(fields::ASSETS, &spec.assets));

    push(status_tags(&spec.show_candidates_with));
    push(last_active(&spec.last_active_candidates, now));
    push(range(fields::COMPLETION, spec.profile_completion()));
    push(range(fields::ADMIN_RATING, spec.admin_rating()));
    push(membership(fields::ADMIN_TAGS, &spec.admin_tags));

    if let Some(excluded) = spec.exclude_keywords.as_deref() {
        clauses.extend(fields::EXCLUDE_KEYWORD_FIELDS.iter().map(|path| Clause {
            slot: (*path).to_string(),
            filter: StorageFilter::field(*path, Condition::NotContains(excluded.to_string())),
            always: true,
        }));
    }

    clauses
}

fn keyword_filter(keywords: &str) -> StorageFilter {
    StorageFilter::Any(
        fields::KEYWORD_FIELDS
            .iter()
            .map(|path| StorageFilter::contains(*path, keywords))
            .collect(),
    )
}

fn membership(path: &str, values: &[String]) -> Option<StorageFilter> {
    (!values.is_empty()).then(|| StorageFilter::one_of(path, values.iter().cloned()))
}

fn range(path: &str, bounds: Bounds) -> Option<StorageFilter> {
    bounds.is_set().then(|| {
        StorageFilter::field(
            path,
            Condition::Range {
                min: bounds.min.map(Value::from),
                max: bounds.max.map(Value::from),
            },
        )
    })
}

/// Translates an age range into a date-of-birth window.
///
/// Dates of birth are stored either as `YYYY-MM-DD` or as full timestamps,
/// so the upper bound covers the whole of its day.
fn age_window(bounds: Bounds, now: DateTime<Utc>) -> Option<StorageFilter> {
    let today = now.date_naive();
    let years_ago = |years: i64| {
        u32::try_from(years)
            .ok()
            .and_then(|years| years.checked_mul(12))
            .and_then(|months| today.checked_sub_months(Months::new(months)))
    };

    // Born on or before this date means at least `min_age` years old.
    let latest_birth = bounds.min.and_then(years_ago);
    // Born after this date means younger than `max_age + 1` years.
    let earliest_birth = bounds
        .max
        .and_then(|max| max.checked_add(1))
        .and_then(years_ago)
        .and_then(|date| date.succ_opt());

    if latest_birth.is_none() && earliest_birth.is_none() {
        return None;
    }

    let start_of_day = |date: NaiveDate| Value::from(date.format("%Y-%m-%d").to_string());
    let end_of_day = |date: NaiveDate| Value::from(date.format("%Y-%m-%dT23:59:59.999Z").to_string());
    Some(StorageFilter::field(
        fields::DATE_OF_BIRTH,
        Condition::Range {
            min: earliest_birth.map(start_of_day),
            max: latest_birth.map(end_of_day),
        },
    ))
}

fn status_tags(raw_tags: &[String]) -> Option<StorageFilter> {
    let mut tags = Vec::new();
    for tag in raw_tags.iter().filter_map(|raw| CandidateStatusTag::parse(raw)) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    (!tags.is_empty()).then(|| StorageFilter::Any(tags.into_iter().map(CandidateStatusTag::filter).collect()))
}

/// `"30-days"` style window on the profile's last update timestamp.
fn last_active(values: &[String], now: DateTime<Utc>) -> Option<StorageFilter> {
    let days = values.first().and_then(|raw| parse_leading_int(raw))?;
    if days < 0 {
        return None;
    }

    let cutoff = TimeDelta::try_days(days).and_then(|delta| now.checked_sub_signed(delta))?;
    Some(StorageFilter::field(
        fields::UPDATED_AT,
        Condition::Range {
            min: Some(Value::from(cutoff.to_rfc3339_opts(SecondsFormat::Millis, true))),
            max: None,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn candidate(skills: &[&str], experience: i64, title: &str) -> Value {
        json!({
            "personalInfo": { "fullName": "Test Candidate", "currentCity": "Pune" },
            "professional": {
                "currentJobTitle": title,
                "skills": skills,
                "keySkills": skills,
                "totalExperience": experience
            },
            "profileStatus": { "isActive": true, "completionPercentage": 70 },
            "updatedAt": "2026-10-10T08:00:00.000Z"
        })
    }

    #[test]
    fn empty_spec_restricts_to_active_profiles() {
        let filter = compile_filter_at(&FilterSpec::default(), SearchMode::And, fixed_now());
        assert_eq!(filter, StorageFilter::eq(fields::IS_ACTIVE, true));

        let or_filter = compile_filter_at(&FilterSpec::default(), SearchMode::Or, fixed_now());
        assert_eq!(or_filter, filter);
    }

    #[test]
    fn include_inactive_drops_the_active_restriction() {
        let spec = FilterSpec {
            include_inactive: true,
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());
        assert!(filter.is_unconstrained());

        let mut inactive = candidate(&["Rust"], 3, "Engineer");
        inactive["profileStatus"]["isActive"] = json!(false);
        assert!(filter.matches(&inactive));
        assert!(!compile_filter(&FilterSpec::default(), SearchMode::And).matches(&inactive));
    }

    #[test]
    fn keywords_search_every_text_attribute() {
        let spec = FilterSpec {
            keywords: Some("DEVELOPER".into()),
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        assert!(filter.matches(&candidate(&["Rust"], 3, "Backend developer")));
        assert!(!filter.matches(&candidate(&["Rust"], 3, "Accountant")));

        let StorageFilter::All(parts) = &filter else {
            panic!("expected a conjunction, got {filter:?}");
        };
        let StorageFilter::Any(alternatives) = &parts[0] else {
            panic!("expected keyword disjunction");
        };
        assert_eq!(alternatives.len(), fields::KEYWORD_FIELDS.len());
    }

    #[test]
    fn or_mode_needs_one_condition_and_mode_needs_all() {
        let spec = FilterSpec {
            key_skills: vec!["Python".into()],
            current_city: vec!["Pune".into()],
            min_experience: Some(10),
            ..FilterSpec::default()
        };
        // Satisfies skills + city, fails experience.
        let doc = candidate(&["Python"], 4, "Analyst");

        assert!(compile_filter_at(&spec, SearchMode::Or, fixed_now()).matches(&doc));
        assert!(!compile_filter_at(&spec, SearchMode::And, fixed_now()).matches(&doc));
    }

    #[test]
    fn active_restriction_is_outside_the_or_group() {
        let spec = FilterSpec {
            key_skills: vec!["Python".into()],
            ..FilterSpec::default()
        };
        let mut doc = candidate(&["Python"], 4, "Analyst");
        doc["profileStatus"]["isActive"] = json!(false);

        assert!(!compile_filter_at(&spec, SearchMode::Or, fixed_now()).matches(&doc));
    }

    #[test]
    fn exclude_keywords_apply_in_every_mode() {
        let spec = FilterSpec {
            key_skills: vec!["Java".into()],
            current_city: vec!["Pune".into()],
            exclude_keywords: Some("intern".into()),
            ..FilterSpec::default()
        };
        let intern = candidate(&["Java"], 1, "Java Intern");
        let engineer = candidate(&["Java"], 1, "Java Engineer");

        for mode in [SearchMode::And, SearchMode::Or] {
            let filter = compile_filter_at(&spec, mode, fixed_now());
            assert!(!filter.matches(&intern), "{mode:?} kept an excluded candidate");
            assert!(filter.matches(&engineer));
        }

        let skill_excluded = candidate(&["Java", "Internship"], 1, "Engineer");
        assert!(!compile_filter_at(&spec, SearchMode::Or, fixed_now()).matches(&skill_excluded));
    }

    #[test]
    fn skills_and_experience_window_end_to_end() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "keySkills": ["Python", "SQL"],
            "minExperience": 2,
            "maxExperience": 5
        }))
        .unwrap();
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        assert!(filter.matches(&candidate(&["SQL"], 3, "Analyst")));
        assert!(filter.matches(&candidate(&["Python", "SQL"], 5, "Analyst")));
        assert!(!filter.matches(&candidate(&["Python"], 6, "Analyst")));
        assert!(!filter.matches(&candidate(&["Excel"], 3, "Analyst")));

        let mut inactive = candidate(&["Python"], 3, "Analyst");
        inactive["profileStatus"]["isActive"] = json!(false);
        assert!(!filter.matches(&inactive));
    }

    #[test]
    fn malformed_bounds_loosen_instead_of_failing() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "minExperience": "lots",
            "maxExperience": "abc"
        }))
        .unwrap();
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());
        assert_eq!(filter, active_only());
    }

    #[test]
    fn show_candidates_with_is_one_disjunction() {
        let spec = FilterSpec {
            show_candidates_with: vec!["resume".into(), "verified".into(), "bogus".into()],
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let mut verified = candidate(&["Go"], 2, "Engineer");
        verified["profileStatus"]["isVerified"] = json!(true);
        let mut with_resume = candidate(&["Go"], 2, "Engineer");
        with_resume["documents"] = json!({ "resume": "uploads/cv.pdf" });
        let neither = candidate(&["Go"], 2, "Engineer");

        assert!(filter.matches(&verified));
        assert!(filter.matches(&with_resume));
        assert!(!filter.matches(&neither));
    }

    #[test]
    fn profile_picture_and_complete_profile_tags() {
        let spec = FilterSpec {
            show_candidates_with: vec!["profile_picture".into(), "Complete Profile".into()],
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let mut with_photo = candidate(&["Go"], 2, "Engineer");
        with_photo["personalInfo"]["profilePicture"] = json!("uploads/me.png");
        let mut complete = candidate(&["Go"], 2, "Engineer");
        complete["profileStatus"]["completionPercentage"] = json!(100);
        let mut empty_photo = candidate(&["Go"], 2, "Engineer");
        empty_photo["personalInfo"]["profilePicture"] = json!("");
        let mut almost_complete = candidate(&["Go"], 2, "Engineer");
        almost_complete["profileStatus"]["completionPercentage"] = json!(99);

        assert!(filter.matches(&with_photo));
        assert!(filter.matches(&complete));
        assert!(!filter.matches(&empty_photo));
        assert!(!filter.matches(&almost_complete));
    }

    #[test]
    fn willing_to_relocate_requires_true() {
        let spec = FilterSpec {
            include_willing_to_relocate: true,
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let mut willing = candidate(&["Go"], 2, "Engineer");
        willing["preferences"] = json!({ "willingToRelocate": true });
        let mut unwilling = candidate(&["Go"], 2, "Engineer");
        unwilling["preferences"] = json!({ "willingToRelocate": false });

        assert!(filter.matches(&willing));
        assert!(!filter.matches(&unwilling));
        assert!(!filter.matches(&candidate(&["Go"], 2, "Engineer")));
    }

    #[test]
    fn exclude_anywhere_in_india_checks_every_preferred_location() {
        let spec = FilterSpec {
            exclude_anywhere_in_india: true,
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());
        assert_eq!(
            filter.to_document(),
            json!({ "$and": [
                { "preferences.preferredLocations": { "$ne": "Anywhere in India" } },
                { "profileStatus.isActive": true }
            ] })
        );

        let prefers = |locations: Value| {
            let mut doc = candidate(&["Go"], 2, "Engineer");
            doc["preferences"] = json!({ "preferredLocations": locations });
            doc
        };
        assert!(filter.matches(&prefers(json!(["Pune", "Mumbai"]))));
        assert!(!filter.matches(&prefers(json!(["Pune", "Anywhere in India"]))));
        assert!(!filter.matches(&prefers(json!("Anywhere in India"))));
    }

    #[test]
    fn numeric_range_keys_bound_their_attributes() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "minSalary": 500000,
            "maxSalary": "900000",
            "minExpectedSalary": 800000,
            "maxExpectedSalary": 1200000,
            "minMarks": 60,
            "maxMarks": 95,
            "minProfileCompletion": 80,
            "maxProfileCompletion": 100,
            "minAdminRating": 3,
            "maxAdminRating": 5
        }))
        .unwrap();
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let mut doc = candidate(&["Go"], 2, "Engineer");
        doc["professional"]["currentSalary"] = json!(700000);
        doc["preferences"] = json!({ "expectedSalary": 1000000 });
        doc["education"] = json!({ "percentage": 72.5 });
        doc["profileStatus"]["completionPercentage"] = json!(85);
        doc["adminRating"] = json!(4);
        assert!(filter.matches(&doc));

        let outside: [(&str, Value); 5] = [
            (fields::CURRENT_SALARY, json!(950000)),
            (fields::EXPECTED_SALARY, json!(700000)),
            (fields::MARKS, json!(55)),
            (fields::COMPLETION, json!(70)),
            (fields::ADMIN_RATING, json!(2)),
        ];
        for (path, value) in outside {
            let mut out_of_range = doc.clone();
            let pointer = format!("/{}", path.replace('.', "/"));
            *out_of_range.pointer_mut(&pointer).unwrap() = value;
            assert!(!filter.matches(&out_of_range), "{path} out of range still matched");
        }
    }

    #[test]
    fn last_active_window_uses_leading_day_count() {
        let spec = FilterSpec {
            last_active_candidates: vec!["7-days".into(), "90-days".into()],
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());
        assert_eq!(
            filter,
            StorageFilter::All(vec![
                StorageFilter::field(
                    fields::UPDATED_AT,
                    Condition::Range {
                        min: Some(json!("2026-10-12T12:00:00.000Z")),
                        max: None,
                    },
                ),
                active_only(),
            ])
        );
        assert!(!filter.matches(&candidate(&["Go"], 2, "Engineer")));

        let unparsable = FilterSpec {
            last_active_candidates: vec!["recently".into()],
            ..FilterSpec::default()
        };
        assert_eq!(compile_filter_at(&unparsable, SearchMode::And, fixed_now()), active_only());
    }

    #[test]
    fn age_bounds_become_birth_date_window() {
        let spec = FilterSpec {
            min_age: Some(25),
            max_age: Some(30),
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let born = |date: &str| {
            let mut doc = candidate(&["Go"], 2, "Engineer");
            doc["personalInfo"]["dateOfBirth"] = json!(date);
            doc
        };
        assert!(filter.matches(&born("2001-10-19")));
        assert!(filter.matches(&born("1995-10-20")));
        assert!(!filter.matches(&born("1995-10-19")));
        assert!(!filter.matches(&born("2001-10-20")));
    }

    #[test]
    fn age_window_accepts_timestamped_birth_dates_on_boundary_days() {
        let spec = FilterSpec {
            min_age: Some(25),
            max_age: Some(30),
            ..FilterSpec::default()
        };
        let filter = compile_filter_at(&spec, SearchMode::And, fixed_now());

        let born = |timestamp: &str| {
            let mut doc = candidate(&["Go"], 2, "Engineer");
            doc["personalInfo"]["dateOfBirth"] = json!(timestamp);
            doc
        };
        // Turns 25 today.
        assert!(filter.matches(&born("2001-10-19T00:00:00.000Z")));
        assert!(filter.matches(&born("2001-10-19T18:30:00.000Z")));
        // Turns 31 tomorrow.
        assert!(filter.matches(&born("1995-10-20T00:00:00.000Z")));
        // Turned 31 today, or turns 25 tomorrow.
        assert!(!filter.matches(&born("1995-10-19T23:00:00.000Z")));
        assert!(!filter.matches(&born("2001-10-20T00:00:00.000Z")));
    }

    #[test]
    fn compilation_is_deterministic() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "keywords": "rust",
            "skills": ["Rust", "Go"],
            "minSalary": "400000",
            "lastActiveCandidates": ["30-days"],
            "showCandidatesWith": ["resume"],
            "excludeKeywords": "trainee"
        }))
        .unwrap();

        let first = compile_filter_at(&spec, SearchMode::Or, fixed_now());
        let second = compile_filter_at(&spec, SearchMode::Or, fixed_now());
        assert_eq!(first, second);
        assert_eq!(first.to_document(), second.to_document());
    }

    #[test]
    fn advanced_dialect_reads_education_status() {
        let spec = FilterSpec {
            education_status: vec!["completed".into()],
            ..FilterSpec::default()
        };
        let clauses = emit_clauses(&spec, Dialect::Advanced, fixed_now());
        assert_eq!(clauses[0].slot, fields::EDUCATION_STATUS);

        let legacy = emit_clauses(&spec, Dialect::Legacy, fixed_now());
        assert_eq!(legacy[0].slot, fields::LEGACY_EDUCATION_STATUS);
    }
}
