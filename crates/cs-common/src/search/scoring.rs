use serde::{Deserialize, Serialize};

use super::filter_spec::FilterSpec;
use crate::candidate::CandidateRecord;

/// Points each signal contributes to the 0-100 relevance score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub completeness: f64,
}

pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    keyword: 40.0,
    skills: 25.0,
    experience: 15.0,
    location: 10.0,
    completeness: 10.0,
};

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.keyword + self.skills + self.experience + self.location + self.completeness
    }
}

/// Experience upper bound assumed when only a minimum is requested.
const OPEN_EXPERIENCE_MAX: f64 = 100.0;

/// Relevance of one candidate to one search, in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(u8);

impl MatchScore {
    pub const MAX: MatchScore = MatchScore(100);

    pub fn from_points(points: f64) -> Self {
        if !points.is_finite() {
            return MatchScore(0);
        }
        MatchScore(points.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Per-signal points before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub completeness: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> MatchScore {
        MatchScore::from_points(
            self.keyword + self.skills + self.experience + self.location + self.completeness,
        )
    }
}

pub fn score_match(candidate: &CandidateRecord, spec: &FilterSpec) -> MatchScore {
    score_breakdown(candidate, spec).total()
}

pub fn score_breakdown(candidate: &CandidateRecord, spec: &FilterSpec) -> ScoreBreakdown {
    score_breakdown_with(candidate, spec, &DEFAULT_WEIGHTS)
}

pub fn score_breakdown_with(
    candidate: &CandidateRecord,
    spec: &FilterSpec,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    ScoreBreakdown {
        keyword: keyword_points(candidate, spec, weights),
        skills: skill_points(candidate, spec, weights),
        experience: experience_points(candidate, spec, weights),
        location: location_points(candidate, spec, weights),
        completeness: candidate
            .profile_status
            .completion_percentage
            .map_or(0.0, |completion| completion / 100.0 * weights.completeness),
    }
}

// All-or-nothing: the whole keyword string has to appear somewhere.
fn keyword_points(candidate: &CandidateRecord, spec: &FilterSpec, weights: &ScoreWeights) -> f64 {
    match spec.keywords.as_deref() {
        Some(keywords) if candidate.keyword_haystack().contains(&keywords.to_lowercase()) => {
            weights.keyword
        }
        _ => 0.0,
    }
}

fn skill_points(candidate: &CandidateRecord, spec: &FilterSpec, weights: &ScoreWeights) -> f64 {
    if spec.key_skills.is_empty() {
        return 0.0;
    }

    let owned: Vec<String> = candidate
        .professional
        .key_skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    let matched = spec
        .key_skills
        .iter()
        .map(|wanted| wanted.to_lowercase())
        .filter(|wanted| owned.iter().any(|skill| skill.contains(wanted.as_str())))
        .count();

    matched as f64 / spec.key_skills.len() as f64 * weights.skills
}

fn experience_points(candidate: &CandidateRecord, spec: &FilterSpec, weights: &ScoreWeights) -> f64 {
    let bounds = spec.experience();
    if !bounds.is_set() {
        return 0.0;
    }

    let min = bounds.min.map_or(0.0, |min| min as f64);
    let max = bounds.max.map_or(OPEN_EXPERIENCE_MAX, |max| max as f64);

    match candidate.professional.total_experience {
        Some(years) if years >= min && years <= max => weights.experience,
        _ => 0.0,
    }
}

fn location_points(candidate: &CandidateRecord, spec: &FilterSpec, weights: &ScoreWeights) -> f64 {
    match candidate.personal_info.current_city.as_ref() {
        Some(city) if spec.current_city.contains(city) => weights.location,
        _ => 0.0,
    }
}

/// Stable re-order by descending score; ties keep their storage order.
pub fn rank_by_score<T>(items: &mut [T], score: impl Fn(&T) -> MatchScore) {
    items.sort_by(|a, b| score(b).cmp(&score(a)));
}
