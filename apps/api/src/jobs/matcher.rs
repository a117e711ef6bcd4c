//! Matcher: scores job postings against resume skills and ranks them.
//!
//! Pure-Rust, deterministic, no I/O. The same scoring backs the upload,
//! filter and bulk endpoints.

use std::collections::HashSet;

use tracing::debug;

use crate::models::job::{JobMatch, JobPosting, UNSPECIFIED_LOCATION};

/// Credit given to a resume skill that only partially overlaps a job skill.
const PARTIAL_CREDIT: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Ranking and filtering knobs for `recommend`.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    pub top_n: usize,
    /// Minimum match percentage (inclusive).
    pub min_match: f64,
    /// Case-insensitive substring the job location must contain.
    pub location: Option<String>,
    /// Keep only jobs overlapping at least one of these skills.
    pub skill_filter: Vec<String>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_match: 10.0,
            location: None,
            skill_filter: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

fn normalize(skills: &[String]) -> Vec<String> {
    skills.iter().map(|s| s.trim().to_lowercase()).collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Match percentage of a resume against one job's required skills.
///
/// Algorithm:
/// 1. Lowercase and trim both lists; 0 if either is empty.
/// 2. `exact` = number of distinct skills present in both.
/// 3. Each resume skill outside the exact set earns 0.5 once, for the first
///    job skill outside the exact set that contains it or is contained by it.
/// 4. score = min(100, 100 × (exact + partial) / job skill count)
pub fn calc_match(resume_skills: &[String], job_skills: &[String]) -> f64 {
    if resume_skills.is_empty() || job_skills.is_empty() {
        return 0.0;
    }

    let resume = normalize(resume_skills);
    let job = normalize(job_skills);

    let resume_set: HashSet<&str> = resume.iter().map(String::as_str).collect();
    let job_set: HashSet<&str> = job.iter().map(String::as_str).collect();
    let exact: HashSet<&str> = resume_set.intersection(&job_set).copied().collect();

    let partial: f64 = resume
        .iter()
        .filter(|r| !exact.contains(r.as_str()))
        .filter(|r| {
            job.iter()
                .any(|j| !exact.contains(j.as_str()) && overlaps(r, j))
        })
        .map(|_| PARTIAL_CREDIT)
        .sum();

    let total = exact.len() as f64 + partial;
    (total / job.len() as f64 * 100.0).min(100.0)
}

/// Job skills (original spelling) that equal, contain, or are contained by
/// any resume skill, case-insensitively, in discovery order.
pub fn matching_skills(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let mut matching: Vec<String> = Vec::new();
    for resume_skill in resume_skills {
        let r = resume_skill.to_lowercase();
        for job_skill in job_skills {
            let j = job_skill.to_lowercase();
            if overlaps(&r, &j) && !matching.contains(job_skill) {
                matching.push(job_skill.clone());
            }
        }
    }
    matching
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking
// ────────────────────────────────────────────────────────────────────────────

fn passes_location(job: &JobPosting, location: Option<&str>) -> bool {
    match location.map(str::trim) {
        Some(wanted) if !wanted.is_empty() => job
            .location
            .to_lowercase()
            .contains(&wanted.to_lowercase()),
        _ => true,
    }
}

fn passes_skill_filter(job_skills_normalized: &[String], skill_filter: &[String]) -> bool {
    if skill_filter.is_empty() {
        return true;
    }
    normalize(skill_filter)
        .iter()
        .any(|wanted| job_skills_normalized.iter().any(|j| overlaps(wanted, j)))
}

/// Scores every job, applies the filters, and returns the best `top_n`
/// sorted by match descending (ties keep input order).
pub fn recommend(
    resume_skills: &[String],
    jobs: &[JobPosting],
    options: &RecommendOptions,
) -> Vec<JobMatch> {
    debug!(
        "Matching {} jobs against {} resume skills",
        jobs.len(),
        resume_skills.len()
    );

    let mut matches: Vec<JobMatch> = jobs
        .iter()
        .filter(|job| passes_location(job, options.location.as_deref()))
        .filter(|job| passes_skill_filter(&normalize(&job.required_skills), &options.skill_filter))
        .filter_map(|job| {
            let score = calc_match(resume_skills, &job.required_skills);
            if score < options.min_match {
                return None;
            }
            let location = if job.location.trim().is_empty() {
                UNSPECIFIED_LOCATION.to_string()
            } else {
                job.location.clone()
            };
            Some(JobMatch {
                title: job.title.clone(),
                company: job.company.clone(),
                location,
                description: job.description.clone(),
                match_score: round_one_decimal(score),
                matching_skills: matching_skills(resume_skills, &job.required_skills),
                link: job.link.clone(),
                required_skills: job.required_skills.clone(),
            })
        })
        .collect();

    let total = matches.len();
    matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    matches.truncate(options.top_n);

    debug!("Returning {} jobs (filtered from {total} matches)", matches.len());
    matches
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
