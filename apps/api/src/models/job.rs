use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNSPECIFIED_LOCATION: &str = "Not specified";

/// A job posting as scraped from a source or taken from the fallback list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub link: String,
    /// Set when the posting enters the job cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_fallback: bool,
}

/// A posting scored against a resume's skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// 0.0 – 100.0, rounded to one decimal
    #[serde(rename = "match", default)]
    pub match_score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}
