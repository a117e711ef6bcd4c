//! Job source: pluggable, trait-based provider of job postings.
//!
//! Default: `LiveJobSource` (scrapes Naukri, Instahyre, RemoteOK and Indeed).
//! Offline: `StaticJobSource` (fallback list only; selected via ENABLE_LIVE_SCRAPING=false).
//!
//! `AppState` holds an `Arc<dyn JobSource>`, chosen at startup via config.
//! Each site is best-effort: any network, status or parse failure is logged and
//! contributes zero postings.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::jobs::fallback::fallback_jobs;
use crate::jobs::title_skills::skills_from_title;
use crate::models::job::JobPosting;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const NAUKRI_BASE: &str = "https://www.naukri.com";
const INSTAHYRE_BASE: &str = "https://www.instahyre.com";
const REMOTEOK_API: &str = "https://remoteok.com/api";
const INDEED_BASE: &str = "https://www.indeed.com";

const NAUKRI_LIMIT: usize = 8;
const INSTAHYRE_LIMIT: usize = 5;
const REMOTEOK_LIMIT: usize = 7;
const INDEED_LIMIT: usize = 5;

/// Below this many scraped postings the fallback list is mixed in.
const MIN_SCRAPED_BEFORE_FALLBACK: usize = 10;
const REMOTEOK_DESCRIPTION_CHARS: usize = 200;
const REMOTEOK_MAX_TAGS: usize = 5;

static NAUKRI_CARD: LazyLock<Selector> = LazyLock::new(|| selector("article.jobTuple"));
static NAUKRI_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a.title"));
static NAUKRI_COMPANY: LazyLock<Selector> = LazyLock::new(|| selector("a.subTitle"));
static NAUKRI_LOCATION: LazyLock<Selector> = LazyLock::new(|| selector("span.location"));

static INSTAHYRE_CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.opportunity-card"));
static INSTAHYRE_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static INSTAHYRE_COMPANY: LazyLock<Selector> = LazyLock::new(|| selector("p.company-name"));
static INSTAHYRE_LOCATION: LazyLock<Selector> = LazyLock::new(|| selector("span.location"));

static INDEED_CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.job_seen_beacon"));
static INDEED_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h2.jobTitle"));
static INDEED_COMPANY: LazyLock<Selector> = LazyLock::new(|| selector("span.companyName"));
static INDEED_LOCATION: LazyLock<Selector> = LazyLock::new(|| selector("div.companyLocation"));
static INDEED_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.jcs-JobTitle"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector must parse")
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to scrape for.
#[derive(Debug, Clone)]
pub struct ScrapeQuery {
    pub keywords: String,
    pub location: String,
    pub max_jobs: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A provider of job postings. Implement this to swap sources without
/// touching the cache or handlers.
///
/// Carried in `AppState` as `Arc<dyn JobSource>`.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Short label for logs and responses.
    fn name(&self) -> &'static str;

    /// Never fails: unreachable sources yield fewer (or zero) postings.
    async fn fetch(&self, query: &ScrapeQuery) -> Vec<JobPosting>;
}

/// Serves the fallback list only. Used when live scraping is disabled.
pub struct StaticJobSource;

#[async_trait]
impl JobSource for StaticJobSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Vec<JobPosting> {
        fallback_jobs().into_iter().take(query.max_jobs).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LiveJobSource
// ────────────────────────────────────────────────────────────────────────────

/// Scrapes several job boards over one shared HTTP client.
#[derive(Clone)]
pub struct LiveJobSource {
    client: Client,
}

impl LiveJobSource {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn scrape_naukri(
        &self,
        keywords: &str,
        location: &str,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        let html = self.get_text(&naukri_url(keywords, location)).await?;
        Ok(parse_naukri(&html, NAUKRI_LIMIT))
    }

    async fn scrape_instahyre(&self, keywords: &str) -> Result<Vec<JobPosting>, ScrapeError> {
        let html = self.get_text(&instahyre_url(keywords)).await?;
        Ok(parse_instahyre(&html, INSTAHYRE_LIMIT))
    }

    async fn scrape_remoteok(&self) -> Result<Vec<JobPosting>, ScrapeError> {
        let body = self.get_text(REMOTEOK_API).await?;
        Ok(parse_remoteok(&body, REMOTEOK_LIMIT)?)
    }

    async fn scrape_indeed(
        &self,
        keywords: &str,
        location: &str,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        let html = self.get_text(&indeed_url(keywords, location)).await?;
        Ok(parse_indeed(&html, INDEED_LIMIT))
    }
}

#[async_trait]
impl JobSource for LiveJobSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn fetch(&self, query: &ScrapeQuery) -> Vec<JobPosting> {
        let naukri_location = if query.location.trim().is_empty() {
            "india"
        } else {
            query.location.as_str()
        };

        let (naukri, instahyre, remoteok) = tokio::join!(
            self.scrape_naukri(&query.keywords, naukri_location),
            self.scrape_instahyre(&query.keywords),
            self.scrape_remoteok(),
        );

        let mut collected = Vec::new();
        collected.extend(site_outcome("Naukri", naukri));
        collected.extend(site_outcome("Instahyre", instahyre));
        collected.extend(site_outcome("RemoteOK", remoteok));

        if collected.len() < query.max_jobs {
            let indeed = self.scrape_indeed(&query.keywords, &query.location).await;
            collected.extend(site_outcome("Indeed", indeed));
        }

        merge_postings(collected, query.max_jobs)
    }
}

fn site_outcome(site: &str, outcome: Result<Vec<JobPosting>, ScrapeError>) -> Vec<JobPosting> {
    match outcome {
        Ok(jobs) => {
            info!("Scraped {} jobs from {site}", jobs.len());
            jobs
        }
        Err(e) => {
            warn!("Error scraping {site}: {e}");
            Vec::new()
        }
    }
}

/// Tops up a thin scrape with the fallback list, drops repeated
/// (title, company) pairs case-insensitively, and caps the result.
pub fn merge_postings(mut collected: Vec<JobPosting>, max_jobs: usize) -> Vec<JobPosting> {
    if collected.len() < MIN_SCRAPED_BEFORE_FALLBACK {
        info!("Only {} scraped jobs, adding fallback jobs", collected.len());
        collected.extend(fallback_jobs());
    }

    let mut seen = HashSet::new();
    collected
        .into_iter()
        .filter(|job| seen.insert((job.title.to_lowercase(), job.company.to_lowercase())))
        .take(max_jobs)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// URL builders
// ────────────────────────────────────────────────────────────────────────────

fn encode_words(text: &str, separator: &str) -> String {
    text.split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join(separator)
}

fn naukri_url(keywords: &str, location: &str) -> String {
    format!(
        "{NAUKRI_BASE}/{}-jobs-in-{}",
        encode_words(keywords, "-"),
        encode_words(location, "-")
    )
}

fn instahyre_url(keywords: &str) -> String {
    format!("{INSTAHYRE_BASE}/search-jobs/?q={}", encode_words(keywords, "+"))
}

fn indeed_url(keywords: &str, location: &str) -> String {
    format!(
        "{INDEED_BASE}/jobs?q={}&l={}",
        encode_words(keywords, "+"),
        encode_words(location, "+")
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Page parsers
// ────────────────────────────────────────────────────────────────────────────

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

fn first_href<'a>(card: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    card.select(selector).next().and_then(|a| a.value().attr("href"))
}

fn titled_posting(
    title: String,
    company: String,
    location: String,
    link: String,
    description: String,
) -> JobPosting {
    JobPosting {
        required_skills: skills_from_title(&title),
        title,
        company,
        location,
        description,
        link,
        scraped_at: None,
        is_fallback: false,
    }
}

fn parse_naukri(html: &str, max_jobs: usize) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    document
        .select(&NAUKRI_CARD)
        .take(max_jobs)
        .filter_map(|card| {
            let title_element = card.select(&NAUKRI_TITLE).next()?;
            let title = element_text(title_element);
            let company = first_text(card, &NAUKRI_COMPANY)
                .unwrap_or_else(|| "Company in India".to_string());
            let location =
                first_text(card, &NAUKRI_LOCATION).unwrap_or_else(|| "India".to_string());
            let link = match title_element.value().attr("href") {
                Some(href) if !href.is_empty() => format!("{NAUKRI_BASE}{href}"),
                _ => NAUKRI_BASE.to_string(),
            };
            let description = format!("{title} at {company}");
            Some(titled_posting(title, company, location, link, description))
        })
        .collect()
}

fn parse_instahyre(html: &str, max_jobs: usize) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    document
        .select(&INSTAHYRE_CARD)
        .take(max_jobs)
        .filter_map(|card| {
            let title = first_text(card, &INSTAHYRE_TITLE)?;
            let company = first_text(card, &INSTAHYRE_COMPANY)
                .unwrap_or_else(|| "Indian Tech Company".to_string());
            let location =
                first_text(card, &INSTAHYRE_LOCATION).unwrap_or_else(|| "India".to_string());
            let description = format!("{title} at {company}");
            Some(titled_posting(
                title,
                company,
                location,
                INSTAHYRE_BASE.to_string(),
                description,
            ))
        })
        .collect()
}

fn parse_indeed(html: &str, max_jobs: usize) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    document
        .select(&INDEED_CARD)
        .take(max_jobs)
        .filter_map(|card| {
            let title = first_text(card, &INDEED_TITLE)?;
            let company = first_text(card, &INDEED_COMPANY)?;
            let location =
                first_text(card, &INDEED_LOCATION).unwrap_or_else(|| "Remote".to_string());
            let link = first_href(card, &INDEED_LINK)
                .map(|href| format!("{INDEED_BASE}{href}"))
                .unwrap_or_default();
            let description = format!("Looking for {title}");
            Some(titled_posting(title, company, location, link, description))
        })
        .collect()
}

/// Parses the RemoteOK API payload. Element 0 is a legal notice, not a job.
fn parse_remoteok(body: &str, max_jobs: usize) -> Result<Vec<JobPosting>, serde_json::Error> {
    let data: Value = serde_json::from_str(body)?;
    let Some(listings) = data.as_array() else {
        return Ok(Vec::new());
    };

    let jobs = listings
        .iter()
        .skip(1)
        .take(max_jobs)
        .filter_map(Value::as_object)
        .map(|listing| {
            let text = |key: &str| listing.get(key).and_then(Value::as_str).unwrap_or_default();

            let title = non_empty_or(text("position"), "N/A");
            let company = non_empty_or(text("company"), "N/A");
            let location = non_empty_or(text("location"), "Remote");
            let description: String = match text("description") {
                "" => format!("{title} at {company}"),
                d => d.to_string(),
            }
            .chars()
            .take(REMOTEOK_DESCRIPTION_CHARS)
            .collect();

            let tags: Vec<String> = listing
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .take(REMOTEOK_MAX_TAGS)
                        .map(str::to_lowercase)
                        .collect()
                })
                .unwrap_or_default();
            let required_skills = if tags.is_empty() {
                skills_from_title(&title)
            } else {
                tags
            };

            JobPosting {
                title,
                company,
                location,
                description,
                required_skills,
                link: text("url").to_string(),
                scraped_at: None,
                is_fallback: false,
            }
        })
        .collect();

    Ok(jobs)
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, company: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: company.to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            required_skills: vec!["rust".to_string()],
            link: String::new(),
            scraped_at: None,
            is_fallback: false,
        }
    }

    const NAUKRI_HTML: &str = r#"
        <html><body>
          <article class="jobTuple bgWhite">
            <a class="title" href="/job-listings-python-dev-123">Python Developer</a>
            <a class="subTitle">Acme Labs</a>
            <span class="location">Pune</span>
          </article>
          <article class="jobTuple">
            <a class="title">QA Engineer</a>
          </article>
          <article class="jobTuple">
            <span class="location">Delhi</span>
          </article>
        </body></html>
    "#;

    const INSTAHYRE_HTML: &str = r#"
        <div class="opportunity-card">
          <h3> React Developer </h3>
          <p class="company-name">Zeta</p>
          <span class="location">Bangalore</span>
        </div>
        <div class="opportunity-card"><h3>Product Manager</h3></div>
    "#;

    const INDEED_HTML: &str = r#"
        <div class="job_seen_beacon">
          <h2 class="jobTitle"><a class="jcs-JobTitle" href="/rc/clk?jk=abc">Senior Java Engineer</a></h2>
          <span class="companyName">Globex</span>
          <div class="companyLocation">Austin, TX</div>
        </div>
        <div class="job_seen_beacon">
          <h2 class="jobTitle">Missing Company</h2>
        </div>
        <div class="job_seen_beacon">
          <h2 class="jobTitle">Docker Specialist</h2>
          <span class="companyName">Initech</span>
        </div>
    "#;

    #[test]
    fn test_parse_naukri_cards_and_defaults() {
        let jobs = parse_naukri(NAUKRI_HTML, 10);
        assert_eq!(jobs.len(), 2, "card without a title is skipped");

        assert_eq!(jobs[0].title, "Python Developer");
        assert_eq!(jobs[0].company, "Acme Labs");
        assert_eq!(jobs[0].location, "Pune");
        assert_eq!(jobs[0].link, "https://www.naukri.com/job-listings-python-dev-123");
        assert_eq!(jobs[0].description, "Python Developer at Acme Labs");
        assert_eq!(jobs[0].required_skills, vec!["python"]);

        assert_eq!(jobs[1].company, "Company in India");
        assert_eq!(jobs[1].location, "India");
        assert_eq!(jobs[1].link, "https://www.naukri.com");
    }

    #[test]
    fn test_parse_naukri_respects_limit() {
        assert_eq!(parse_naukri(NAUKRI_HTML, 1).len(), 1);
    }

    #[test]
    fn test_parse_instahyre_trims_and_defaults() {
        let jobs = parse_instahyre(INSTAHYRE_HTML, 5);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "React Developer");
        assert_eq!(jobs[0].link, "https://www.instahyre.com");
        assert_eq!(jobs[1].company, "Indian Tech Company");
        assert_eq!(jobs[1].location, "India");
    }

    #[test]
    fn test_parse_indeed_requires_title_and_company() {
        let jobs = parse_indeed(INDEED_HTML, 5);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Senior Java Engineer");
        assert_eq!(jobs[0].link, "https://www.indeed.com/rc/clk?jk=abc");
        assert_eq!(jobs[0].description, "Looking for Senior Java Engineer");
        assert_eq!(jobs[1].location, "Remote");
        assert_eq!(jobs[1].link, "");
    }

    #[test]
    fn test_parse_remoteok_skips_notice_and_non_objects() {
        let body = r#"[
            {"legal": "notice"},
            {"position": "Rust Engineer", "company": "Oxide", "location": "",
             "url": "https://remoteok.com/1", "tags": ["Rust", "Linux", "a", "b", "c", "d"]},
            "garbage",
            {"position": "Golang Developer", "company": "Hooli", "location": "EU"}
        ]"#;
        let jobs = parse_remoteok(body, 7).unwrap();
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0].location, "Remote");
        assert_eq!(jobs[0].required_skills, vec!["rust", "linux", "a", "b", "c"]);
        assert_eq!(jobs[0].description, "Rust Engineer at Oxide");
        assert_eq!(jobs[0].link, "https://remoteok.com/1");

        assert_eq!(jobs[1].location, "EU");
        assert_eq!(
            jobs[1].required_skills,
            vec!["programming", "software development", "problem solving"]
        );
    }

    #[test]
    fn test_parse_remoteok_truncates_description() {
        let long = "x".repeat(500);
        let body = format!(r#"[{{}}, {{"position": "Dev", "company": "C", "description": "{long}"}}]"#);
        let jobs = parse_remoteok(&body, 7).unwrap();
        assert_eq!(jobs[0].description.chars().count(), 200);
    }

    #[test]
    fn test_parse_remoteok_non_array_is_empty() {
        assert!(parse_remoteok(r#"{"error": "rate limited"}"#, 7).unwrap().is_empty());
    }

    #[test]
    fn test_parse_remoteok_invalid_json_is_error() {
        assert!(parse_remoteok("<html>", 7).is_err());
    }

    #[test]
    fn test_url_builders() {
        assert_eq!(
            naukri_url("software developer", "new delhi"),
            "https://www.naukri.com/software-developer-jobs-in-new-delhi"
        );
        assert_eq!(
            instahyre_url("software developer"),
            "https://www.instahyre.com/search-jobs/?q=software+developer"
        );
        assert_eq!(
            indeed_url("c++ engineer", ""),
            "https://www.indeed.com/jobs?q=c%2B%2B+engineer&l="
        );
    }

    #[test]
    fn test_merge_adds_fallback_when_thin() {
        let merged = merge_postings(vec![posting("Rust Dev", "Oxide")], 25);
        assert_eq!(merged.len(), 13);
        assert_eq!(merged[0].title, "Rust Dev");
    }

    #[test]
    fn test_merge_dedups_case_insensitively() {
        let scraped: Vec<_> = (0..10)
            .map(|i| posting(&format!("Dev {i}"), "Co"))
            .chain([posting("DEV 0", "co")])
            .collect();
        let merged = merge_postings(scraped, 25);
        assert_eq!(merged.len(), 10, "no fallback with 11 scraped, one duplicate removed");
    }

    #[test]
    fn test_merge_truncates_to_max() {
        let merged = merge_postings(Vec::new(), 5);
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0].company, "TCS");
    }

    #[tokio::test]
    async fn test_static_source_serves_fallback() {
        let query = ScrapeQuery {
            keywords: "anything".to_string(),
            location: String::new(),
            max_jobs: 25,
        };
        let jobs = StaticJobSource.fetch(&query).await;
        assert_eq!(jobs.len(), 12);
        assert_eq!(StaticJobSource.name(), "static");
    }
}
