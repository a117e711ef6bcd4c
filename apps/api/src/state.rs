use std::sync::Arc;

use crate::config::Config;
use crate::jobs::cache::JobCache;
use crate::jobs::scraper::{JobSource, ScrapeQuery};
use crate::models::job::JobPosting;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Process-wide job cache shared by every request.
    pub jobs: Arc<JobCache>,
    /// Pluggable job source. Default: LiveJobSource. Swap via ENABLE_LIVE_SCRAPING env.
    pub job_source: Arc<dyn JobSource>,
}

impl AppState {
    pub fn new(config: Config, job_source: Arc<dyn JobSource>) -> Self {
        Self {
            jobs: Arc::new(JobCache::new(config.job_cache_ttl)),
            config,
            job_source,
        }
    }

    /// The query used whenever the cache refreshes itself.
    pub fn default_query(&self) -> ScrapeQuery {
        ScrapeQuery {
            keywords: self.config.scrape_keywords.clone(),
            location: String::new(),
            max_jobs: self.config.scrape_max_jobs,
        }
    }

    /// Cached jobs, refreshed from the job source when stale or forced.
    pub async fn current_jobs(&self, force_refresh: bool) -> Vec<JobPosting> {
        self.jobs
            .get_or_refresh(self.job_source.as_ref(), &self.default_query(), force_refresh)
            .await
    }
}
